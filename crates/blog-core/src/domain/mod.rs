//! Domain entities - the core business objects.

mod comment;
mod post;
mod stats;

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::error::DomainError;

pub use comment::{Comment, CommentContent, CommentField, CommentFilter, CommentPatch, NewComment};
pub use post::{NewPost, Post, PostField, PostPatch};
pub use stats::Stats;

/// Current UTC calendar date. Entity dates carry day granularity only.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Keeps a required field only when it is present and non-empty.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn patch_value(key: &str, value: &Value) -> Result<String, DomainError> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        _ => Err(DomainError::InvalidValue(key.to_string())),
    }
}
