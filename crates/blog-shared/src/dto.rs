//! Data Transfer Objects - request bodies and query strings of the API.
//!
//! Every field is optional so that a missing field reaches the handler and is
//! reported with the API's own error shape instead of a deserializer message.

use serde::{Deserialize, Serialize};

/// Body of `POST /posts` and `PUT /posts/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "contenido")]
    pub body: Option<String>,
    #[serde(rename = "autor")]
    pub author: Option<String>,
}

/// Body of `POST /comentarios`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(rename = "postId")]
    pub post_id: Option<IdValue>,
    #[serde(rename = "texto")]
    pub text: Option<String>,
    #[serde(rename = "autor")]
    pub author: Option<String>,
}

/// Body of `PUT /comentarios/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRequest {
    #[serde(rename = "texto")]
    pub text: Option<String>,
    #[serde(rename = "autor")]
    pub author: Option<String>,
}

/// Query string of `GET /comentarios`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentQuery {
    #[serde(rename = "postId")]
    pub post_id: Option<String>,
}

/// An id sent either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(i64),
    Text(String),
}

impl IdValue {
    pub fn as_id(&self) -> Option<i64> {
        match self {
            IdValue::Number(n) => Some(*n),
            IdValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// A blank string counts as an absent value.
    pub fn is_blank(&self) -> bool {
        matches!(self, IdValue::Text(s) if s.trim().is_empty())
    }

    /// The value as the client sent it, for echoing in messages.
    pub fn raw(&self) -> String {
        match self {
            IdValue::Number(n) => n.to_string(),
            IdValue::Text(s) => s.clone(),
        }
    }
}
