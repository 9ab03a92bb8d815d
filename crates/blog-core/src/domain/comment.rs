use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::patch_value;
use crate::error::DomainError;

/// Comment entity - a short text attached to an existing post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(rename = "postId")]
    pub post_id: i64,
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "fechaCreacion")]
    pub created_at: NaiveDate,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: NaiveDate,
}

impl Comment {
    pub fn new(id: i64, new: NewComment, today: NaiveDate) -> Self {
        Self {
            id,
            post_id: new.post_id,
            text: new.content.text,
            author: new.content.author,
            created_at: today,
            updated_at: today,
        }
    }

    /// Replace text and author. The parent post never changes.
    pub fn replace(&mut self, content: CommentContent, today: NaiveDate) {
        self.text = content.text;
        self.author = content.author;
        self.updated_at = today;
    }

    pub fn apply(&mut self, patch: CommentPatch, today: NaiveDate) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        self.updated_at = today;
    }
}

/// Mutable content of a comment, used for full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent {
    pub text: String,
    pub author: String,
}

impl CommentContent {
    pub const REQUIRED: &'static [&'static str] = &["texto", "autor"];

    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

/// Fields required to create a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: i64,
    pub content: CommentContent,
}

impl NewComment {
    pub const REQUIRED: &'static [&'static str] = &["postId", "texto", "autor"];

    pub fn new(post_id: i64, text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            post_id,
            content: CommentContent::new(text, author),
        }
    }
}

/// Comment columns a partial update may touch. `postId` is deliberately absent:
/// re-parenting a comment is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentField {
    Text,
    Author,
}

impl CommentField {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "texto" => Some(Self::Text),
            "autor" => Some(Self::Author),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Text => "texto",
            Self::Author => "autor",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPatch {
    pub text: Option<String>,
    pub author: Option<String>,
}

impl CommentPatch {
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, DomainError> {
        if fields.is_empty() {
            return Err(DomainError::EmptyPatch);
        }

        let mut patch = Self::default();
        for (key, value) in fields {
            let field =
                CommentField::from_key(key).ok_or_else(|| DomainError::UnknownField(key.clone()))?;
            let value = patch_value(key, value)?;
            match field {
                CommentField::Text => patch.text = Some(value),
                CommentField::Author => patch.author = Some(value),
            }
        }
        Ok(patch)
    }

    pub fn changes(&self) -> Vec<(CommentField, &str)> {
        [
            (CommentField::Text, self.text.as_deref()),
            (CommentField::Author, self.author.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

/// Listing filter for comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentFilter {
    pub post_id: Option<i64>,
}

impl CommentFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_post(post_id: i64) -> Self {
        Self {
            post_id: Some(post_id),
        }
    }

    /// Comments of a single post read oldest first, like a thread.
    /// The unfiltered listing shows the newest first.
    pub fn newest_first(&self) -> bool {
        self.post_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_rejects_reparenting() {
        let fields = json!({"postId": 2}).as_object().cloned().unwrap();
        assert_eq!(
            CommentPatch::from_fields(&fields).unwrap_err(),
            DomainError::UnknownField("postId".to_string())
        );
    }

    #[test]
    fn test_patch_collects_changes_in_column_order() {
        let fields = json!({"autor": "B", "texto": "hola"})
            .as_object()
            .cloned()
            .unwrap();
        let patch = CommentPatch::from_fields(&fields).unwrap();
        assert_eq!(
            patch.changes(),
            vec![(CommentField::Text, "hola"), (CommentField::Author, "B")]
        );
    }

    #[test]
    fn test_filter_ordering() {
        assert!(CommentFilter::all().newest_first());
        assert!(!CommentFilter::for_post(1).newest_first());
    }

    #[test]
    fn test_replace_keeps_parent() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let mut comment = Comment::new(3, NewComment::new(2, "a", "b"), day);
        comment.replace(CommentContent::new("c", "d"), day);
        assert_eq!(comment.post_id, 2);
        assert_eq!(comment.text, "c");
        assert_eq!(comment.author, "d");
    }
}
