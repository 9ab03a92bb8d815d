use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::patch_value;
use crate::error::DomainError;

/// Post entity - a titled article that owns zero or more comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "contenido")]
    pub body: String,
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "fechaCreacion")]
    pub created_at: NaiveDate,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: NaiveDate,
}

impl Post {
    /// Create a post with both dates set to `today`.
    pub fn new(id: i64, content: NewPost, today: NaiveDate) -> Self {
        Self {
            id,
            title: content.title,
            body: content.body,
            author: content.author,
            created_at: today,
            updated_at: today,
        }
    }

    /// Replace every mutable field.
    pub fn replace(&mut self, content: NewPost, today: NaiveDate) {
        self.title = content.title;
        self.body = content.body;
        self.author = content.author;
        self.updated_at = today;
    }

    /// Apply only the supplied fields. The modification date moves even when
    /// the patch leaves every value unchanged.
    pub fn apply(&mut self, patch: PostPatch, today: NaiveDate) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        self.updated_at = today;
    }
}

/// Fields required to create or fully replace a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub author: String,
}

impl NewPost {
    /// Wire names of the required fields, in the order they are reported.
    pub const REQUIRED: &'static [&'static str] = &["titulo", "contenido", "autor"];

    pub fn new(title: impl Into<String>, body: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            author: author.into(),
        }
    }
}

/// Post columns a partial update may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Title,
    Body,
    Author,
}

impl PostField {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "titulo" => Some(Self::Title),
            "contenido" => Some(Self::Body),
            "autor" => Some(Self::Author),
            _ => None,
        }
    }

    /// Wire name, which is also the storage column name.
    pub fn key(self) -> &'static str {
        match self {
            Self::Title => "titulo",
            Self::Body => "contenido",
            Self::Author => "autor",
        }
    }
}

/// Partial update of a post. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
}

impl PostPatch {
    /// Build a patch from a JSON object, rejecting keys outside the allow-list.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, DomainError> {
        if fields.is_empty() {
            return Err(DomainError::EmptyPatch);
        }

        let mut patch = Self::default();
        for (key, value) in fields {
            let field =
                PostField::from_key(key).ok_or_else(|| DomainError::UnknownField(key.clone()))?;
            let value = patch_value(key, value)?;
            match field {
                PostField::Title => patch.title = Some(value),
                PostField::Body => patch.body = Some(value),
                PostField::Author => patch.author = Some(value),
            }
        }
        Ok(patch)
    }

    /// Supplied fields paired with their new values, in column order.
    pub fn changes(&self) -> Vec<(PostField, &str)> {
        [
            (PostField::Title, self.title.as_deref()),
            (PostField::Body, self.body.as_deref()),
            (PostField::Author, self.author.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_patch_accepts_known_fields() {
        let patch = PostPatch::from_fields(&fields(json!({"autor": "X"}))).unwrap();
        assert_eq!(patch.author.as_deref(), Some("X"));
        assert!(patch.title.is_none());
        assert_eq!(patch.changes(), vec![(PostField::Author, "X")]);
    }

    #[test]
    fn test_patch_rejects_unknown_and_protected_keys() {
        for key in ["id", "fechaCreacion", "fechaActualizacion", "titulo = 'x' --"] {
            let err = PostPatch::from_fields(&fields(json!({ key: "v" }))).unwrap_err();
            assert_eq!(err, DomainError::UnknownField(key.to_string()));
        }
    }

    #[test]
    fn test_patch_rejects_empty_object_and_bad_values() {
        assert_eq!(
            PostPatch::from_fields(&Map::new()).unwrap_err(),
            DomainError::EmptyPatch
        );
        assert_eq!(
            PostPatch::from_fields(&fields(json!({"titulo": ""}))).unwrap_err(),
            DomainError::InvalidValue("titulo".to_string())
        );
        assert_eq!(
            PostPatch::from_fields(&fields(json!({"titulo": 7}))).unwrap_err(),
            DomainError::InvalidValue("titulo".to_string())
        );
    }

    #[test]
    fn test_apply_touches_only_supplied_fields() {
        let created = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let mut post = Post::new(1, NewPost::new("T", "C", "A"), created);

        post.apply(
            PostPatch {
                author: Some("X".into()),
                ..Default::default()
            },
            later,
        );

        assert_eq!(post.title, "T");
        assert_eq!(post.body, "C");
        assert_eq!(post.author, "X");
        assert_eq!(post.created_at, created);
        assert_eq!(post.updated_at, later);
    }

    #[test]
    fn test_wire_field_names() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let post = Post::new(1, NewPost::new("T", "C", "A"), day);
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "titulo": "T",
                "contenido": "C",
                "autor": "A",
                "fechaCreacion": "2024-01-15",
                "fechaActualizacion": "2024-01-15"
            })
        );
    }
}
