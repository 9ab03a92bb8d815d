//! Domain-level error types.

use thiserror::Error;

/// Domain errors - request content rejected before any storage access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Required fields missing or empty: {}", .required.join(", "))]
    Incomplete { required: &'static [&'static str] },

    #[error("No fields supplied for a partial update")]
    EmptyPatch,

    #[error("Field '{0}' cannot be updated")]
    UnknownField(String),

    #[error("Field '{0}' must be a non-empty string")]
    InvalidValue(String),
}

/// Repository-level errors.
///
/// Absence of a row is never an error: lookups and mutations return `Ok(None)`.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Post {post_id} does not exist")]
    MissingParent { post_id: i64 },
}
