//! Error handling middleware - maps domain and repository failures to the
//! API's `{error, mensaje}` bodies.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blog_core::error::{DomainError, RepoError};
use blog_shared::ErrorResponse;
use std::fmt;

/// Application-level error type rendered as an `ErrorResponse`.
#[derive(Debug)]
pub enum AppError {
    BadRequest { error: String, detail: String },
    NotFound { error: String, detail: String },
    Internal(String),
}

impl AppError {
    pub fn bad_request(error: impl Into<String>, detail: impl Into<String>) -> Self {
        AppError::BadRequest {
            error: error.into(),
            detail: detail.into(),
        }
    }

    pub fn post_not_found(id: impl fmt::Display) -> Self {
        AppError::NotFound {
            error: "Post no encontrado".to_string(),
            detail: format!("No existe un post con ID {id}"),
        }
    }

    pub fn comment_not_found(id: impl fmt::Display) -> Self {
        AppError::NotFound {
            error: "Comentario no encontrado".to_string(),
            detail: format!("No existe un comentario con ID {id}"),
        }
    }

    /// A comment referenced a post that does not exist.
    pub fn missing_post(id: impl fmt::Display) -> Self {
        Self::bad_request("Post no existe", format!("No existe un post con ID {id}"))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest { error, detail } => write!(f, "Bad request: {}: {}", error, detail),
            AppError::NotFound { error, detail } => write!(f, "Not found: {}: {}", error, detail),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::BadRequest { error, detail } | AppError::NotFound { error, detail } => {
                ErrorResponse::new(error, detail)
            }
            AppError::Internal(detail) => {
                // The cause stays in the logs
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Incomplete { required } => {
                AppError::bad_request("Datos incompletos", required_fields_message(required))
            }
            DomainError::EmptyPatch => AppError::bad_request(
                "Datos vacíos",
                "Debe proporcionar al menos un campo para actualizar",
            ),
            DomainError::UnknownField(field) => AppError::bad_request(
                "Campo no permitido",
                format!("El campo {field} no se puede actualizar"),
            ),
            DomainError::InvalidValue(field) => AppError::bad_request(
                "Datos inválidos",
                format!("El campo {field} debe ser un texto no vacío"),
            ),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::MissingParent { post_id } => AppError::missing_post(post_id),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Constraint(msg) => {
                tracing::error!("Database constraint error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// "Los campos titulo, contenido y autor son obligatorios"
fn required_fields_message(fields: &[&str]) -> String {
    match fields.split_last() {
        None => "Faltan campos obligatorios".to_string(),
        Some((only, [])) => format!("El campo {only} es obligatorio"),
        Some((last, rest)) => format!("Los campos {} y {last} son obligatorios", rest.join(", ")),
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_message() {
        assert_eq!(
            required_fields_message(&["titulo", "contenido", "autor"]),
            "Los campos titulo, contenido y autor son obligatorios"
        );
        assert_eq!(
            required_fields_message(&["texto", "autor"]),
            "Los campos texto y autor son obligatorios"
        );
        assert_eq!(required_fields_message(&["autor"]), "El campo autor es obligatorio");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::from(RepoError::MissingParent { post_id: 9 }).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(RepoError::Query("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::post_not_found("abc").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(DomainError::EmptyPatch).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
