//! Response envelopes. Every success body carries `mensaje`; every error body
//! carries `error` and `mensaje`.

use serde::{Deserialize, Serialize};

/// Successful response: a human-readable message next to the payload keys.
///
/// The payload is flattened, so `ApiResponse::new("Post encontrado", PostBody { post })`
/// serializes as `{"mensaje": "Post encontrado", "post": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub mensaje: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(mensaje: impl Into<String>, data: T) -> Self {
        Self {
            mensaje: mensaje.into(),
            data,
        }
    }
}

/// Error body: `error` names the category, `mensaje` the specific occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    pub mensaje: String,

    /// Where to go next, used by the catch-all route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sugerencia: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, mensaje: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            mensaje: mensaje.into(),
            sugerencia: None,
        }
    }

    pub fn with_suggestion(mut self, sugerencia: impl Into<String>) -> Self {
        self.sugerencia = Some(sugerencia.into());
        self
    }

    pub fn internal_error() -> Self {
        Self::new(
            "Error interno del servidor",
            "Ha ocurrido un error al procesar la solicitud",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Payload {
        total: usize,
    }

    #[test]
    fn test_envelope_flattens_payload() {
        let body = serde_json::to_value(ApiResponse::new("ok", Payload { total: 2 })).unwrap();
        assert_eq!(body, json!({"mensaje": "ok", "total": 2}));
    }

    #[test]
    fn test_error_omits_missing_suggestion() {
        let body = serde_json::to_value(ErrorResponse::new("E", "m")).unwrap();
        assert_eq!(body, json!({"error": "E", "mensaje": "m"}));
    }
}
