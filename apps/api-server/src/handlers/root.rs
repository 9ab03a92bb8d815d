//! API index and catch-all handlers.

use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use serde_json::{Value, json};

use blog_core::domain::Stats;
use blog_core::ports::collect_stats;
use blog_shared::{ApiResponse, ErrorResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ApiInfo {
    pub version: String,
    #[serde(rename = "estadisticas")]
    pub statistics: Stats,
    #[serde(rename = "baseDatos")]
    pub database: &'static str,
    pub endpoints: Value,
}

/// API metadata with live row counts.
///
/// GET /
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let statistics = collect_stats(state.posts.as_ref(), state.comments.as_ref()).await?;

    let info = ApiInfo {
        version: state.api_version.clone(),
        statistics,
        database: state.backend.description(),
        endpoints: endpoint_map(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "¡Bienvenido a la API de Posts y Comentarios!",
        info,
    )))
}

/// Answers CORS preflights and reports every other unmatched request as 404.
pub async fn fallback(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return HttpResponse::Ok().finish();
    }

    tracing::debug!(method = %req.method(), path = %req.uri(), "No route matched");

    HttpResponse::NotFound().json(
        ErrorResponse::new(
            "Endpoint no encontrado",
            format!("La ruta {} {} no existe", req.method(), req.uri()),
        )
        .with_suggestion("Visita GET / para ver todos los endpoints disponibles"),
    )
}

fn endpoint_map() -> Value {
    json!({
        "posts": {
            "GET /posts": "Obtener todos los posts",
            "HEAD /posts": "Obtener el total de posts en los headers",
            "GET /posts/:id": "Obtener un post específico",
            "POST /posts": "Crear un nuevo post",
            "PUT /posts/:id": "Actualizar un post completo",
            "PATCH /posts/:id": "Actualizar parcialmente un post",
            "DELETE /posts/:id": "Eliminar un post y sus comentarios"
        },
        "comentarios": {
            "GET /comentarios": "Obtener todos los comentarios (opcional: ?postId=X)",
            "HEAD /comentarios": "Obtener el total de comentarios en los headers",
            "GET /comentarios/:id": "Obtener un comentario específico",
            "POST /comentarios": "Crear un nuevo comentario",
            "PUT /comentarios/:id": "Actualizar un comentario completo",
            "PATCH /comentarios/:id": "Actualizar parcialmente un comentario",
            "DELETE /comentarios/:id": "Eliminar un comentario"
        }
    })
}
