//! HTTP handlers and route configuration.

mod comments;
mod posts;
mod root;


use actix_web::middleware::DefaultHeaders;
use actix_web::{Resource, web};

use crate::middleware::error::AppError;

pub use root::fallback;

/// Collection paths for comments; the Spanish one is canonical.
const COMMENT_PATHS: [&str; 2] = ["/comentarios", "/comments"];

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Both patterns so the index answers at the bare base path too.
    cfg.service(
        web::resource(["", "/"])
            .default_service(web::to(root::fallback))
            .route(web::get().to(root::index)),
    )
        .service(
            resource("/posts")
                .route(web::get().to(posts::list))
                .route(web::head().to(posts::head))
                .route(web::post().to(posts::create)),
        )
        .service(
            resource("/posts/{id}")
                .route(web::get().to(posts::get))
                .route(web::put().to(posts::update))
                .route(web::patch().to(posts::patch))
                .route(web::delete().to(posts::delete)),
        );

    for path in COMMENT_PATHS {
        cfg.service(
            resource(path)
                .route(web::get().to(comments::list))
                .route(web::head().to(comments::head))
                .route(web::post().to(comments::create)),
        )
        .service(
            resource(&format!("{path}/{{id}}"))
                .route(web::get().to(comments::get))
                .route(web::put().to(comments::update))
                .route(web::patch().to(comments::patch))
                .route(web::delete().to(comments::delete)),
        );
    }
}

/// Unsupported methods on a known path get the same treatment as unknown paths.
fn resource(path: &str) -> Resource {
    web::resource(path).default_service(web::to(root::fallback))
}

/// CORS headers attached to every response.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add((
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS",
        ))
        .add(("Access-Control-Allow-Headers", "Content-Type, Authorization"))
}

/// Malformed JSON bodies are answered in the API's error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!("Rejected request body: {}", err);
        AppError::bad_request("JSON inválido", "El cuerpo de la solicitud no es JSON válido")
            .into()
    })
}

/// Query strings that fail to deserialize are answered in the API's error shape.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        tracing::debug!("Rejected query string: {}", err);
        AppError::bad_request(
            "Parámetros inválidos",
            "Los parámetros de la consulta no son válidos",
        )
        .into()
    })
}

/// Path ids that are not integers cannot match any row.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}
