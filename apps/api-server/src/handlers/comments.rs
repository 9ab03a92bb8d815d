//! Comment handlers, mounted at both `/comentarios` and `/comments`.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::{Map, Value};

use blog_core::domain::{
    Comment, CommentContent, CommentFilter, CommentPatch, NewComment, non_empty,
};
use blog_core::error::DomainError;
use blog_shared::ApiResponse;
use blog_shared::dto::{CommentQuery, CommentRequest, CreateCommentRequest};

use super::parse_id;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct CommentBody {
    #[serde(rename = "comentario")]
    pub comment: Comment,
}

#[derive(Serialize)]
pub struct CommentList {
    pub total: usize,
    #[serde(rename = "comentarios")]
    pub comments: Vec<Comment>,
}

/// GET /comentarios[?postId=]
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<CommentQuery>,
) -> AppResult<HttpResponse> {
    let requested = query
        .into_inner()
        .post_id
        .filter(|raw| !raw.trim().is_empty());

    let (message, comments) = match requested {
        Some(raw) => {
            // A post id that is not a number has no comments.
            let comments = match raw.trim().parse::<i64>() {
                Ok(post_id) => state.comments.list(CommentFilter::for_post(post_id)).await?,
                Err(_) => Vec::new(),
            };
            (format!("Comentarios del post {raw}"), comments)
        }
        None => (
            "Todos los comentarios".to_string(),
            state.comments.list(CommentFilter::all()).await?,
        ),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        message,
        CommentList {
            total: comments.len(),
            comments,
        },
    )))
}

/// HEAD /comentarios
pub async fn head(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let total = state.comments.count().await?;

    Ok(HttpResponse::Ok()
        .insert_header(("X-Total-Comentarios", total.to_string()))
        .insert_header(("X-API-Version", state.api_version.clone()))
        .insert_header(("X-Database-Type", state.backend.header_value()))
        .finish())
}

/// GET /comentarios/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let raw = path.into_inner();
    let found = match parse_id(&raw) {
        Some(id) => state.comments.find_by_id(id).await?,
        None => None,
    };
    let comment = found.ok_or_else(|| AppError::comment_not_found(&raw))?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Comentario encontrado",
        CommentBody { comment },
    )))
}

/// POST /comentarios
///
/// The referenced post must exist.
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post_id = req.post_id.filter(|id| !id.is_blank());

    let (Some(post_id), Some(text), Some(author)) =
        (post_id, non_empty(req.text), non_empty(req.author))
    else {
        return Err(DomainError::Incomplete {
            required: NewComment::REQUIRED,
        }
        .into());
    };

    let id = post_id
        .as_id()
        .ok_or_else(|| AppError::missing_post(post_id.raw()))?;
    let comment = state.comments.create(NewComment::new(id, text, author)).await?;

    tracing::info!(comment_id = comment.id, post_id = comment.post_id, "Comment created");

    Ok(HttpResponse::Created().json(ApiResponse::new(
        "Comentario creado exitosamente",
        CommentBody { comment },
    )))
}

/// PUT /comentarios/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let content = comment_content(body.into_inner())?;
    let raw = path.into_inner();
    let updated = match parse_id(&raw) {
        Some(id) => state.comments.update(id, content).await?,
        None => None,
    };
    let comment = updated.ok_or_else(|| AppError::comment_not_found(&raw))?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Comentario actualizado exitosamente",
        CommentBody { comment },
    )))
}

/// PATCH /comentarios/{id}
pub async fn patch(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Map<String, Value>>,
) -> AppResult<HttpResponse> {
    let changes = CommentPatch::from_fields(&body)?;
    let raw = path.into_inner();
    let patched = match parse_id(&raw) {
        Some(id) => state.comments.patch(id, changes).await?,
        None => None,
    };
    let comment = patched.ok_or_else(|| AppError::comment_not_found(&raw))?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Comentario actualizado parcialmente",
        CommentBody { comment },
    )))
}

/// DELETE /comentarios/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let raw = path.into_inner();
    let removed = match parse_id(&raw) {
        Some(id) => state.comments.delete(id).await?,
        None => None,
    };
    let comment = removed.ok_or_else(|| AppError::comment_not_found(&raw))?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Comentario eliminado exitosamente",
        CommentBody { comment },
    )))
}

fn comment_content(req: CommentRequest) -> Result<CommentContent, DomainError> {
    match (non_empty(req.text), non_empty(req.author)) {
        (Some(text), Some(author)) => Ok(CommentContent { text, author }),
        _ => Err(DomainError::Incomplete {
            required: CommentContent::REQUIRED,
        }),
    }
}
