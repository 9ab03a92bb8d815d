//! Post handlers.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::{Map, Value};

use blog_core::domain::{NewPost, Post, PostPatch, non_empty};
use blog_core::error::DomainError;
use blog_shared::ApiResponse;
use blog_shared::dto::PostRequest;

use super::parse_id;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct PostBody {
    pub post: Post,
}

#[derive(Serialize)]
pub struct PostList {
    pub total: usize,
    pub posts: Vec<Post>,
}

/// GET /posts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Lista de todos los posts",
        PostList {
            total: posts.len(),
            posts,
        },
    )))
}

/// HEAD /posts
pub async fn head(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let total = state.posts.count().await?;

    Ok(HttpResponse::Ok()
        .insert_header(("X-Total-Posts", total.to_string()))
        .insert_header(("X-API-Version", state.api_version.clone()))
        .insert_header(("X-Database-Type", state.backend.header_value()))
        .finish())
}

/// GET /posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let raw = path.into_inner();
    let found = match parse_id(&raw) {
        Some(id) => state.posts.find_by_id(id).await?,
        None => None,
    };
    let post = found.ok_or_else(|| AppError::post_not_found(&raw))?;

    Ok(HttpResponse::Ok().json(ApiResponse::new("Post encontrado", PostBody { post })))
}

/// POST /posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let content = new_post(body.into_inner())?;
    let post = state.posts.create(content).await?;

    tracing::info!(post_id = post.id, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::new("Post creado exitosamente", PostBody { post })))
}

/// PUT /posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let content = new_post(body.into_inner())?;
    let raw = path.into_inner();
    let updated = match parse_id(&raw) {
        Some(id) => state.posts.update(id, content).await?,
        None => None,
    };
    let post = updated.ok_or_else(|| AppError::post_not_found(&raw))?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Post actualizado exitosamente",
        PostBody { post },
    )))
}

/// PATCH /posts/{id}
pub async fn patch(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Map<String, Value>>,
) -> AppResult<HttpResponse> {
    let changes = PostPatch::from_fields(&body)?;
    let raw = path.into_inner();
    let patched = match parse_id(&raw) {
        Some(id) => state.posts.patch(id, changes).await?,
        None => None,
    };
    let post = patched.ok_or_else(|| AppError::post_not_found(&raw))?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Post actualizado parcialmente",
        PostBody { post },
    )))
}

/// DELETE /posts/{id}
///
/// Comments of the post are removed with it.
pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let raw = path.into_inner();
    let removed = match parse_id(&raw) {
        Some(id) => state.posts.delete(id).await?,
        None => None,
    };
    let post = removed.ok_or_else(|| AppError::post_not_found(&raw))?;

    tracing::info!(post_id = post.id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Post eliminado exitosamente",
        PostBody { post },
    )))
}

fn new_post(req: PostRequest) -> Result<NewPost, DomainError> {
    match (non_empty(req.title), non_empty(req.body), non_empty(req.author)) {
        (Some(title), Some(body), Some(author)) => Ok(NewPost {
            title,
            body,
            author,
        }),
        _ => Err(DomainError::Incomplete {
            required: NewPost::REQUIRED,
        }),
    }
}
