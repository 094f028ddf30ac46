//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;
use validator::Validate;

use quill_core::ports::PostFilter;
use quill_shared::dto::{PostQuery, PostRequest, PostResponse, validation_messages};

use super::mapping::{post_changes, post_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/posts?categoryId=&tagId=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PostQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let filter = PostFilter {
        category_id: query.category_id,
        tag_id: query.tag_id,
    };

    let posts: Vec<PostResponse> = state
        .posts
        .list_published(filter)
        .await?
        .into_iter()
        .map(post_response)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/v1/posts/drafts
pub async fn list_drafts(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = state
        .posts
        .list_drafts(&identity)
        .await?
        .into_iter()
        .map(post_response)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/v1/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /api/v1/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body)?;
    let post = state
        .posts
        .create_post(&identity, post_changes(req))
        .await?;
    Ok(HttpResponse::Created().json(post_response(post)))
}

/// PUT /api/v1/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = validated(body)?;
    let post = state
        .posts
        .update_post(path.into_inner(), &identity, post_changes(req))
        .await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete_post(path.into_inner(), &identity).await?;
    Ok(HttpResponse::NoContent().finish())
}

fn validated(body: web::Json<PostRequest>) -> AppResult<PostRequest> {
    let req = body.into_inner();
    req.validate()
        .map_err(|e| AppError::Validation(validation_messages(&e)))?;
    Ok(req)
}
