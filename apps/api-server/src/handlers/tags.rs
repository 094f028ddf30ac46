//! Tag handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;
use validator::Validate;

use quill_shared::dto::{CreateTagsRequest, NamedRef, TaxonomyResponse, validation_messages};

use super::mapping::{named_ref, tag_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/tags
pub async fn list_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags: Vec<TaxonomyResponse> = state
        .tags
        .list_tags()
        .await?
        .into_iter()
        .map(tag_response)
        .collect();

    Ok(HttpResponse::Ok().json(tags))
}

/// POST /api/v1/tags
///
/// Existing names are returned as they are; only unknown names are created.
pub async fn create_tags(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<CreateTagsRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()
        .map_err(|e| AppError::Validation(validation_messages(&e)))?;

    let tags: Vec<NamedRef> = state
        .tags
        .create_tags(req.names)
        .await?
        .into_iter()
        .map(|t| named_ref(t.id, t.name))
        .collect();

    Ok(HttpResponse::Created().json(tags))
}

/// DELETE /api/v1/tags/{id}
pub async fn delete_tag(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.tags.delete_tag(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
