//! Category handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;
use validator::Validate;

use quill_shared::dto::{CreateCategoryRequest, TaxonomyResponse, validation_messages};

use super::mapping::{category_response, named_ref};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories: Vec<TaxonomyResponse> = state
        .categories
        .list_categories()
        .await?
        .into_iter()
        .map(category_response)
        .collect();

    Ok(HttpResponse::Ok().json(categories))
}

/// POST /api/v1/categories
pub async fn create_category(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()
        .map_err(|e| AppError::Validation(validation_messages(&e)))?;

    let category = state.categories.create_category(req.name).await?;
    Ok(HttpResponse::Created().json(named_ref(category.id, category.name)))
}

/// DELETE /api/v1/categories/{id}
pub async fn delete_category(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.categories.delete_category(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
