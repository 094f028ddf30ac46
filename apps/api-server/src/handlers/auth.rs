//! Authentication handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use quill_core::domain::Principal;
use quill_core::services::IssuedToken;
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterRequest, validation_messages};

use super::mapping::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()
        .map_err(|e| AppError::Validation(validation_messages(&e)))?;

    let user = state
        .users
        .register(req.name, req.email, &req.password)
        .await?;
    let issued = state.auth.issue_token(&Principal::user(user.id))?;

    Ok(HttpResponse::Ok().json(auth_response(issued)))
}

/// POST /api/v1/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let principal = state.auth.authenticate(&req.email, &req.password).await?;
    let issued = state.auth.issue_token(&principal)?;

    Ok(HttpResponse::Ok().json(auth_response(issued)))
}

/// GET /api/v1/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.users.get_user(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(user_response(user, &identity)))
}

fn auth_response(issued: IssuedToken) -> AuthResponse {
    AuthResponse {
        token: issued.token,
        expires_in: issued.expires_in,
    }
}
