//! Authentication gate and extractors.
//!
//! [`AuthGate`] runs on every request. It resolves a `Bearer` token into a
//! [`Principal`] and stores it in the request extensions; handlers that need
//! a caller take an [`Identity`]. Requests without an `Authorization` header
//! pass through anonymously, requests with a bad token are answered with
//! `401` before routing.

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{self, HeaderMap},
};
use std::future::{Future, Ready, ready};
use std::ops::Deref;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use quill_core::DomainError;
use quill_core::domain::Principal;
use quill_core::ports::AuthError;
use quill_core::services::AuthService;

use crate::middleware::error::AppError;

/// Paths that never look at the `Authorization` header.
pub const PUBLIC_PATHS: &[&str] = &["/api/v1/auth/login", "/api/v1/auth/register"];

/// Result of inspecting a request's credentials.
#[derive(Debug)]
pub enum GateOutcome {
    /// No bearer token was presented.
    Anonymous,
    Authenticated(Principal),
    /// A token was presented but could not be turned into a principal:
    /// malformed, expired, signed with another key, owned by a user that no
    /// longer exists, or not checkable at all.
    Unauthenticated(String),
}

/// Resolve the bearer token in `headers`, if any.
pub async fn authenticate(auth: &AuthService, headers: &HeaderMap) -> GateOutcome {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return GateOutcome::Anonymous;
    };
    let Ok(value) = value.to_str() else {
        return GateOutcome::Unauthenticated("Authorization header is not valid ASCII".to_string());
    };
    let Some(token) = value.strip_prefix("Bearer ") else {
        return GateOutcome::Anonymous;
    };

    match auth.validate_token(token.trim()).await {
        Ok(principal) => GateOutcome::Authenticated(principal),
        Err(DomainError::Auth(e)) if e.is_unauthenticated() => {
            GateOutcome::Unauthenticated(e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Token validation failed unexpectedly");
            GateOutcome::Unauthenticated("token could not be validated".to_string())
        }
    }
}

/// Authentication middleware factory.
pub struct AuthGate {
    auth: Arc<AuthService>,
}

impl AuthGate {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService {
            service: Rc::new(service),
            auth: self.auth.clone(),
        }))
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
    auth: Arc<AuthService>,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let auth = self.auth.clone();
        let is_public = PUBLIC_PATHS.iter().any(|p| *p == req.path());

        Box::pin(async move {
            if !is_public {
                let outcome = authenticate(&auth, req.headers()).await;
                match outcome {
                    GateOutcome::Anonymous => {}
                    GateOutcome::Authenticated(principal) => {
                        req.extensions_mut().insert(principal);
                    }
                    GateOutcome::Unauthenticated(reason) => {
                        tracing::warn!(path = %req.path(), %reason, "Rejected bearer token");
                        let response =
                            AppError::Unauthorized("Invalid or expired token".to_string())
                                .error_response();
                        let (http_req, _payload) = req.into_parts();
                        let srv_response = ServiceResponse::new(http_req, response);
                        return Ok(srv_response.map_into_right_body());
                    }
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Authenticated caller extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(pub Principal);

impl Deref for Identity {
    type Target = Principal;

    fn deref(&self) -> &Principal {
        &self.0
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let principal = req.extensions().get::<Principal>().cloned();
        ready(
            principal
                .map(Identity)
                .ok_or_else(|| AuthError::MissingAuth.into()),
        )
    }
}
