//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod health;
mod mapping;
mod posts;
mod tags;

use actix_web::{HttpRequest, error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/v1")
                        .service(
                            web::scope("/auth")
                                .route("/register", web::post().to(auth::register))
                                .route("/login", web::post().to(auth::login))
                                .route("/me", web::get().to(auth::me)),
                        )
                        .service(
                            web::scope("/posts")
                                .route("", web::get().to(posts::list_posts))
                                .route("", web::post().to(posts::create_post))
                                .route("/drafts", web::get().to(posts::list_drafts))
                                .route("/{id}", web::get().to(posts::get_post))
                                .route("/{id}", web::put().to(posts::update_post))
                                .route("/{id}", web::delete().to(posts::delete_post)),
                        )
                        .service(
                            web::scope("/categories")
                                .route("", web::get().to(categories::list_categories))
                                .route("", web::post().to(categories::create_category))
                                .route("/{id}", web::delete().to(categories::delete_category)),
                        )
                        .service(
                            web::scope("/tags")
                                .route("", web::get().to(tags::list_tags))
                                .route("", web::post().to(tags::create_tags))
                                .route("/{id}", web::delete().to(tags::delete_tag)),
                        ),
                ),
        );
}

/// Malformed JSON bodies answer with a problem document instead of plain text.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

/// Unparseable ids in the path are a client error, not a missing route.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: error::PathError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}
