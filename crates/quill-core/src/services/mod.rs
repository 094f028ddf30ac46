//! Domain services - orchestrate ports and enforce the business rules.
//!
//! Authentication lives in [`AuthService`]; the ownership check on post
//! mutation lives in [`PostService`]; the referential-integrity guards live
//! in [`CategoryService`] and [`TagService`].

mod auth;
mod category;
mod post;
mod tag;
mod user;

pub use auth::{AuthService, DUMMY_PASSWORD_HASH, IssuedToken};
pub use category::CategoryService;
pub use post::PostService;
pub use tag::TagService;
pub use user::UserService;
