//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! the JWT token codec, the Argon2 password hasher, and the repositories.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - `minimal` - No external services, in-memory repositories only

pub mod auth;
pub mod database;
pub mod memory;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::DatabaseConnections;
pub use memory::{
    InMemoryCategoryRepository, InMemoryPostRepository, InMemoryTagRepository,
    InMemoryUserRepository,
};
