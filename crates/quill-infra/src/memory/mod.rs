//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Data is lost on process restart.

mod blog;
mod user;

pub use blog::{InMemoryCategoryRepository, InMemoryPostRepository, InMemoryTagRepository};
pub use user::InMemoryUserRepository;
