//! SeaORM entities for the blog schema.

pub mod category;
pub mod post;
pub mod post_tag;
pub mod tag;
pub mod user;
