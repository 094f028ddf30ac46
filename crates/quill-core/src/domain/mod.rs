//! Domain entities - the core business objects.

mod category;
mod post;
mod principal;
mod tag;
mod user;

pub use category::Category;
pub use post::{Post, PostChanges, PostDetails, PostStatus, WORDS_PER_MINUTE, reading_time};
pub use principal::{Principal, ROLE_USER};
pub use tag::Tag;
pub use user::{AuthorSummary, User, mask_email};

/// A category or tag together with the number of posts referencing it.
#[derive(Debug, Clone)]
pub struct WithPostCount<T> {
    pub entity: T,
    pub post_count: u64,
}
