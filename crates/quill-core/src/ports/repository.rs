use std::collections::BTreeSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Post, PostStatus, Tag, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Optional narrowing of the published-post listing. Filters combine with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
}

/// Post repository. Saving a post persists its tag references with it.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts with `status`, narrowed by `filter`.
    async fn find_by_status(
        &self,
        status: PostStatus,
        filter: PostFilter,
    ) -> Result<Vec<Post>, RepoError>;

    async fn find_by_author_and_status(
        &self,
        author_id: Uuid,
        status: PostStatus,
    ) -> Result<Vec<Post>, RepoError>;

    /// Number of posts (any status) in the category.
    async fn count_by_category(&self, category_id: Uuid) -> Result<u64, RepoError>;

    /// Number of posts (any status) carrying the tag.
    async fn count_by_tag(&self, tag_id: Uuid) -> Result<u64, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_all(&self) -> Result<Vec<Category>, RepoError>;

    async fn exists_by_name_ignore_case(&self, name: &str) -> Result<bool, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_all(&self) -> Result<Vec<Tag>, RepoError>;

    /// Tags whose id is in `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &BTreeSet<Uuid>) -> Result<Vec<Tag>, RepoError>;

    /// Tags whose name exactly matches one of `names`.
    async fn find_by_names(&self, names: &BTreeSet<String>) -> Result<Vec<Tag>, RepoError>;

    async fn save_all(&self, tags: Vec<Tag>) -> Result<Vec<Tag>, RepoError>;
}
