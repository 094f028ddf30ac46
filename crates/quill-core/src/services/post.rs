//! Post orchestration and the author-only mutation rule.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, PostChanges, PostDetails, PostStatus, Principal};
use crate::error::DomainError;
use crate::ports::{PostFilter, PostRepository, UserRepository};

use super::{CategoryService, TagService};

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    categories: Arc<CategoryService>,
    tags: Arc<TagService>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        categories: Arc<CategoryService>,
        tags: Arc<TagService>,
    ) -> Self {
        Self {
            posts,
            users,
            categories,
            tags,
        }
    }

    pub async fn get_post(&self, id: Uuid) -> Result<PostDetails, DomainError> {
        let post = self.load(id).await?;
        self.details(post).await
    }

    /// Published posts, optionally narrowed to a category and/or a tag.
    /// Both filters together mean category AND tag.
    pub async fn list_published(&self, filter: PostFilter) -> Result<Vec<PostDetails>, DomainError> {
        if let Some(category_id) = filter.category_id {
            self.categories.get_category(category_id).await?;
        }
        if let Some(tag_id) = filter.tag_id {
            self.tags.get_tag(tag_id).await?;
        }

        let posts = self
            .posts
            .find_by_status(PostStatus::Published, filter)
            .await?;
        self.details_all(posts).await
    }

    /// The requester's own drafts.
    pub async fn list_drafts(&self, requester: &Principal) -> Result<Vec<PostDetails>, DomainError> {
        let posts = self
            .posts
            .find_by_author_and_status(requester.user_id, PostStatus::Draft)
            .await?;
        self.details_all(posts).await
    }

    pub async fn create_post(
        &self,
        requester: &Principal,
        changes: PostChanges,
    ) -> Result<PostDetails, DomainError> {
        self.categories.get_category(changes.category_id).await?;
        self.tags.get_tags(&changes.tag_ids).await?;

        let post = self.posts.save(Post::new(requester.user_id, changes)).await?;
        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");
        self.details(post).await
    }

    /// Update a post. Only its author may do so.
    ///
    /// Category and tags are re-resolved only when the requested ids differ
    /// from the stored ones.
    pub async fn update_post(
        &self,
        id: Uuid,
        requester: &Principal,
        changes: PostChanges,
    ) -> Result<PostDetails, DomainError> {
        let mut post = self.load(id).await?;
        ensure_author(&post, requester)?;

        post.apply_text(changes.title, changes.content, changes.status);

        if post.category_id != changes.category_id {
            let category = self.categories.get_category(changes.category_id).await?;
            post.category_id = category.id;
        }

        if post.tag_ids != changes.tag_ids {
            let tags = self.tags.get_tags(&changes.tag_ids).await?;
            post.tag_ids = tags.into_iter().map(|t| t.id).collect();
        }

        let post = self.posts.save(post).await?;
        tracing::info!(post_id = %post.id, "Post updated");
        self.details(post).await
    }

    /// Delete a post. Only its author may do so.
    pub async fn delete_post(&self, id: Uuid, requester: &Principal) -> Result<(), DomainError> {
        let post = self.load(id).await?;
        ensure_author(&post, requester)?;

        self.posts.delete(post.id).await?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    async fn details_all(&self, posts: Vec<Post>) -> Result<Vec<PostDetails>, DomainError> {
        let mut resolved = Vec::with_capacity(posts.len());
        for post in posts {
            resolved.push(self.details(post).await?);
        }
        Ok(resolved)
    }

    async fn details(&self, post: Post) -> Result<PostDetails, DomainError> {
        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("post {} has no author", post.id)))?;
        let category = self.categories.get_category(post.category_id).await?;
        let tags = self.tags.get_tags(&post.tag_ids).await?;

        Ok(PostDetails {
            author: author.summary(),
            category,
            tags,
            post,
        })
    }
}

fn ensure_author(post: &Post, requester: &Principal) -> Result<(), DomainError> {
    if post.is_authored_by(requester.user_id) {
        return Ok(());
    }
    tracing::warn!(
        post_id = %post.id,
        requester_id = %requester.user_id,
        "Rejected mutation of another author's post"
    );
    Err(DomainError::Forbidden)
}
