//! Tag lifecycle.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Tag, WithPostCount};
use crate::error::DomainError;
use crate::ports::{PostRepository, TagRepository};

pub struct TagService {
    tags: Arc<dyn TagRepository>,
    posts: Arc<dyn PostRepository>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { tags, posts }
    }

    pub async fn list_tags(&self) -> Result<Vec<WithPostCount<Tag>>, DomainError> {
        let tags = self.tags.find_all().await?;
        let mut listed = Vec::with_capacity(tags.len());
        for tag in tags {
            let post_count = self.posts.count_by_tag(tag.id).await?;
            listed.push(WithPostCount {
                entity: tag,
                post_count,
            });
        }
        Ok(listed)
    }

    /// Resolve `names` to tags, creating only the names not stored yet.
    ///
    /// Matching is exact (case-sensitive). The result holds one tag per
    /// requested name.
    pub async fn create_tags(&self, names: BTreeSet<String>) -> Result<Vec<Tag>, DomainError> {
        let mut by_name: BTreeMap<String, Tag> = self
            .tags
            .find_by_names(&names)
            .await?
            .into_iter()
            .map(|tag| (tag.name.clone(), tag))
            .collect();

        let novel: Vec<Tag> = names
            .iter()
            .filter(|name| !by_name.contains_key(name.as_str()))
            .map(|name| Tag::new(name.clone()))
            .collect();

        if !novel.is_empty() {
            let created = self.tags.save_all(novel).await?;
            tracing::info!(count = created.len(), "Tags created");
            for tag in created {
                by_name.entry(tag.name.clone()).or_insert(tag);
            }
        }

        Ok(by_name
            .into_values()
            .filter(|tag| names.contains(&tag.name))
            .collect())
    }

    pub async fn get_tag(&self, id: Uuid) -> Result<Tag, DomainError> {
        self.tags
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag", id))
    }

    /// Resolve every id in `ids`; fails on the first id with no tag.
    pub async fn get_tags(&self, ids: &BTreeSet<Uuid>) -> Result<Vec<Tag>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let tags = self.tags.find_by_ids(ids).await?;
        let found: BTreeSet<Uuid> = tags.iter().map(|t| t.id).collect();
        if let Some(missing) = ids.difference(&found).next() {
            return Err(DomainError::not_found("Tag", *missing));
        }
        Ok(tags)
    }

    /// Delete a tag. Unknown ids are a no-op; a tag still attached to any
    /// post is kept and `Conflict` is returned.
    pub async fn delete_tag(&self, id: Uuid) -> Result<(), DomainError> {
        if self.tags.find_by_id(id).await?.is_none() {
            tracing::debug!(tag_id = %id, "Delete of unknown tag ignored");
            return Ok(());
        }

        if self.posts.count_by_tag(id).await? > 0 {
            return Err(DomainError::Conflict(
                "Tag has posts associated with it".to_string(),
            ));
        }

        self.tags.delete(id).await?;
        tracing::info!(tag_id = %id, "Tag deleted");
        Ok(())
    }
}
