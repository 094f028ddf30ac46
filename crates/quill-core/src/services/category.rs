//! Category lifecycle.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Category, WithPostCount};
use crate::error::DomainError;
use crate::ports::{CategoryRepository, PostRepository};

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { categories, posts }
    }

    pub async fn list_categories(&self) -> Result<Vec<WithPostCount<Category>>, DomainError> {
        let categories = self.categories.find_all().await?;
        let mut listed = Vec::with_capacity(categories.len());
        for category in categories {
            let post_count = self.posts.count_by_category(category.id).await?;
            listed.push(WithPostCount {
                entity: category,
                post_count,
            });
        }
        Ok(listed)
    }

    /// Create a category. Names are unique ignoring case.
    pub async fn create_category(&self, name: String) -> Result<Category, DomainError> {
        if self.categories.exists_by_name_ignore_case(&name).await? {
            return Err(DomainError::Duplicate(format!(
                "Category already exists with name: {name}"
            )));
        }

        let category = self.categories.save(Category::new(name)).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn get_category(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    /// Delete a category. Unknown ids are a no-op; a category still
    /// referenced by any post is kept and `Conflict` is returned.
    pub async fn delete_category(&self, id: Uuid) -> Result<(), DomainError> {
        if self.categories.find_by_id(id).await?.is_none() {
            tracing::debug!(category_id = %id, "Delete of unknown category ignored");
            return Ok(());
        }

        let post_count = self.posts.count_by_category(id).await?;
        if post_count > 0 {
            return Err(DomainError::Conflict(
                "Category has posts associated with it".to_string(),
            ));
        }

        self.categories.delete(id).await?;
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
