use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, Post, PostStatus, Tag};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CategoryRepository, PostFilter, PostRepository, TagRepository,
};

fn remove_or_not_found<T>(store: &mut HashMap<Uuid, T>, id: Uuid) -> Result<(), RepoError> {
    store.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
}

/// In-memory post store.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, as the SQL repositories order them.
fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        self.store.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        remove_or_not_found(&mut *self.store.write().await, id)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_status(
        &self,
        status: PostStatus,
        filter: PostFilter,
    ) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let posts = store
            .values()
            .filter(|p| p.status == status)
            .filter(|p| filter.category_id.is_none_or(|c| p.category_id == c))
            .filter(|p| filter.tag_id.is_none_or(|t| p.tag_ids.contains(&t)))
            .cloned()
            .collect();
        Ok(newest_first(posts))
    }

    async fn find_by_author_and_status(
        &self,
        author_id: Uuid,
        status: PostStatus,
    ) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let posts = store
            .values()
            .filter(|p| p.author_id == author_id && p.status == status)
            .cloned()
            .collect();
        Ok(newest_first(posts))
    }

    async fn count_by_category(&self, category_id: Uuid) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|p| p.category_id == category_id).count() as u64)
    }

    async fn count_by_tag(&self, tag_id: Uuid) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|p| p.tag_ids.contains(&tag_id)).count() as u64)
    }
}

/// In-memory category store.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    store: RwLock<HashMap<Uuid, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        self.store.write().await.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        remove_or_not_found(&mut *self.store.write().await, id)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories: Vec<Category> = self.store.read().await.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn exists_by_name_ignore_case(&self, name: &str) -> Result<bool, RepoError> {
        let wanted = name.to_lowercase();
        Ok(self
            .store
            .read()
            .await
            .values()
            .any(|c| c.name.to_lowercase() == wanted))
    }
}

/// In-memory tag store.
#[derive(Default)]
pub struct InMemoryTagRepository {
    store: RwLock<HashMap<Uuid, Tag>>,
}

impl InMemoryTagRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryTagRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, tag: Tag) -> Result<Tag, RepoError> {
        self.store.write().await.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        remove_or_not_found(&mut *self.store.write().await, id)
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_all(&self) -> Result<Vec<Tag>, RepoError> {
        let mut tags: Vec<Tag> = self.store.read().await.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn find_by_ids(&self, ids: &BTreeSet<Uuid>) -> Result<Vec<Tag>, RepoError> {
        let store = self.store.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }

    async fn find_by_names(&self, names: &BTreeSet<String>) -> Result<Vec<Tag>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|t| names.contains(&t.name))
            .cloned()
            .collect())
    }

    async fn save_all(&self, tags: Vec<Tag>) -> Result<Vec<Tag>, RepoError> {
        let mut store = self.store.write().await;
        for tag in &tags {
            store.insert(tag.id, tag.clone());
        }
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::PostChanges;

    fn post(status: PostStatus, category_id: Uuid, tag_ids: &[Uuid]) -> Post {
        Post::new(
            Uuid::new_v4(),
            PostChanges {
                title: "Title".to_string(),
                content: "Some content here".to_string(),
                status,
                category_id,
                tag_ids: tag_ids.iter().copied().collect(),
            },
        )
    }

    #[tokio::test]
    async fn test_find_by_status_combines_filters_with_and() {
        let repo = InMemoryPostRepository::new();
        let (cat_a, cat_b) = (Uuid::new_v4(), Uuid::new_v4());
        let (tag_x, tag_y) = (Uuid::new_v4(), Uuid::new_v4());

        let both = repo
            .save(post(PostStatus::Published, cat_a, &[tag_x]))
            .await
            .unwrap();
        repo.save(post(PostStatus::Published, cat_a, &[tag_y]))
            .await
            .unwrap();
        repo.save(post(PostStatus::Published, cat_b, &[tag_x]))
            .await
            .unwrap();
        repo.save(post(PostStatus::Draft, cat_a, &[tag_x]))
            .await
            .unwrap();

        let filter = PostFilter {
            category_id: Some(cat_a),
            tag_id: Some(tag_x),
        };
        let found = repo
            .find_by_status(PostStatus::Published, filter)
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, both.id);

        let all = repo
            .find_by_status(PostStatus::Published, PostFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_counts_include_drafts() {
        let repo = InMemoryPostRepository::new();
        let category = Uuid::new_v4();
        let tag = Uuid::new_v4();

        repo.save(post(PostStatus::Draft, category, &[tag]))
            .await
            .unwrap();

        assert_eq!(repo.count_by_category(category).await.unwrap(), 1);
        assert_eq!(repo.count_by_tag(tag).await.unwrap(), 1);
        assert_eq!(repo.count_by_tag(Uuid::new_v4()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_category_name_check_ignores_case() {
        let repo = InMemoryCategoryRepository::new();
        repo.save(Category::new("Tech".to_string())).await.unwrap();

        assert!(repo.exists_by_name_ignore_case("tech").await.unwrap());
        assert!(repo.exists_by_name_ignore_case("TECH").await.unwrap());
        assert!(!repo.exists_by_name_ignore_case("Travel").await.unwrap());
    }

    #[tokio::test]
    async fn test_tag_names_match_exactly() {
        let repo = InMemoryTagRepository::new();
        repo.save(Tag::new("Java".to_string())).await.unwrap();

        let names = BTreeSet::from(["java".to_string(), "Java".to_string()]);
        let found = repo.find_by_names(&names).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Java");
    }
}
