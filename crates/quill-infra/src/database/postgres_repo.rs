//! PostgreSQL repository implementations.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, OnConflict, Query};
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Category, Post, PostStatus, Tag, User, mask_email};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CategoryRepository, PostFilter, PostRepository, TagRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn exists_by_name_ignore_case(&self, name: &str) -> Result<bool, RepoError> {
        let count = CategoryEntity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(category::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .count(&self.db)
            .await
            .map_err(query_error)?;

        Ok(count > 0)
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_all(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_ids(&self, ids: &BTreeSet<Uuid>) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_names(&self, names: &BTreeSet<String>) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Name.is_in(names.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save_all(&self, tags: Vec<Tag>) -> Result<Vec<Tag>, RepoError> {
        if tags.is_empty() {
            return Ok(tags);
        }

        let models: Vec<tag::ActiveModel> = tags.iter().cloned().map(Into::into).collect();
        TagEntity::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(write_error)?;

        Ok(tags)
    }
}

/// PostgreSQL post repository. A post row and its `post_tags` rows are
/// written in one transaction.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Attach tag ids to each post row.
    async fn hydrate(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let links = PostTagEntity::find()
            .filter(post_tag::Column::PostId.is_in(post_ids))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let mut tags_by_post: HashMap<Uuid, BTreeSet<Uuid>> = HashMap::new();
        for link in links {
            tags_by_post
                .entry(link.post_id)
                .or_default()
                .insert(link.tag_id);
        }

        models
            .into_iter()
            .map(|model| {
                let tag_ids = tags_by_post.remove(&model.id).unwrap_or_default();
                model.into_domain(tag_ids)
            })
            .collect()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?
        else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![model]).await?.pop())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let active_model: post::ActiveModel = (&entity).into();
        let on_conflict = OnConflict::column(post::Column::Id)
            .update_columns([
                post::Column::CategoryId,
                post::Column::Title,
                post::Column::Content,
                post::Column::Status,
                post::Column::ReadingTime,
                post::Column::UpdatedAt,
            ])
            .to_owned();
        PostEntity::insert(active_model)
            .on_conflict(on_conflict)
            .exec(&txn)
            .await
            .map_err(write_error)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(entity.id))
            .exec(&txn)
            .await
            .map_err(query_error)?;

        if !entity.tag_ids.is_empty() {
            let links = entity.tag_ids.iter().map(|tag_id| post_tag::ActiveModel {
                post_id: Set(entity.id),
                tag_id: Set(*tag_id),
            });
            PostTagEntity::insert_many(links)
                .exec(&txn)
                .await
                .map_err(write_error)?;
        }

        txn.commit().await.map_err(query_error)?;
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(query_error)?;

        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(query_error)?;
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(query_error)?;
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_status(
        &self,
        status: PostStatus,
        filter: PostFilter,
    ) -> Result<Vec<Post>, RepoError> {
        let mut query = PostEntity::find().filter(post::Column::Status.eq(status.as_str()));

        if let Some(category_id) = filter.category_id {
            query = query.filter(post::Column::CategoryId.eq(category_id));
        }

        if let Some(tag_id) = filter.tag_id {
            query = query.filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::PostId)
                        .from(PostTagEntity)
                        .and_where(post_tag::Column::TagId.eq(tag_id))
                        .to_owned(),
                ),
            );
        }

        let models = query
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        self.hydrate(models).await
    }

    async fn find_by_author_and_status(
        &self,
        author_id: Uuid,
        status: PostStatus,
    ) -> Result<Vec<Post>, RepoError> {
        let models = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .filter(post::Column::Status.eq(status.as_str()))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        self.hydrate(models).await
    }

    async fn count_by_category(&self, category_id: Uuid) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::CategoryId.eq(category_id))
            .count(&self.db)
            .await
            .map_err(query_error)
    }

    async fn count_by_tag(&self, tag_id: Uuid) -> Result<u64, RepoError> {
        PostTagEntity::find()
            .filter(post_tag::Column::TagId.eq(tag_id))
            .count(&self.db)
            .await
            .map_err(query_error)
    }
}
