//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    CategoryRepository, PasswordService, PostRepository, TagRepository, TokenService,
    UserRepository,
};
use quill_core::services::{AuthService, CategoryService, PostService, TagService, UserService};
use quill_infra::database::DatabaseConfig;
use quill_infra::{
    Argon2PasswordService, InMemoryCategoryRepository, InMemoryPostRepository,
    InMemoryTagRepository, InMemoryUserRepository, JwtConfig, JwtTokenService,
};

#[cfg(feature = "postgres")]
use quill_infra::database::{
    DatabaseConnections, PostgresCategoryRepository, PostgresPostRepository,
    PostgresTagRepository, PostgresUserRepository,
};

/// Storage adapters behind the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            categories: Arc::new(InMemoryCategoryRepository::new()),
            tags: Arc::new(InMemoryTagRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(connections: &DatabaseConnections) -> Self {
        let db = &connections.main;
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
            tags: Arc::new(PostgresTagRepository::new(db.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub categories: Arc<CategoryService>,
    pub tags: Arc<TagService>,
}

impl AppState {
    /// Wire the services over the given adapters.
    pub fn build(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        let categories = Arc::new(CategoryService::new(
            repos.categories.clone(),
            repos.posts.clone(),
        ));
        let tags = Arc::new(TagService::new(repos.tags.clone(), repos.posts.clone()));
        let posts = Arc::new(PostService::new(
            repos.posts.clone(),
            repos.users.clone(),
            categories.clone(),
            tags.clone(),
        ));

        Self {
            auth: Arc::new(AuthService::new(
                repos.users.clone(),
                tokens,
                passwords.clone(),
            )),
            users: Arc::new(UserService::new(repos.users, passwords)),
            posts,
            categories,
            tags,
        }
    }

    /// In-memory state with the production token codec and hasher.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        Self::build(
            Repositories::in_memory(),
            Arc::new(JwtTokenService::new(jwt)),
            Arc::new(Argon2PasswordService::new()),
        )
    }

    /// Build the application state, falling back to in-memory storage when
    /// the database is not configured or unreachable.
    pub async fn new(db_config: Option<&DatabaseConfig>, jwt: JwtConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(jwt));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "postgres")]
        let repos = match db_config {
            Some(config) => match DatabaseConnections::init(config).await {
                Ok(connections) => Repositories::postgres(&connections),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Repositories::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Repositories::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Repositories::in_memory()
        };

        tracing::info!("Application state initialized");
        Self::build(repos, tokens, passwords)
    }
}
