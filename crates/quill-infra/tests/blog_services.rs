//! Domain services running against the in-memory repositories and the real
//! JWT codec.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::{PostChanges, PostStatus, Principal, User};
use quill_core::ports::{AuthError, BaseRepository, PasswordService, PostFilter};
use quill_core::services::{AuthService, CategoryService, PostService, TagService, UserService};
use quill_infra::{
    Argon2PasswordService, InMemoryCategoryRepository, InMemoryPostRepository,
    InMemoryTagRepository, InMemoryUserRepository, JwtConfig, JwtTokenService,
};

/// Reversible stand-in for Argon2 so the suite stays fast in debug builds.
struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain:{password}"))
    }
}

/// Plain hasher that records how many verifications ran.
#[derive(Default)]
struct CountingPasswords {
    verified: AtomicUsize,
}

impl CountingPasswords {
    fn verified(&self) -> usize {
        self.verified.load(Ordering::SeqCst)
    }
}

impl PasswordService for CountingPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        PlainPasswords.hash(password)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        self.verified.fetch_add(1, Ordering::SeqCst);
        PlainPasswords.verify(password, hash)
    }
}

struct Blog {
    auth: AuthService,
    users: UserService,
    posts: PostService,
    categories: Arc<CategoryService>,
    tags: Arc<TagService>,
    user_repo: Arc<InMemoryUserRepository>,
}

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "01234567890123456789012345678901".to_string(),
        expiration_seconds: 86_400,
        issuer: "quill-test".to_string(),
    }
}

fn blog_with(jwt: JwtConfig, passwords: Arc<dyn PasswordService>) -> Blog {
    let user_repo = Arc::new(InMemoryUserRepository::new());
    let post_repo = Arc::new(InMemoryPostRepository::new());
    let categories = Arc::new(CategoryService::new(
        Arc::new(InMemoryCategoryRepository::new()),
        post_repo.clone(),
    ));
    let tags = Arc::new(TagService::new(
        Arc::new(InMemoryTagRepository::new()),
        post_repo.clone(),
    ));

    Blog {
        auth: AuthService::new(
            user_repo.clone(),
            Arc::new(JwtTokenService::new(jwt)),
            passwords.clone(),
        ),
        users: UserService::new(user_repo.clone(), passwords),
        posts: PostService::new(post_repo, user_repo.clone(), categories.clone(), tags.clone()),
        categories,
        tags,
        user_repo,
    }
}

fn blog() -> Blog {
    blog_with(jwt_config(), Arc::new(PlainPasswords))
}

async fn register(blog: &Blog, name: &str) -> User {
    blog.users
        .register(
            name.to_string(),
            format!("{name}@example.com"),
            "password123",
        )
        .await
        .unwrap()
}

fn changes(title: &str, status: PostStatus, category_id: Uuid, tag_ids: &[Uuid]) -> PostChanges {
    PostChanges {
        title: title.to_string(),
        content: "Some words worth reading here.".to_string(),
        status,
        category_id,
        tag_ids: tag_ids.iter().copied().collect(),
    }
}

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn is_auth_failure(result: &Result<Principal, DomainError>) -> bool {
    matches!(result, Err(DomainError::Auth(AuthError::AuthenticationFailed)))
}

#[tokio::test]
async fn test_issue_then_validate_returns_same_subject() {
    let blog = blog();
    let user = register(&blog, "leon").await;

    let principal = blog
        .auth
        .authenticate("leon@example.com", "password123")
        .await
        .unwrap();
    let issued = blog.auth.issue_token(&principal).unwrap();
    let validated = blog.auth.validate_token(&issued.token).await.unwrap();

    assert_eq!(principal.user_id, user.id);
    assert_eq!(validated, principal);
    assert_eq!(issued.expires_in, 86_400);
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_fail_identically() {
    let blog = blog();
    register(&blog, "leon").await;

    let unknown = blog.auth.authenticate("nobody@example.com", "password123").await;
    let wrong = blog.auth.authenticate("leon@example.com", "password124").await;

    assert!(is_auth_failure(&unknown));
    assert!(is_auth_failure(&wrong));
    assert_eq!(
        unknown.unwrap_err().to_string(),
        wrong.unwrap_err().to_string()
    );
}

#[tokio::test]
async fn test_authenticate_with_argon2_hashes() {
    let blog = blog_with(jwt_config(), Arc::new(Argon2PasswordService::new()));
    register(&blog, "leon").await;

    assert!(
        blog.auth
            .authenticate("leon@example.com", "password123")
            .await
            .is_ok()
    );
    assert!(is_auth_failure(
        &blog.auth.authenticate("leon@example.com", "Password123").await
    ));
}

#[tokio::test]
async fn test_unknown_email_still_runs_the_hasher() {
    let passwords = Arc::new(CountingPasswords::default());
    let blog = blog_with(jwt_config(), passwords.clone());
    register(&blog, "leon").await;

    let before = passwords.verified();
    let unknown = blog.auth.authenticate("nobody@example.com", "password123").await;
    assert!(is_auth_failure(&unknown));
    assert_eq!(passwords.verified(), before + 1);

    let wrong = blog.auth.authenticate("leon@example.com", "password124").await;
    assert!(is_auth_failure(&wrong));
    assert_eq!(passwords.verified(), before + 2);
}

#[tokio::test]
async fn test_unreadable_stored_hash_fails_authentication() {
    let blog = blog_with(jwt_config(), Arc::new(Argon2PasswordService::new()));
    blog.user_repo
        .save(User::new(
            "leon".to_string(),
            "leon@example.com".to_string(),
            "not-a-phc-string".to_string(),
        ))
        .await
        .unwrap();

    let result = blog.auth.authenticate("leon@example.com", "password123").await;

    assert!(is_auth_failure(&result));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let blog = blog();
    register(&blog, "leon").await;

    let result = blog
        .users
        .register(
            "other".to_string(),
            "leon@example.com".to_string(),
            "password123",
        )
        .await;

    assert!(matches!(result, Err(DomainError::Duplicate(_))));
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let blog = blog();
    let user = register(&blog, "leon").await;
    let issued = blog.auth.issue_token(&Principal::user(user.id)).unwrap();

    blog.user_repo.delete(user.id).await.unwrap();

    assert!(is_auth_failure(&blog.auth.validate_token(&issued.token).await));
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let blog = blog_with(
        JwtConfig {
            expiration_seconds: -1,
            ..jwt_config()
        },
        Arc::new(PlainPasswords),
    );
    let user = register(&blog, "leon").await;
    let issued = blog.auth.issue_token(&Principal::user(user.id)).unwrap();

    let result = blog.auth.validate_token(&issued.token).await;

    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::TokenExpired))
    ));
}

#[tokio::test]
async fn test_token_from_other_key_is_rejected() {
    let blog = blog();
    let user = register(&blog, "leon").await;
    let foreign = JwtTokenService::new(JwtConfig {
        secret: "ffffffffffffffffffffffffffffffff".to_string(),
        ..jwt_config()
    });
    let token = quill_core::ports::TokenService::generate_token(&foreign, user.id).unwrap();

    let result = blog.auth.validate_token(&token).await;

    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidToken(_)))
    ));
}

#[tokio::test]
async fn test_only_author_may_update_or_delete() {
    let blog = blog();
    let author = Principal::user(register(&blog, "author").await.id);
    let intruder = Principal::user(register(&blog, "intruder").await.id);
    let category = blog.categories.create_category("Tech".into()).await.unwrap();

    let created = blog
        .posts
        .create_post(
            &author,
            changes("Mine", PostStatus::Published, category.id, &[]),
        )
        .await
        .unwrap();
    let post_id = created.post.id;

    let update = blog
        .posts
        .update_post(
            post_id,
            &intruder,
            changes("Hijacked", PostStatus::Published, category.id, &[]),
        )
        .await;
    assert!(matches!(update, Err(DomainError::Forbidden)));

    let delete = blog.posts.delete_post(post_id, &intruder).await;
    assert!(matches!(delete, Err(DomainError::Forbidden)));

    assert_eq!(blog.posts.get_post(post_id).await.unwrap().post.title, "Mine");

    blog.posts.delete_post(post_id, &author).await.unwrap();
    assert!(matches!(
        blog.posts.get_post(post_id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let blog = blog();
    let author = Principal::user(register(&blog, "author").await.id);

    let result = blog
        .posts
        .update_post(
            Uuid::new_v4(),
            &author,
            changes("Ghost", PostStatus::Draft, Uuid::new_v4(), &[]),
        )
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_update_replaces_fields_category_and_tags() {
    let blog = blog();
    let author = Principal::user(register(&blog, "author").await.id);
    let tech = blog.categories.create_category("Tech".into()).await.unwrap();
    let life = blog.categories.create_category("Life".into()).await.unwrap();
    let tags = blog.tags.create_tags(names(&["rust", "java"])).await.unwrap();
    let rust = tags.iter().find(|t| t.name == "rust").unwrap().id;
    let java = tags.iter().find(|t| t.name == "java").unwrap().id;

    let created = blog
        .posts
        .create_post(
            &author,
            changes("Before", PostStatus::Draft, tech.id, &[rust]),
        )
        .await
        .unwrap();

    let mut update = changes("After", PostStatus::Published, life.id, &[java]);
    update.content = vec!["word"; 201].join(" ");
    let updated = blog
        .posts
        .update_post(created.post.id, &author, update)
        .await
        .unwrap();

    assert_eq!(updated.post.title, "After");
    assert_eq!(updated.post.status, PostStatus::Published);
    assert_eq!(updated.post.reading_time, 2);
    assert_eq!(updated.category.id, life.id);
    assert_eq!(updated.post.tag_ids, BTreeSet::from([java]));
    assert_eq!(updated.tags.len(), 1);
    assert_eq!(updated.author.name, "author");
}

#[tokio::test]
async fn test_update_to_unknown_category_fails() {
    let blog = blog();
    let author = Principal::user(register(&blog, "author").await.id);
    let tech = blog.categories.create_category("Tech".into()).await.unwrap();
    let created = blog
        .posts
        .create_post(&author, changes("Post", PostStatus::Draft, tech.id, &[]))
        .await
        .unwrap();

    let result = blog
        .posts
        .update_post(
            created.post.id,
            &author,
            changes("Post", PostStatus::Draft, Uuid::new_v4(), &[]),
        )
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_create_post_with_unknown_tag_fails() {
    let blog = blog();
    let author = Principal::user(register(&blog, "author").await.id);
    let tech = blog.categories.create_category("Tech".into()).await.unwrap();

    let result = blog
        .posts
        .create_post(
            &author,
            changes("Post", PostStatus::Draft, tech.id, &[Uuid::new_v4()]),
        )
        .await;

    assert!(matches!(
        result,
        Err(DomainError::NotFound {
            entity_type: "Tag",
            ..
        })
    ));
}

#[tokio::test]
async fn test_drafts_are_private_to_their_author() {
    let blog = blog();
    let alice = Principal::user(register(&blog, "alice").await.id);
    let bob = Principal::user(register(&blog, "bob").await.id);
    let tech = blog.categories.create_category("Tech".into()).await.unwrap();

    blog.posts
        .create_post(&alice, changes("A draft", PostStatus::Draft, tech.id, &[]))
        .await
        .unwrap();
    blog.posts
        .create_post(&alice, changes("A live", PostStatus::Published, tech.id, &[]))
        .await
        .unwrap();
    blog.posts
        .create_post(&bob, changes("B draft", PostStatus::Draft, tech.id, &[]))
        .await
        .unwrap();

    let drafts = blog.posts.list_drafts(&alice).await.unwrap();

    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].post.title, "A draft");
}

#[tokio::test]
async fn test_published_listing_filters_with_and() {
    let blog = blog();
    let author = Principal::user(register(&blog, "author").await.id);
    let tech = blog.categories.create_category("Tech".into()).await.unwrap();
    let life = blog.categories.create_category("Life".into()).await.unwrap();
    let tags = blog.tags.create_tags(names(&["movie"])).await.unwrap();
    let movie = tags[0].id;

    let wanted = blog
        .posts
        .create_post(&author, changes("match", PostStatus::Published, tech.id, &[movie]))
        .await
        .unwrap();
    for c in [
        changes("category only", PostStatus::Published, tech.id, &[]),
        changes("tag only", PostStatus::Published, life.id, &[movie]),
        changes("draft", PostStatus::Draft, tech.id, &[movie]),
    ] {
        blog.posts.create_post(&author, c).await.unwrap();
    }

    let both = blog
        .posts
        .list_published(PostFilter {
            category_id: Some(tech.id),
            tag_id: Some(movie),
        })
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].post.id, wanted.post.id);

    let by_category = blog
        .posts
        .list_published(PostFilter {
            category_id: Some(tech.id),
            tag_id: None,
        })
        .await
        .unwrap();
    assert_eq!(by_category.len(), 2);

    let by_tag = blog
        .posts
        .list_published(PostFilter {
            category_id: None,
            tag_id: Some(movie),
        })
        .await
        .unwrap();
    assert_eq!(by_tag.len(), 2);

    let all = blog.posts.list_published(PostFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_published_listing_with_unknown_category() {
    let blog = blog();

    let result = blog
        .posts
        .list_published(PostFilter {
            category_id: Some(Uuid::new_v4()),
            tag_id: None,
        })
        .await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_create_tags_reuses_existing_names() {
    let blog = blog();
    let existing = blog.tags.create_tags(names(&["Java"])).await.unwrap();

    let resolved = blog
        .tags
        .create_tags(names(&["Java", "Spring"]))
        .await
        .unwrap();

    assert_eq!(resolved.len(), 2);
    let java: Vec<_> = resolved.iter().filter(|t| t.name == "Java").collect();
    assert_eq!(java.len(), 1);
    assert_eq!(java[0].id, existing[0].id);
    assert!(resolved.iter().any(|t| t.name == "Spring"));
    assert_eq!(blog.tags.list_tags().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_category_rejects_name_ignoring_case() {
    let blog = blog();
    blog.categories.create_category("Tech".into()).await.unwrap();

    let result = blog.categories.create_category("tECH".into()).await;

    assert!(matches!(result, Err(DomainError::Duplicate(_))));
}

#[tokio::test]
async fn test_delete_guards_referenced_category_and_tag() {
    let blog = blog();
    let author = Principal::user(register(&blog, "author").await.id);
    let used = blog.categories.create_category("Used".into()).await.unwrap();
    let unused = blog.categories.create_category("Unused".into()).await.unwrap();
    let tags = blog.tags.create_tags(names(&["used", "unused"])).await.unwrap();
    let used_tag = tags.iter().find(|t| t.name == "used").unwrap().id;
    let unused_tag = tags.iter().find(|t| t.name == "unused").unwrap().id;

    blog.posts
        .create_post(&author, changes("Post", PostStatus::Draft, used.id, &[used_tag]))
        .await
        .unwrap();

    assert!(matches!(
        blog.categories.delete_category(used.id).await,
        Err(DomainError::Conflict(_))
    ));
    assert!(matches!(
        blog.tags.delete_tag(used_tag).await,
        Err(DomainError::Conflict(_))
    ));

    blog.categories.delete_category(unused.id).await.unwrap();
    blog.tags.delete_tag(unused_tag).await.unwrap();
    assert!(blog.categories.get_category(unused.id).await.is_err());
    assert!(blog.tags.get_tag(unused_tag).await.is_err());

    // Unknown ids are silently ignored.
    blog.categories.delete_category(Uuid::new_v4()).await.unwrap();
    blog.tags.delete_tag(Uuid::new_v4()).await.unwrap();

    let listed = blog.categories.list_categories().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].post_count, 1);
}
