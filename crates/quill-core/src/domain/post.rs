use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorSummary, Category, Tag};

/// Average reading speed used for `reading_time`.
pub const WORDS_PER_MINUTE: usize = 200;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(PostStatus::Draft),
            "PUBLISHED" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status '{other}'")),
        }
    }
}

/// Minutes needed to read `content`: whitespace-delimited words over
/// [`WORDS_PER_MINUTE`], rounded up. Empty content reads in zero minutes.
pub fn reading_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE) as u32
}

/// The editable fields of a post, as supplied on create and update.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub category_id: Uuid,
    pub tag_ids: BTreeSet<Uuid>,
}

/// Post entity - a blog post owned by its author.
///
/// `author_id` is fixed at creation. Category and tags are referenced by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub tag_ids: BTreeSet<Uuid>,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub reading_time: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post authored by `author_id`.
    pub fn new(author_id: Uuid, changes: PostChanges) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            category_id: changes.category_id,
            tag_ids: changes.tag_ids,
            reading_time: reading_time(&changes.content),
            title: changes.title,
            content: changes.content,
            status: changes.status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Overwrite the text fields and recompute the reading time.
    /// Category and tag references are left to the caller.
    pub fn apply_text(&mut self, title: String, content: String, status: PostStatus) {
        self.reading_time = reading_time(&content);
        self.title = title;
        self.content = content;
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// A post with its author, category and tags resolved.
#[derive(Debug, Clone)]
pub struct PostDetails {
    pub post: Post,
    pub author: AuthorSummary,
    pub category: Category,
    pub tags: Vec<Tag>,
}
