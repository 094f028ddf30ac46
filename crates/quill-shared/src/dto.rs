//! Data Transfer Objects - request/response types for the API.
//!
//! Field names are camelCase on the wire.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 20, message = "Name must be between 3 and 20 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expires_in: i64,
}

/// The caller's own profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Roles granted to the caller for this session.
    #[serde(default)]
    pub authorities: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Publication state on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatusDto {
    Draft,
    Published,
}

/// Body of post create and update requests.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"))]
    pub title: String,
    #[validate(length(
        min = 10,
        max = 50000,
        message = "Content must be between 10 and 50000 characters"
    ))]
    pub content: String,
    pub category_id: Uuid,
    #[serde(default)]
    #[validate(length(max = 10, message = "Maximum 10 tags allowed"))]
    pub tag_ids: BTreeSet<Uuid>,
    pub status: PostStatusDto,
}

/// Query string of the published-post listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostQuery {
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: String,
}

/// Category or tag reference embedded in a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: AuthorDto,
    pub category: NamedRef,
    pub tags: Vec<NamedRef>,
    pub reading_time: u32,
    pub status: PostStatusDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 2, max = 50, message = "Category name must be between 2 and 50 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTagsRequest {
    #[validate(
        length(min = 1, max = 10, message = "Between 1 and 10 tag names are allowed"),
        custom(function = "validate_tag_names")
    )]
    pub names: BTreeSet<String>,
}

fn validate_tag_names(names: &BTreeSet<String>) -> Result<(), ValidationError> {
    let len_ok = |name: &String| (2..=30).contains(&name.chars().count());
    if names.iter().all(len_ok) {
        return Ok(());
    }
    let mut error = ValidationError::new("tag_name_length");
    error.message = Some("Tag names must be between 2 and 30 characters".into());
    Err(error)
}

/// Category or tag with the number of posts referencing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyResponse {
    pub id: Uuid,
    pub name: String,
    pub post_count: u64,
}

/// Flatten validator output into user-facing messages, sorted for stable output.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_rules() {
        assert!(register("leon", "leon@gmail.com", "password").validate().is_ok());

        let errors = register("le", "not-an-email", "short").validate().unwrap_err();
        let messages = validation_messages(&errors);

        assert_eq!(
            messages,
            vec![
                "Invalid email format".to_string(),
                "Name must be between 3 and 20 characters".to_string(),
                "Password must be at least 8 characters".to_string(),
            ]
        );
    }

    #[test]
    fn test_tag_name_rules() {
        let ok = CreateTagsRequest {
            names: BTreeSet::from(["rust".to_string(), "go".to_string()]),
        };
        let too_short = CreateTagsRequest {
            names: BTreeSet::from(["r".to_string()]),
        };
        let empty = CreateTagsRequest {
            names: BTreeSet::new(),
        };

        assert!(ok.validate().is_ok());
        assert!(too_short.validate().is_err());
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_post_request_wire_format() {
        let body = serde_json::json!({
            "title": "Hello world",
            "content": "Long enough content",
            "categoryId": "7f9c24e5-2a1b-4c69-8f0e-6a3d1c2b9e10",
            "status": "PUBLISHED"
        });

        let request: PostRequest = serde_json::from_value(body).unwrap();

        assert!(request.tag_ids.is_empty());
        assert_eq!(request.status, PostStatusDto::Published);
        assert!(request.validate().is_ok());
    }
}
