//! User registration and lookup.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{User, mask_email};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, UserRepository};

pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Register a new user.
    ///
    /// The email check and the insert are not atomic; a concurrent
    /// registration can only be caught by a storage-level unique constraint,
    /// which surfaces here as `Duplicate` as well.
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: &str,
    ) -> Result<User, DomainError> {
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self.passwords.hash(password)?;
        let user = User::new(name, email, password_hash);

        let saved = self.users.save(user).await.map_err(|e| match e {
            RepoError::Constraint(_) => {
                DomainError::Duplicate("Email already registered".to_string())
            }
            other => other.into(),
        })?;

        tracing::info!(user_id = %saved.id, user_email = %mask_email(&saved.email), "User registered");
        Ok(saved)
    }
}
