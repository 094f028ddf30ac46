//! Credential verification, token issuance and token validation.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Principal, mask_email};
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

/// Well-formed Argon2id hash (default parameters) matching no password.
/// Verified against when the email is unknown.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$9C0Aga91TrTfOc1Nr+xs8g$Zy8veBw8FDwTTXePT0clnTqrayUAYjuJ8409i0Q6iVY";

/// A freshly issued session token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Authentication service.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    /// Check `email`/`password` against the credential store.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Principal, DomainError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!(user_email = %mask_email(email), "Login for unknown email");
            // Unknown emails cost one verification, like known ones.
            let _ = self.passwords.verify(password, DUMMY_PASSWORD_HASH);
            return Err(AuthError::AuthenticationFailed.into());
        };

        match self.passwords.verify(password, &user.password_hash) {
            Ok(true) => Ok(Principal::user(user.id)),
            Ok(false) => {
                tracing::debug!(user_id = %user.id, "Login with wrong password");
                Err(AuthError::AuthenticationFailed.into())
            }
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
                Err(AuthError::AuthenticationFailed.into())
            }
        }
    }

    /// Issue a token whose subject is the principal's user id.
    pub fn issue_token(&self, principal: &Principal) -> Result<IssuedToken, DomainError> {
        let token = self.tokens.generate_token(principal.user_id)?;
        Ok(IssuedToken {
            token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    /// Decode `token` and re-resolve its subject.
    ///
    /// A user deleted after issuance is rejected even while the token is
    /// still within its lifetime.
    pub async fn validate_token(&self, token: &str) -> Result<Principal, DomainError> {
        let claims = self.tokens.validate_token(token)?;
        self.resolve(claims.subject).await
    }

    async fn resolve(&self, user_id: Uuid) -> Result<Principal, DomainError> {
        match self.users.find_by_id(user_id).await? {
            Some(user) => Ok(Principal::user(user.id)),
            None => {
                tracing::debug!(%user_id, "Token subject no longer exists");
                Err(AuthError::AuthenticationFailed.into())
            }
        }
    }
}
