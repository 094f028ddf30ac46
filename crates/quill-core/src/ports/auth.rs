//! Authentication ports: the token codec and the password hasher.

use uuid::Uuid;

/// Claims recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Stable user id the token was issued for.
    pub subject: Uuid,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Signed, expiring, stateless session tokens.
pub trait TokenService: Send + Sync {
    /// Issue a token for `subject`, valid from now for the configured lifetime.
    fn generate_token(&self, subject: Uuid) -> Result<String, AuthError>;

    /// Verify signature, structure and expiry, then decode the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Token lifetime in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email, wrong password, or a token for a user that no longer
    /// exists. Deliberately carries no detail.
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}

impl AuthError {
    /// Whether this error means the caller is not (or no longer) authenticated,
    /// as opposed to a server-side failure.
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, AuthError::HashingError(_))
    }
}
