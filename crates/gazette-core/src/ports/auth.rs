//! Authentication ports: password hashing and the session-token service
//! backing the login cookie.

use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub username: String,
    pub exp: i64,
}

/// Issues and validates the signed tokens stored in the session cookie.
pub trait SessionService: Send + Sync {
    /// Issue a session token for a freshly authenticated user.
    fn issue(&self, user_id: Uuid, username: &str) -> Result<String, AuthError>;

    /// Validate and decode a session token.
    fn decode(&self, token: &str) -> Result<SessionClaims, AuthError>;

    /// Session lifetime, used for the cookie's max-age.
    fn ttl_seconds(&self) -> i64;
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
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
