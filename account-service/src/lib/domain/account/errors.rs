use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for activation mail delivery
#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error("Failed to build mail message: {0}")]
    BuildFailed(String),

    #[error("Failed to send mail: {0}")]
    SendFailed(String),
}

/// Top-level error for all authentication operations.
///
/// Caller-input errors (`EmailInUse`, `NotFound`, `InvalidCredentials`,
/// `InvalidActivationLink`, `Unauthenticated`) are returned as typed results
/// for the routing layer to translate into status codes. `Database` and
/// `Internal` are logged with full context and surfaced opaque.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    // Domain-level errors
    #[error("Email already registered: {0}")]
    EmailInUse(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid activation link")]
    InvalidActivationLink,

    #[error("Not authenticated")]
    Unauthenticated,

    // Infrastructure errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Internal(err.to_string())
    }
}
