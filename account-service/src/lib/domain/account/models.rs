use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::EmailError;
use crate::account::errors::UserIdError;

/// User aggregate entity.
///
/// Created on registration with `is_activated = false`; flipped to `true`
/// exactly once when the activation link is visited. The activation link is
/// kept on the row so a second visit still resolves to this user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub is_activated: bool,
    pub activation_link: ActivationLink,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One-time opaque identifier proving control of the registered email.
///
/// Random UUID v4, URL-safe, globally unique with overwhelming probability.
/// Stored on the user row and embedded in the activation mail URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationLink(String);

impl ActivationLink {
    /// Generate a fresh activation link.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a link loaded from storage.
    pub fn from_string(link: String) -> Self {
        Self(link)
    }

    /// Get link as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ActivationLink {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActivationLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Projection of a user containing no secret material.
///
/// This is what gets embedded in tokens and returned to clients. Derived
/// per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserClaims {
    pub id: UserId,
    pub email: String,
    pub is_activated: bool,
}

impl From<&User> for UserClaims {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
            is_activated: user.is_activated,
        }
    }
}

/// Stored refresh-token record: at most one per user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub user_id: UserId,
    pub token: String,
}

/// Validated email/password pair for registration and login.
#[derive(Debug)]
pub struct Credentials {
    pub email: EmailAddress,
    pub password: String,
}

impl Credentials {
    /// Construct credentials from a validated email and a plain password.
    ///
    /// The password is hashed by the service, never stored as given.
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

/// Result of a successful registration, login, or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub tokens: auth::TokenPair,
    pub user: UserClaims,
}
