use async_trait::async_trait;

use crate::account::errors::AuthError;
use crate::account::errors::MailError;
use crate::account::models::AuthSession;
use crate::account::models::Credentials;
use crate::account::models::RefreshTokenRecord;
use crate::account::models::User;
use crate::account::models::UserClaims;
use crate::account::models::UserId;

/// Port for the authentication use cases.
///
/// The only surface exposed to the routing layer.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and open a session.
    ///
    /// Creates the user unactivated, dispatches the activation mail (a
    /// delivery failure is logged, not escalated), issues a token pair and
    /// persists the refresh token.
    ///
    /// # Errors
    /// * `EmailInUse` - Email is already registered
    /// * `Database` / `Internal` - Store or hashing/signing failure
    async fn register(&self, credentials: Credentials) -> Result<AuthSession, AuthError>;

    /// Mark the user owning `link` as activated.
    ///
    /// Idempotent: a second call with the same link still resolves the user
    /// and makes no further change.
    ///
    /// # Errors
    /// * `InvalidActivationLink` - No user owns this link
    /// * `Database` - Store failure
    async fn activate(&self, link: &str) -> Result<(), AuthError>;

    /// Verify credentials and open a session, overwriting any stored
    /// refresh token for the user.
    ///
    /// # Errors
    /// * `NotFound` - No user with this email
    /// * `InvalidCredentials` - Password mismatch
    /// * `Database` / `Internal` - Store or hashing/signing failure
    async fn login(&self, credentials: Credentials) -> Result<AuthSession, AuthError>;

    /// Remove the stored refresh token. Idempotent; succeeds whether or not
    /// the token was present.
    ///
    /// # Errors
    /// * `Database` - Store failure
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Exchange a refresh token for a new pair, rotating the stored token.
    ///
    /// The token must carry a valid signature AND still exist in the store;
    /// a rotated-out token keeps a valid signature until natural expiry, so
    /// both checks are required. Claims are rebuilt from the current user
    /// row to reflect the latest activation state.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token absent, invalid, revoked, or superseded
    /// * `Database` / `Internal` - Store or signing failure
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError>;

    /// Verify an access token statelessly (signature + expiry, no store
    /// lookup). Used by the routing layer's middleware.
    ///
    /// # Errors
    /// * `Unauthenticated` - Bad signature, expired, or malformed
    fn verify_access_token(&self, token: &str) -> Result<UserClaims, AuthError>;

    /// List all registered users as claim projections.
    ///
    /// # Errors
    /// * `Database` - Store failure
    async fn list_users(&self) -> Result<Vec<UserClaims>, AuthError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailInUse` - Email is already registered
    /// * `Database` - Store failure
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `Database` - Store failure
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    /// Retrieve user by email address.
    ///
    /// # Errors
    /// * `Database` - Store failure
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Retrieve user by activation link.
    ///
    /// # Errors
    /// * `Database` - Store failure
    async fn find_by_activation_link(&self, link: &str) -> Result<Option<User>, AuthError>;

    /// Update existing user in storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Store failure
    async fn update(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve all users from storage.
    ///
    /// # Errors
    /// * `Database` - Store failure
    async fn list_all(&self) -> Result<Vec<User>, AuthError>;
}

/// Durable mapping from user to current refresh token.
///
/// The upsert-by-user is the rotation point: at most one valid token per
/// user, last writer wins.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Insert or overwrite the stored token for `user_id`.
    ///
    /// # Errors
    /// * `Database` - Store failure
    async fn upsert(&self, user_id: &UserId, token: &str) -> Result<(), AuthError>;

    /// Delete the matching record if present; absent is a no-op.
    ///
    /// # Errors
    /// * `Database` - Store failure
    async fn remove(&self, token: &str) -> Result<(), AuthError>;

    /// Retrieve the record holding `token`.
    ///
    /// # Errors
    /// * `Database` - Store failure
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError>;
}

/// Outbound activation mail delivery.
#[async_trait]
pub trait MailNotifier: Send + Sync + 'static {
    /// Send the activation mail embedding `activation_url`.
    ///
    /// # Errors
    /// * `BuildFailed` - Message could not be constructed
    /// * `SendFailed` - Transport reported a delivery failure
    async fn send_activation_mail(&self, to: &str, activation_url: &str) -> Result<(), MailError>;
}
