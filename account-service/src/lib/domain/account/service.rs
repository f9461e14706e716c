use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::account::errors::AuthError;
use crate::account::models::ActivationLink;
use crate::account::models::AuthSession;
use crate::account::models::Credentials;
use crate::account::models::User;
use crate::account::models::UserClaims;
use crate::account::models::UserId;
use crate::account::ports::AuthServicePort;
use crate::account::ports::MailNotifier;
use crate::account::ports::RefreshTokenRepository;
use crate::account::ports::UserRepository;
use crate::account::tokens::TokenService;

/// Authentication orchestrator.
///
/// Composes the password hasher, token service, user store, and mail
/// notifier into the registration, activation, login, logout, and refresh
/// use cases. All collaborators are injected; the only process-wide state
/// is the pair of signing secrets held inside the token service.
pub struct AuthService<UR, TR, MN>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
    MN: MailNotifier,
{
    users: Arc<UR>,
    tokens: TokenService<TR>,
    mailer: Arc<MN>,
    password_hasher: auth::PasswordHasher,
    api_url: String,
}

impl<UR, TR, MN> AuthService<UR, TR, MN>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
    MN: MailNotifier,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `tokens` - Token issuance/verification/storage service
    /// * `mailer` - Activation mail delivery implementation
    /// * `api_url` - Public base URL embedded in activation links
    pub fn new(users: Arc<UR>, tokens: TokenService<TR>, mailer: Arc<MN>, api_url: String) -> Self {
        Self {
            users,
            tokens,
            mailer,
            password_hasher: auth::PasswordHasher::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issue a token pair for the user and persist the refresh token,
    /// overwriting any prior token for that user.
    async fn open_session(&self, user: &User) -> Result<AuthSession, AuthError> {
        let claims = UserClaims::from(user);
        let tokens = self.tokens.generate_tokens(&claims)?;
        self.tokens.save_token(&user.id, &tokens.refresh_token).await?;

        Ok(AuthSession {
            tokens,
            user: claims,
        })
    }

    fn activation_url(&self, link: &ActivationLink) -> String {
        format!("{}/api/activate/{}", self.api_url, link)
    }
}

#[async_trait]
impl<UR, TR, MN> AuthServicePort for AuthService<UR, TR, MN>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
    MN: MailNotifier,
{
    async fn register(&self, credentials: Credentials) -> Result<AuthSession, AuthError> {
        if self
            .users
            .find_by_email(credentials.email.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::EmailInUse(credentials.email.as_str().to_string()));
        }

        let password_hash = self
            .password_hasher
            .hash(&credentials.password)
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: UserId::new(),
            email: credentials.email,
            password_hash,
            is_activated: false,
            activation_link: ActivationLink::new(),
            created_at: Utc::now(),
        };

        let user = self.users.create(user).await?;

        // The user record is committed first; a delivery failure must not
        // roll back the registration.
        let activation_url = self.activation_url(&user.activation_link);
        if let Err(e) = self
            .mailer
            .send_activation_mail(user.email.as_str(), &activation_url)
            .await
        {
            tracing::error!(
                user_id = %user.id,
                email = %user.email,
                error = %e,
                "Failed to send activation mail"
            );
        }

        self.open_session(&user).await
    }

    async fn activate(&self, link: &str) -> Result<(), AuthError> {
        let mut user = self
            .users
            .find_by_activation_link(link)
            .await?
            .ok_or(AuthError::InvalidActivationLink)?;

        // The link is never cleared, so a repeated visit resolves the same
        // user and falls through without a second write.
        if !user.is_activated {
            user.is_activated = true;
            self.users.update(user).await?;
        }

        Ok(())
    }

    async fn login(&self, credentials: Credentials) -> Result<AuthSession, AuthError> {
        let user = self
            .users
            .find_by_email(credentials.email.as_str())
            .await?
            .ok_or_else(|| AuthError::NotFound(credentials.email.as_str().to_string()))?;

        if !self
            .password_hasher
            .verify(&credentials.password, &user.password_hash)
        {
            return Err(AuthError::InvalidCredentials);
        }

        self.open_session(&user).await
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.tokens.remove_token(refresh_token).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        if refresh_token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        // Signature validity alone is insufficient: a rotated-out token
        // still carries a valid signature until natural expiry, so the
        // store lookup is mandatory.
        let claims = self
            .tokens
            .verify_refresh_token(refresh_token)
            .ok_or(AuthError::Unauthenticated)?;

        self.tokens
            .find_token(refresh_token)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        // Re-fetch so the new claims reflect the latest activation state.
        let user = self
            .users
            .find_by_id(&claims.id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        self.open_session(&user).await
    }

    fn verify_access_token(&self, token: &str) -> Result<UserClaims, AuthError> {
        self.tokens
            .verify_access_token(token)
            .ok_or(AuthError::Unauthenticated)
    }

    async fn list_users(&self) -> Result<Vec<UserClaims>, AuthError> {
        let users = self.users.list_all().await?;
        Ok(users.iter().map(UserClaims::from).collect())
    }
}
