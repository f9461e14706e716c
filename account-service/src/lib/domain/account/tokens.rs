use std::sync::Arc;

use auth::TokenPair;
use auth::TokenPairIssuer;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::account::errors::AuthError;
use crate::account::models::RefreshTokenRecord;
use crate::account::models::UserClaims;
use crate::account::models::UserId;
use crate::account::ports::RefreshTokenRepository;

/// Wire form of the claims embedded in both token kinds.
///
/// `jti` makes every issued token distinct even when two issuances for the
/// same user fall in the same second, so rotation always supersedes the
/// previous token string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (user identifier)
    pub sub: String,
    pub email: String,
    pub is_activated: bool,
    /// JWT ID (unique token identifier)
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Build claims for a user with the given validity window.
    pub fn for_user(user: &UserClaims, validity: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            is_activated: user.is_activated,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + validity).timestamp(),
        }
    }

    /// Project back into the claim DTO. A malformed subject invalidates the
    /// whole claim set, never a partial one.
    pub fn into_user_claims(self) -> Option<UserClaims> {
        let id = UserId::from_string(&self.sub).ok()?;

        Some(UserClaims {
            id,
            email: self.email,
            is_activated: self.is_activated,
        })
    }
}

/// Issues, verifies, and stores the two token kinds.
///
/// Access tokens are verified stateless (signature + expiry only) so the
/// common-case authorization check avoids a store round-trip; refresh
/// tokens additionally live in the store, which is what makes revocation
/// and rotation possible.
pub struct TokenService<TR>
where
    TR: RefreshTokenRepository,
{
    issuer: TokenPairIssuer,
    store: Arc<TR>,
    access_validity: Duration,
    refresh_validity: Duration,
}

impl<TR> TokenService<TR>
where
    TR: RefreshTokenRepository,
{
    /// Create a token service.
    ///
    /// # Arguments
    /// * `issuer` - Pair issuer configured with the two signing secrets
    /// * `store` - Refresh-token persistence implementation
    /// * `access_validity` - Access token window (default 30 minutes)
    /// * `refresh_validity` - Refresh token window (default 30 days)
    pub fn new(
        issuer: TokenPairIssuer,
        store: Arc<TR>,
        access_validity: Duration,
        refresh_validity: Duration,
    ) -> Self {
        Self {
            issuer,
            store,
            access_validity,
            refresh_validity,
        }
    }

    /// Sign a fresh token pair for the user.
    ///
    /// # Errors
    /// * `Internal` - Signing failed
    pub fn generate_tokens(&self, user: &UserClaims) -> Result<TokenPair, AuthError> {
        let access_claims = TokenClaims::for_user(user, self.access_validity);
        let refresh_claims = TokenClaims::for_user(user, self.refresh_validity);

        self.issuer
            .issue(&access_claims, &refresh_claims)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Verify an access token statelessly. Any defect (bad signature,
    /// expired, malformed) yields `None`.
    pub fn verify_access_token(&self, token: &str) -> Option<UserClaims> {
        self.issuer
            .verify_access::<TokenClaims>(token)
            .ok()?
            .into_user_claims()
    }

    /// Verify a refresh token's signature and expiry. Presence in the store
    /// is checked separately via [`find_token`](Self::find_token).
    pub fn verify_refresh_token(&self, token: &str) -> Option<UserClaims> {
        self.issuer
            .verify_refresh::<TokenClaims>(token)
            .ok()?
            .into_user_claims()
    }

    /// Persist the refresh token, overwriting any prior token for the user.
    /// This is the rotation point.
    pub async fn save_token(&self, user_id: &UserId, refresh_token: &str) -> Result<(), AuthError> {
        self.store.upsert(user_id, refresh_token).await
    }

    /// Delete the stored record if present; absent is a no-op.
    pub async fn remove_token(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.store.remove(refresh_token).await
    }

    /// Look up the stored record for a refresh token.
    pub async fn find_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        self.store.find_by_token(refresh_token).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::account::ports::RefreshTokenRepository;

    mock! {
        pub TestRefreshTokenRepository {}

        #[async_trait]
        impl RefreshTokenRepository for TestRefreshTokenRepository {
            async fn upsert(&self, user_id: &UserId, token: &str) -> Result<(), AuthError>;
            async fn remove(&self, token: &str) -> Result<(), AuthError>;
            async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError>;
        }
    }

    fn issuer() -> TokenPairIssuer {
        TokenPairIssuer::new(
            b"access_secret_at_least_32_bytes_long!",
            b"refresh_secret_at_least_32_bytes_long",
        )
    }

    fn user_claims() -> UserClaims {
        UserClaims {
            id: UserId::new(),
            email: "u@example.com".to_string(),
            is_activated: false,
        }
    }

    fn service(store: MockTestRefreshTokenRepository) -> TokenService<MockTestRefreshTokenRepository> {
        TokenService::new(
            issuer(),
            Arc::new(store),
            Duration::minutes(30),
            Duration::days(30),
        )
    }

    #[test]
    fn test_generate_and_verify_round_trip() {
        let service = service(MockTestRefreshTokenRepository::new());
        let user = user_claims();

        let pair = service.generate_tokens(&user).expect("Failed to generate");

        assert_eq!(service.verify_access_token(&pair.access_token), Some(user.clone()));
        assert_eq!(service.verify_refresh_token(&pair.refresh_token), Some(user));
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let service = service(MockTestRefreshTokenRepository::new());
        let pair = service
            .generate_tokens(&user_claims())
            .expect("Failed to generate");

        assert!(service.verify_access_token(&pair.refresh_token).is_none());
        assert!(service.verify_refresh_token(&pair.access_token).is_none());
    }

    #[test]
    fn test_garbage_tokens_are_invalid() {
        let service = service(MockTestRefreshTokenRepository::new());

        assert!(service.verify_access_token("not.a.token").is_none());
        assert!(service.verify_refresh_token("").is_none());
    }

    #[test]
    fn test_expired_access_token_is_invalid() {
        let store = MockTestRefreshTokenRepository::new();
        let service = TokenService::new(
            issuer(),
            Arc::new(store),
            // Past the default validation leeway of 60 seconds.
            Duration::minutes(-2),
            Duration::days(30),
        );

        let pair = service
            .generate_tokens(&user_claims())
            .expect("Failed to generate");

        assert!(service.verify_access_token(&pair.access_token).is_none());
        assert!(service.verify_refresh_token(&pair.refresh_token).is_some());
    }

    #[test]
    fn test_successive_pairs_are_distinct() {
        let service = service(MockTestRefreshTokenRepository::new());
        let user = user_claims();

        let first = service.generate_tokens(&user).expect("Failed to generate");
        let second = service.generate_tokens(&user).expect("Failed to generate");

        assert_ne!(first.refresh_token, second.refresh_token);
        assert_ne!(first.access_token, second.access_token);
    }

    #[tokio::test]
    async fn test_save_token_upserts_by_user() {
        let user = user_claims();
        let user_id = user.id;

        let mut store = MockTestRefreshTokenRepository::new();
        store
            .expect_upsert()
            .withf(move |id, token| *id == user_id && token == "refresh-token")
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(store);
        service
            .save_token(&user_id, "refresh-token")
            .await
            .expect("Failed to save token");
    }

    #[tokio::test]
    async fn test_remove_token_is_delegated() {
        let mut store = MockTestRefreshTokenRepository::new();
        store
            .expect_remove()
            .with(eq("refresh-token"))
            .times(1)
            .returning(|_| Ok(()));

        let service = service(store);
        service
            .remove_token("refresh-token")
            .await
            .expect("Failed to remove token");
    }
}
