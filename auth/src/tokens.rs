use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// A signed access/refresh token pair.
///
/// The access token is meant for stateless verification on every request;
/// the refresh token for minting new pairs without re-authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and verifies access/refresh token pairs.
///
/// The two token kinds are signed with two independent secrets, so a token
/// of one kind never verifies as the other. Expiry policy lives in the
/// claims the caller passes in (`exp` is required and validated on decode).
pub struct TokenPairIssuer {
    access: JwtHandler,
    refresh: JwtHandler,
}

impl TokenPairIssuer {
    /// Create an issuer from the two signing secrets.
    ///
    /// # Arguments
    /// * `access_secret` - Secret for short-lived access tokens
    /// * `refresh_secret` - Secret for long-lived refresh tokens
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            access: JwtHandler::new(access_secret),
            refresh: JwtHandler::new(refresh_secret),
        }
    }

    /// Sign a token pair from the two claim sets.
    ///
    /// The claim sets are passed separately because the caller gives each
    /// token kind its own expiry window.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing either token failed
    pub fn issue<A, R>(&self, access_claims: &A, refresh_claims: &R) -> Result<TokenPair, JwtError>
    where
        A: Serialize,
        R: Serialize,
    {
        let access_token = self.access.encode(access_claims)?;
        let refresh_token = self.refresh.encode(refresh_claims)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Validate and decode an access token.
    ///
    /// # Errors
    /// * `TokenExpired` - Token `exp` has passed
    /// * `DecodingFailed` - Signature mismatch or malformed token
    pub fn verify_access<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        self.access.decode(token)
    }

    /// Validate and decode a refresh token.
    ///
    /// # Errors
    /// * `TokenExpired` - Token `exp` has passed
    /// * `DecodingFailed` - Signature mismatch or malformed token
    pub fn verify_refresh<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        self.refresh.decode(token)
    }
}
