//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id)
//! - JWT token generation and validation
//! - Paired access/refresh token issuance over two independent secrets
//!
//! Each service defines its own claim payloads and adapts these
//! implementations. This avoids coupling services through shared domain
//! logic while reducing code duplication.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("wrong_password", &hash));
//! ```
//!
//! ## Access/Refresh Token Pairs
//! ```
//! use auth::TokenPairIssuer;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Claims {
//!     sub: String,
//!     exp: i64,
//! }
//!
//! let issuer = TokenPairIssuer::new(
//!     b"access_secret_at_least_32_bytes_long!",
//!     b"refresh_secret_at_least_32_bytes_long",
//! );
//!
//! let exp = chrono::Utc::now().timestamp() + 3600;
//! let claims = Claims { sub: "user123".to_string(), exp };
//! let pair = issuer.issue(&claims, &claims).unwrap();
//!
//! let decoded: Claims = issuer.verify_access(&pair.access_token).unwrap();
//! assert_eq!(decoded.sub, "user123");
//!
//! // Tokens are bound to their own secret: an access token does not
//! // verify as a refresh token.
//! assert!(issuer.verify_refresh::<Claims>(&pair.access_token).is_err());
//! ```

pub mod jwt;
pub mod password;
pub mod tokens;

// Re-export commonly used items
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use tokens::TokenPair;
pub use tokens::TokenPairIssuer;
