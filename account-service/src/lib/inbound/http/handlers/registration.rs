use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use thiserror::Error;

use super::refresh_cookie;
use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use crate::account::errors::EmailError;
use crate::account::models::Credentials;
use crate::account::models::EmailAddress;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(CookieJar, ApiSuccess<SessionResponseData>), ApiError> {
    let session = state
        .auth_service
        .register(body.try_into_credentials()?)
        .await?;

    let jar = jar.add(refresh_cookie(
        &session.tokens.refresh_token,
        state.refresh_ttl_days,
    ));

    Ok((jar, ApiSuccess::new(StatusCode::CREATED, (&session).into())))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl RegisterRequest {
    fn try_into_credentials(self) -> Result<Credentials, ParseRegisterRequestError> {
        let email = EmailAddress::new(self.email)?;
        Ok(Credentials::new(email, self.password))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
