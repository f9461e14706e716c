use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::refresh_cookie;
use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use crate::account::models::Credentials;
use crate::account::models::EmailAddress;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, ApiSuccess<SessionResponseData>), ApiError> {
    // A syntactically invalid email cannot belong to any user.
    let email = EmailAddress::new(body.email)
        .map_err(|e| ApiError::UnprocessableEntity(format!("Invalid email: {}", e)))?;

    let session = state
        .auth_service
        .login(Credentials::new(email, body.password))
        .await?;

    let jar = jar.add(refresh_cookie(
        &session.tokens.refresh_token,
        state.refresh_ttl_days,
    ));

    Ok((jar, ApiSuccess::new(StatusCode::OK, (&session).into())))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
