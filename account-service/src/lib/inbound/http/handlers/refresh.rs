use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::refresh_cookie;
use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use super::REFRESH_COOKIE;
use crate::inbound::http::router::AppState;

/// Exchange the refresh cookie for a new token pair. The stored token is
/// rotated, so the cookie is always re-set with the new value.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<SessionResponseData>), ApiError> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .unwrap_or_default();

    let session = state.auth_service.refresh(&token).await?;

    let jar = jar.add(refresh_cookie(
        &session.tokens.refresh_token,
        state.refresh_ttl_days,
    ));

    Ok((jar, ApiSuccess::new(StatusCode::OK, (&session).into())))
}
