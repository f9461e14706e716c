use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::expired_refresh_cookie;
use super::ApiError;
use super::ApiSuccess;
use super::REFRESH_COOKIE;
use crate::inbound::http::router::AppState;

/// Terminate the session: drop the stored refresh token and clear the
/// cookie. Succeeds whether or not a token was present.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<()>), ApiError> {
    if let Some(cookie) = jar.get(REFRESH_COOKIE) {
        state.auth_service.logout(cookie.value()).await?;
    }

    let jar = jar.remove(expired_refresh_cookie());

    Ok((jar, ApiSuccess::new(StatusCode::OK, ())))
}
