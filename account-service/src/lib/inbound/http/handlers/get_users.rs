use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// List all registered users. Reachable only behind the access-token
/// middleware.
pub async fn get_users(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    tracing::debug!(requested_by = %requester.user_id, "Listing users");

    let users = state.auth_service.list_users().await?;

    let data = users
        .into_iter()
        .map(|user| UserData {
            id: user.id.to_string(),
            email: user.email,
            is_activated: user.is_activated,
        })
        .collect();

    Ok(ApiSuccess::new(StatusCode::OK, data))
}
