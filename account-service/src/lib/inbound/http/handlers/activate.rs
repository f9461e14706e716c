use axum::extract::Path;
use axum::extract::State;
use axum::response::Redirect;

use super::ApiError;
use crate::inbound::http::router::AppState;

/// Browser-facing activation endpoint: flips the account to activated and
/// sends the visitor on to the client application.
pub async fn activate(
    State(state): State<AppState>,
    Path(link): Path<String>,
) -> Result<Redirect, ApiError> {
    state.auth_service.activate(&link).await?;

    Ok(Redirect::to(&state.client_url))
}
