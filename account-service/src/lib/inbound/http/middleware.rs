use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::account::models::UserId;
use crate::inbound::http::router::AppState;

/// Extension type to store authenticated user info in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
    pub is_activated: bool,
}

/// Middleware that validates access tokens and adds user info to request
/// extensions. Verification is stateless: signature and expiry only, no
/// store round-trip.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state.auth_service.verify_access_token(token).map_err(|e| {
        tracing::warn!("Access token validation failed: {}", e);
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid or expired token"
            })),
        )
            .into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.id,
        email: claims.email,
        is_activated: claims.is_activated,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Missing Authorization header"
                })),
            )
                .into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header"
            })),
        )
            .into_response()
    })?;

    if !auth_str.starts_with("Bearer ") {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header format. Expected: Bearer <token>"
            })),
        )
            .into_response());
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}
