use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::activate::activate;
use super::handlers::get_users::get_users;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh::refresh;
use super::handlers::registration::register;
use super::middleware::authenticate as auth_middleware;
use crate::account::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub client_url: String,
    pub refresh_ttl_days: i64,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    client_url: String,
    refresh_ttl_days: i64,
) -> Router {
    let state = AppState {
        auth_service,
        client_url,
        refresh_ttl_days,
    };

    let public_routes = Router::new()
        .route("/api/registration", post(register))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/refresh", get(refresh))
        .route("/api/activate/:link", get(activate));

    let protected_routes = Router::new()
        .route("/api/users", get(get_users))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
