use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use serde::Serialize;

use crate::account::errors::AuthError;
use crate::account::models::AuthSession;

pub mod activate;
pub mod get_users;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod registration;

/// Cookie carrying the refresh token between client and server.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Build the refresh-token cookie with the refresh validity window as its
/// max-age.
pub fn refresh_cookie(token: &str, ttl_days: i64) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(ttl_days))
        .build()
}

/// Build the cookie used to clear the refresh token on logout.
///
/// Attributes must match the creation cookie for the browser to drop it.
pub fn expired_refresh_cookie() -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                // Full context stays in the log; the client gets an opaque
                // failure.
                tracing::error!(error = %msg, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailInUse(_) => ApiError::Conflict(err.to_string()),
            AuthError::NotFound(_) => ApiError::NotFound(err.to_string()),
            AuthError::InvalidCredentials | AuthError::Unauthenticated => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::InvalidActivationLink => ApiError::BadRequest(err.to_string()),
            AuthError::InvalidEmail(_) | AuthError::InvalidUserId(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            AuthError::Database(_) | AuthError::Internal(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Body shape shared by registration, login, and refresh responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub is_activated: bool,
}

impl From<&AuthSession> for SessionResponseData {
    fn from(session: &AuthSession) -> Self {
        Self {
            access_token: session.tokens.access_token.clone(),
            refresh_token: session.tokens.refresh_token.clone(),
            user: UserData {
                id: session.user.id.to_string(),
                email: session.user.email.clone(),
                is_activated: session.user.is_activated,
            },
        }
    }
}
