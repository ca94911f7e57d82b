use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;
use thiserror::Error;

/// ApiError
///
/// The application's complete error taxonomy. Every handler returns
/// `Result<_, ApiError>`, and every variant maps deterministically to a single
/// caller-visible HTTP outcome; no error is retried or silently swallowed.
///
/// `NotPermitted` deliberately covers both "target does not exist" and "caller
/// is not the owner". Ownership checks are fused with existence checks in the
/// repository queries, so a non-owner cannot probe whether a resource exists.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Uniqueness violation on signup (username or email already taken).
    #[error("username or email already exists")]
    Conflict,

    /// Login failed. Covers both an unknown username and a wrong password so the
    /// response never reveals whether the account exists.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The presented bearer token is malformed, has a bad signature, or is expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The token verified but its subject no longer maps to a live user record.
    #[error("token subject no longer exists")]
    UnknownSubject,

    /// Fused forbidden/not-found outcome for mutations on owned resources.
    #[error("not authorized or resource not found")]
    NotPermitted,

    /// Reserved for genuinely public lookups, where existence is the only fact reported.
    #[error("resource not found")]
    NotFound,

    /// Request payload failed an input invariant (e.g., empty title).
    #[error("{0}")]
    Validation(String),

    /// Persistence-layer failure. Logged with full detail, reported generically.
    #[error("database error")]
    Database(sqlx::Error),

    /// Unexpected failure in token signing or password hashing machinery.
    #[error("internal error")]
    Internal(&'static str),
}

impl From<sqlx::Error> for ApiError {
    /// Maps persistence errors into the taxonomy. The unique-constraint branch is
    /// what makes the database the final arbiter of username/email uniqueness:
    /// a concurrent signup that loses the race surfaces here as `Conflict`.
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::Conflict,
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::UnknownSubject => StatusCode::UNAUTHORIZED,
            ApiError::NotPermitted => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(e) => {
                // Full detail stays in the logs; the client sees a generic 500.
                tracing::error!("database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Internal(detail) => {
                tracing::error!("internal error: {}", detail);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            ApiError::Database(_) | ApiError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
