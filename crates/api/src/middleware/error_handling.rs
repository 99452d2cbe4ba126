//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! handler reports failures the same way:
//!
//! | Error | Status |
//! |---|---|
//! | `InvalidInput` | 400 |
//! | `NotFound` | 404 |
//! | `Conflict` | 409 |
//! | `Database`, `Internal` | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use swimbook_core::errors::SwimError;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use swimbook_api::middleware::error_handling::AppError;
/// use swimbook_core::errors::SwimError;
///
/// async fn handler(level: i32) -> Result<Json<i32>, AppError> {
///     if level < 0 {
///         return Err(AppError(SwimError::InvalidInput("level must not be negative".into())));
///     }
///     Ok(Json(level))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub SwimError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SwimError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SwimError::NotFound(_) => StatusCode::NOT_FOUND,
            SwimError::Conflict(_) => StatusCode::CONFLICT,
            SwimError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SwimError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Allows using `?` on `SwimResult` inside handlers.
impl From<SwimError> for AppError {
    fn from(err: SwimError) -> Self {
        AppError(err)
    }
}

/// Repository failures surface as `SwimError::Database`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SwimError::Database(err))
    }
}

/// Maps a SwimError to an HTTP response
pub fn map_error(err: SwimError) -> Response {
    AppError(err).into_response()
}
