//! Error responses.
//!
//! Every failure leaves the API as `{"error": CATEGORY, "message": text}`,
//! plus a `code` naming the exact ledger rule when one was violated.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use milebook_db::RepositoryError;
use milebook_shared::AppError;
use serde_json::json;
use validator::ValidationErrors;

/// Error returned by route handlers.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    code: Option<&'static str>,
}

impl ApiError {
    /// A 404 with the given message.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into()).into()
    }

    /// The category of this error.
    #[must_use]
    pub const fn app_error(&self) -> &AppError {
        &self.error
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self { error, code: None }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let code = err.as_ledger().map(|e| e.error_code());
        Self {
            error: err.into(),
            code,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::InvalidArgument(errors.to_string()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Don't expose internal error details to clients
        let message = if self.error.is_internal() {
            tracing::error!(error = %self.error, "Request failed");
            "An error occurred".to_string()
        } else {
            self.error.message().to_string()
        };

        let mut body = json!({
            "error": self.error.error_code(),
            "message": message,
        });
        if let Some(code) = self.code {
            body["code"] = json!(code);
        }

        (status, Json(body)).into_response()
    }
}
