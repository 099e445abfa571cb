//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Validation**: malformed or missing input (400)
/// - **Conflict**: duplicate merchant profile, re-processing a settled transaction (400)
/// - **Authorization**: missing identity or API key (401), missing merchant profile (403)
/// - **Resource**: entity absent or not owned by the caller (404)
/// - **Internal**: storage failures (500, cause is logged but never returned)
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Non-database storage failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// No identity was asserted by the identity provider.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The `x-api-key` header or `apiKey` parameter was not supplied.
    #[error("Missing API key")]
    MissingApiKey,

    /// API key does not match any active key.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Authenticated user has not created a merchant profile yet.
    #[error("Merchant profile required")]
    MerchantRequired,

    /// Entity does not exist or is owned by another merchant.
    ///
    /// The string names the entity, e.g. "Transaction".
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A merchant profile already exists for this user.
    #[error("Merchant profile already exists")]
    MerchantExists,

    /// Transaction has already left the pending state.
    #[error("Transaction already processed")]
    AlreadyProcessed,

    /// Request body or parameters are invalid.
    ///
    /// The String contains the first violated rule.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::MerchantExists => {
                (StatusCode::BAD_REQUEST, "merchant_exists", self.to_string())
            }
            AppError::AlreadyProcessed => (
                StatusCode::BAD_REQUEST,
                "already_processed",
                self.to_string(),
            ),
            AppError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "unauthenticated", self.to_string())
            }
            AppError::MissingApiKey => {
                (StatusCode::UNAUTHORIZED, "missing_api_key", self.to_string())
            }
            AppError::InvalidApiKey => {
                (StatusCode::UNAUTHORIZED, "invalid_api_key", self.to_string())
            }
            AppError::MerchantRequired => {
                (StatusCode::FORBIDDEN, "merchant_required", self.to_string())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::Database(ref e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Storage(ref e) => {
                tracing::error!(error = %e, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_taxonomy() {
        let cases = [
            (AppError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::MerchantExists, StatusCode::BAD_REQUEST),
            (AppError::AlreadyProcessed, StatusCode::BAD_REQUEST),
            (AppError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (AppError::InvalidApiKey, StatusCode::UNAUTHORIZED),
            (AppError::MerchantRequired, StatusCode::FORBIDDEN),
            (AppError::NotFound("Transaction"), StatusCode::NOT_FOUND),
            (
                AppError::Storage("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn not_found_message_names_entity() {
        assert_eq!(AppError::NotFound("API key").to_string(), "API key not found");
    }
}
