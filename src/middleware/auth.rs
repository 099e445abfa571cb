//! API key authentication for the public API.
//!
//! The extractor:
//! 1. Reads the raw key from the `x-api-key` header
//! 2. Hashes it with SHA-256 and looks up an active key with that hash
//! 3. Hands the owning merchant to the handler
//! 4. Rejects with HTTP 401 otherwise

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    error::AppError, models::merchant::Merchant, services::api_key_service, state::AppState,
};

/// Header carrying the raw API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Merchant authenticated by API key.
///
/// # Headers
///
/// ```text
/// x-api-key: sk_test_9f2c...
/// ```
#[derive(Debug, Clone)]
pub struct ApiKeyMerchant(pub Merchant);

impl FromRequestParts<AppState> for ApiKeyMerchant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw_key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::MissingApiKey)?;

        let merchant = api_key_service::authenticate(state.storage(), raw_key).await?;

        Ok(Self(merchant))
    }
}
