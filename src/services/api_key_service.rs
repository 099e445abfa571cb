//! API key service.
//!
//! Issues keys for the dashboard and resolves raw keys presented on the
//! public API back to their merchant.

use crate::{
    error::AppError,
    models::{
        api_key::{ApiKeyResponse, CreateApiKeyRequest, NewApiKey},
        merchant::Merchant,
    },
    security::{KEY_PREFIX, generate_api_key, hash_api_key},
    storage::Storage,
};

/// Issue a new API key for a merchant.
///
/// # Process
///
/// 1. Validate the key name
/// 2. Generate a random raw key (`sk_test_` + 48 hex chars)
/// 3. Store only its SHA-256 hash and display prefix
/// 4. Return the key with the raw value attached (only time it's shown)
pub async fn issue_api_key(
    storage: &dyn Storage,
    merchant_id: i32,
    request: CreateApiKeyRequest,
) -> Result<ApiKeyResponse, AppError> {
    let name = request.validated_name()?;

    let raw_key = generate_api_key();

    let key = storage
        .create_api_key(NewApiKey {
            merchant_id,
            name,
            prefix: KEY_PREFIX.to_string(),
            key_hash: hash_api_key(&raw_key),
        })
        .await?;

    tracing::info!(merchant_id, api_key_id = key.id, "API key issued");

    Ok(ApiKeyResponse::from(key).with_raw_key(raw_key))
}

/// Resolve a raw API key to the merchant that owns it.
///
/// # Errors
///
/// - `MissingApiKey` if the key is blank
/// - `InvalidApiKey` if no active key has this hash
pub async fn authenticate(storage: &dyn Storage, raw_key: &str) -> Result<Merchant, AppError> {
    let raw_key = raw_key.trim();
    if raw_key.is_empty() {
        return Err(AppError::MissingApiKey);
    }

    let key_hash = hash_api_key(raw_key);

    match storage.get_merchant_by_api_key_hash(&key_hash).await? {
        Some(merchant) => Ok(merchant),
        None => {
            tracing::warn!("rejected request with unknown or inactive API key");
            Err(AppError::InvalidApiKey)
        }
    }
}
