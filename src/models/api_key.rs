//! API Key model for authenticating merchants on the public API.
//!
//! API keys are stored as SHA-256 hashes. The raw secret is shown to the
//! merchant exactly once, in the response that created it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, validation::required_text};

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table with columns:
/// - `id`: Auto-increment identifier
/// - `merchant_id`: Owning merchant
/// - `key_hash`: SHA-256 hash of the actual API key
/// - `prefix`: Display prefix of the raw key (e.g. `sk_test`)
/// - `name`: Merchant-chosen label
/// - `is_active`: Whether the key is currently valid
/// - `created_at`: When the key was created
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKey {
    pub id: i32,

    pub merchant_id: i32,

    /// SHA-256 hash of the raw key (64 hex characters)
    ///
    /// When a request comes in with `x-api-key: sk_test_...`, we:
    /// 1. Hash the header value with SHA-256
    /// 2. Look up this hash among active keys
    /// 3. If found, the request acts on behalf of `merchant_id`
    pub key_hash: String,

    pub prefix: String,

    pub name: String,

    /// Inactive keys are rejected during authentication.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

/// Request body for issuing a new key.
///
/// ```json
/// { "name": "Production server" }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
}

impl CreateApiKeyRequest {
    pub fn validated_name(&self) -> Result<String, AppError> {
        required_text("Name", &self.name, 100)
    }
}

/// Validated insert for the `api_keys` table.
#[derive(Debug, Clone)]
pub struct NewApiKey {
    pub merchant_id: i32,
    pub name: String,
    pub prefix: String,
    pub key_hash: String,
}

/// API key as returned to the dashboard.
///
/// # Security Note
///
/// `key_hash` is never serialized. `raw_key` is ONLY populated in the
/// response to `POST /api/keys`.
///
/// ```json
/// {
///   "id": 3,
///   "merchantId": 1,
///   "name": "Production server",
///   "prefix": "sk_test",
///   "isActive": true,
///   "createdAt": "2025-01-15T10:30:00Z",
///   "rawKey": "sk_test_9f2c..."
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub id: i32,
    pub merchant_id: i32,
    pub name: String,
    pub prefix: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_key: Option<String>,
}

impl From<ApiKey> for ApiKeyResponse {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            merchant_id: key.merchant_id,
            name: key.name,
            prefix: key.prefix,
            is_active: key.is_active,
            created_at: key.created_at,
            raw_key: None,
        }
    }
}

impl ApiKeyResponse {
    /// Attach the raw key (creation response only).
    pub fn with_raw_key(mut self, raw_key: String) -> Self {
        self.raw_key = Some(raw_key);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key() -> ApiKey {
        ApiKey {
            id: 7,
            merchant_id: 2,
            key_hash: "ab".repeat(32),
            prefix: "sk_test".to_string(),
            name: "Server".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn response_never_contains_hash_and_omits_raw_key_by_default() {
        let json = serde_json::to_value(ApiKeyResponse::from(sample_key())).unwrap();

        assert!(json.get("keyHash").is_none());
        assert!(json.get("rawKey").is_none());
        assert_eq!(json["prefix"], "sk_test");
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn raw_key_is_serialized_when_attached() {
        let response = ApiKeyResponse::from(sample_key()).with_raw_key("sk_test_abc".into());
        let json = serde_json::to_value(response).unwrap();

        assert_eq!(json["rawKey"], "sk_test_abc");
    }
}
