//! Merchant data models and API request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    validation::{optional_website, required_text},
};

/// Represents a merchant record from the database.
///
/// # Database Table
///
/// Maps to the `merchants` table. Each merchant:
/// - Belongs to exactly one user (unique `user_id`)
/// - Owns its API keys and transactions
///
/// Merchants are never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub id: i32,

    /// Identity-provider subject that owns this profile
    pub user_id: String,

    pub business_name: String,

    pub website_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Request body for creating the caller's merchant profile.
///
/// # JSON Example
///
/// ```json
/// {
///   "businessName": "Acme Coffee",
///   "websiteUrl": "https://acme.example.com"
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMerchantRequest {
    pub business_name: String,

    #[serde(default)]
    pub website_url: Option<String>,
}

/// Validated insert for the `merchants` table.
#[derive(Debug, Clone)]
pub struct NewMerchant {
    pub user_id: String,
    pub business_name: String,
    pub website_url: Option<String>,
}

impl CreateMerchantRequest {
    /// Validate the request and bind it to the authenticated user.
    pub fn into_new_merchant(self, user_id: String) -> Result<NewMerchant, AppError> {
        Ok(NewMerchant {
            user_id,
            business_name: required_text("Business name", &self.business_name, 200)?,
            website_url: optional_website(self.website_url)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_trimmed_and_bound_to_user() {
        let request: CreateMerchantRequest =
            serde_json::from_str(r#"{"businessName": "  Acme Coffee "}"#).unwrap();

        let merchant = request.into_new_merchant("user-1".to_string()).unwrap();

        assert_eq!(merchant.user_id, "user-1");
        assert_eq!(merchant.business_name, "Acme Coffee");
        assert_eq!(merchant.website_url, None);
    }

    #[test]
    fn empty_business_name_is_rejected() {
        let request = CreateMerchantRequest {
            business_name: "".to_string(),
            website_url: None,
        };

        assert!(matches!(
            request.into_new_merchant("user-1".to_string()),
            Err(AppError::InvalidRequest(_))
        ));
    }
}
