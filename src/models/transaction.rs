//! Transaction data models and API request types.
//!
//! This module defines:
//! - `Transaction`: Database entity representing a payment attempt
//! - `TransactionStatus`: the pending → success | failed lifecycle
//! - Request types for the public create, quick-create and process endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    validation::{currency_code, optional_email, optional_text, parse_amount, positive_amount},
};

/// Lifecycle state of a transaction.
///
/// `Pending` is the only state a transaction is created in. It moves exactly
/// once to `Success` or `Failed`; both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// How a transaction was paid at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Card,
    Btc,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Btc => "btc",
        }
    }
}

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Each transaction:
/// - Belongs to one merchant
/// - Stores amount in minor units (never floats)
/// - Records the payment method once it has been processed
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i32,

    pub merchant_id: i32,

    /// Amount in minor currency units (cents, satoshis)
    pub amount: i64,

    /// Currency code, upper case. `BTC` selects the wallet checkout.
    pub currency: String,

    pub status: TransactionStatus,

    pub customer_email: Option<String>,

    /// Merchant-side order reference
    pub reference_id: Option<String>,

    /// `card` or `btc`; `None` until processed
    pub payment_method: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Request to create a pending transaction through the public API.
///
/// # JSON Example
///
/// ```json
/// {
///   "amount": 2500,
///   "currency": "USD",
///   "customerEmail": "buyer@example.com",
///   "referenceId": "order-1042"
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub amount: i64,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub customer_email: Option<String>,

    #[serde(default)]
    pub reference_id: Option<String>,
}

/// Query string of `GET /api/public/transactions/quick`.
///
/// Every field is optional at the parsing stage so missing values produce
/// our own error responses instead of a generic query rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickTransactionQuery {
    pub api_key: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    pub reference_id: Option<String>,
}

/// Payment details submitted from the hosted checkout page.
///
/// Card fields are used for fiat currencies, `btcAddress` for BTC.
/// CVV and expiry are accepted but not inspected by the simulation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRequest {
    #[serde(default)]
    pub card_number: Option<String>,

    #[serde(default)]
    pub cvv: Option<String>,

    #[serde(default)]
    pub expiry: Option<String>,

    #[serde(default)]
    pub btc_address: Option<String>,
}

/// Validated insert for the `transactions` table. Always inserted as pending.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub merchant_id: i32,
    pub amount: i64,
    pub currency: String,
    pub customer_email: Option<String>,
    pub reference_id: Option<String>,
}

impl CreateTransactionRequest {
    pub fn into_new_transaction(self, merchant_id: i32) -> Result<NewTransaction, AppError> {
        Ok(NewTransaction {
            merchant_id,
            amount: positive_amount(self.amount)?,
            currency: currency_code(self.currency.as_deref())?,
            customer_email: optional_email(self.customer_email)?,
            reference_id: optional_text("Reference id", self.reference_id, 255)?,
        })
    }
}

impl QuickTransactionQuery {
    pub fn into_new_transaction(self, merchant_id: i32) -> Result<NewTransaction, AppError> {
        Ok(NewTransaction {
            merchant_id,
            amount: parse_amount(self.amount.as_deref())?,
            currency: currency_code(self.currency.as_deref())?,
            customer_email: optional_email(self.customer_email)?,
            reference_id: optional_text("Reference id", self.reference_id, 255)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(TransactionStatus::Success).unwrap(),
            "success"
        );
        assert_eq!(TransactionStatus::Failed.to_string(), "failed");
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
    }

    #[test]
    fn create_request_defaults_currency() {
        let request: CreateTransactionRequest =
            serde_json::from_str(r#"{"amount": 1999}"#).unwrap();
        let new = request.into_new_transaction(4).unwrap();

        assert_eq!(new.merchant_id, 4);
        assert_eq!(new.amount, 1999);
        assert_eq!(new.currency, "USD");
        assert_eq!(new.customer_email, None);
    }

    #[test]
    fn create_request_rejects_non_positive_amount() {
        let request = CreateTransactionRequest {
            amount: 0,
            currency: None,
            customer_email: None,
            reference_id: None,
        };
        assert!(request.into_new_transaction(1).is_err());
    }

    #[test]
    fn quick_query_requires_amount() {
        let query = QuickTransactionQuery {
            api_key: Some("sk_test_x".into()),
            ..QuickTransactionQuery::default()
        };
        assert!(matches!(
            query.into_new_transaction(1),
            Err(AppError::InvalidRequest(msg)) if msg == "Amount is required"
        ));
    }
}
