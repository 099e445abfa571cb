//! Transaction service - creation and simulated checkout settlement.
//!
//! # Lifecycle
//!
//! Transactions are created `pending` and settle exactly once to `success`
//! or `failed`. Settlement is a conditional update in storage, so a second
//! process call (sequential or concurrent) is rejected instead of
//! re-evaluated.

use crate::{
    error::AppError,
    models::transaction::{
        NewTransaction, PaymentMethod, ProcessPaymentRequest, Transaction, TransactionStatus,
    },
    storage::Storage,
};

/// Card numbers ending in these digits are declined.
const DECLINED_CARD_SUFFIX: &str = "0000";

/// BTC wallet address that is always declined.
const DECLINED_BTC_ADDRESS: &str = "fail";

/// Outcome of the checkout simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub status: TransactionStatus,
    pub method: PaymentMethod,
}

/// Create a pending transaction for a merchant.
pub async fn create_transaction(
    storage: &dyn Storage,
    transaction: NewTransaction,
) -> Result<Transaction, AppError> {
    let transaction = storage.create_transaction(transaction).await?;

    tracing::info!(
        transaction_id = transaction.id,
        merchant_id = transaction.merchant_id,
        amount = transaction.amount,
        currency = %transaction.currency,
        "transaction created"
    );

    Ok(transaction)
}

/// Decide the simulated outcome for a transaction.
///
/// # Rules
///
/// - `BTC`: fails iff the wallet address is exactly `"fail"`
/// - everything else: fails iff the card number ends in `"0000"`
///
/// # Errors
///
/// `InvalidRequest` when the payment detail for the currency is missing.
pub fn simulate_outcome(
    currency: &str,
    request: &ProcessPaymentRequest,
) -> Result<Settlement, AppError> {
    if currency.eq_ignore_ascii_case("BTC") {
        let address = request
            .btc_address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| AppError::InvalidRequest("BTC address is required".to_string()))?;

        let status = if address == DECLINED_BTC_ADDRESS {
            TransactionStatus::Failed
        } else {
            TransactionStatus::Success
        };

        return Ok(Settlement {
            status,
            method: PaymentMethod::Btc,
        });
    }

    let card_number: String = request
        .card_number
        .as_deref()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if card_number.is_empty() {
        return Err(AppError::InvalidRequest(
            "Card number is required".to_string(),
        ));
    }

    let status = if card_number.ends_with(DECLINED_CARD_SUFFIX) {
        TransactionStatus::Failed
    } else {
        TransactionStatus::Success
    };

    Ok(Settlement {
        status,
        method: PaymentMethod::Card,
    })
}

/// Process the checkout form for a pending transaction.
///
/// # Process
///
/// 1. Load the transaction (404 if absent)
/// 2. Reject if it already left `pending`
/// 3. Validate payment details and compute the outcome
/// 4. Apply the outcome with a compare-and-set on `status = pending`
///
/// # Errors
///
/// - `NotFound`: unknown transaction id
/// - `AlreadyProcessed`: transaction is terminal, or another request settled it first
/// - `InvalidRequest`: payment details missing for the currency
pub async fn process_payment(
    storage: &dyn Storage,
    transaction_id: i32,
    request: ProcessPaymentRequest,
) -> Result<Transaction, AppError> {
    let transaction = storage
        .get_transaction(transaction_id)
        .await?
        .ok_or(AppError::NotFound("Transaction"))?;

    if transaction.status.is_terminal() {
        return Err(AppError::AlreadyProcessed);
    }

    let settlement = simulate_outcome(&transaction.currency, &request)?;

    let settled = storage
        .settle_transaction(transaction_id, settlement.status, settlement.method)
        .await?
        // Lost the race against a concurrent settlement
        .ok_or(AppError::AlreadyProcessed)?;

    tracing::info!(
        transaction_id,
        status = %settled.status,
        method = settlement.method.as_str(),
        "transaction processed"
    );

    Ok(settled)
}
