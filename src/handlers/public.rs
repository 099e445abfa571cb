//! Public API used by merchant integrations and the hosted checkout page.
//!
//! - POST /api/public/transactions - Create a pending transaction (API key)
//! - GET /api/public/transactions/quick - Create via query string and redirect to checkout
//! - GET /api/public/transactions/:id - Transaction details for the checkout page
//! - POST /api/public/process/:id - Simulated settlement
//!
//! Only creation requires an API key. Reading and processing are open so the
//! checkout page can run without merchant credentials.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    middleware::auth::ApiKeyMerchant,
    models::transaction::{
        CreateTransactionRequest, ProcessPaymentRequest, QuickTransactionQuery, Transaction,
    },
    services::{api_key_service, transaction_service},
    state::AppState,
    validation::{ApiJson, ApiPath, ApiQuery},
};

/// Create a pending transaction.
///
/// # Request Body
///
/// ```json
/// {
///   "amount": 2500,
///   "currency": "USD",
///   "customerEmail": "buyer@example.com",
///   "referenceId": "order-1042"
/// }
/// ```
///
/// # Response
///
/// - **201**: transaction in `pending` status
/// - **400**: validation failure
/// - **401**: missing or invalid `x-api-key`
pub async fn create_transaction(
    State(state): State<AppState>,
    ApiKeyMerchant(merchant): ApiKeyMerchant,
    ApiJson(request): ApiJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let new_transaction = request.into_new_transaction(merchant.id)?;

    let transaction =
        transaction_service::create_transaction(state.storage(), new_transaction).await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Create a pending transaction from a link and redirect to checkout.
///
/// Intended for no-code "Pay" buttons:
///
/// ```text
/// GET /api/public/transactions/quick?apiKey=sk_test_...&amount=2500&currency=USD
/// ```
///
/// # Response
///
/// - **302**: `Location: /checkout/{id}`
/// - **400**: missing or non-positive amount
/// - **401**: missing or invalid `apiKey` (nothing is created)
pub async fn quick_transaction(
    State(state): State<AppState>,
    ApiQuery(mut query): ApiQuery<QuickTransactionQuery>,
) -> Result<Response, AppError> {
    let raw_key = query.api_key.take().ok_or(AppError::MissingApiKey)?;
    let merchant = api_key_service::authenticate(state.storage(), &raw_key).await?;

    let new_transaction = query.into_new_transaction(merchant.id)?;
    let transaction =
        transaction_service::create_transaction(state.storage(), new_transaction).await?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, state.checkout_url(transaction.id))],
    )
        .into_response())
}

/// Transaction details for the checkout page.
///
/// Not authenticated: anyone holding the id can read amount, currency and
/// customer email.
pub async fn get_transaction(
    State(state): State<AppState>,
    ApiPath(transaction_id): ApiPath<i32>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state
        .storage()
        .get_transaction(transaction_id)
        .await?
        .ok_or(AppError::NotFound("Transaction"))?;

    Ok(Json(transaction))
}

/// Simulated settlement of the checkout form.
///
/// # Request Body
///
/// ```json
/// { "cardNumber": "4242424242421111", "cvv": "123", "expiry": "12/30" }
/// ```
///
/// or, for BTC transactions,
///
/// ```json
/// { "btcAddress": "bc1q..." }
/// ```
///
/// # Response
///
/// - **200**: transaction in its terminal status
/// - **400**: already processed, or payment details missing
/// - **404**: unknown transaction
pub async fn process_transaction(
    State(state): State<AppState>,
    ApiPath(transaction_id): ApiPath<i32>,
    ApiJson(request): ApiJson<ProcessPaymentRequest>,
) -> Result<Json<Transaction>, AppError> {
    let transaction =
        transaction_service::process_payment(state.storage(), transaction_id, request).await?;

    Ok(Json(transaction))
}
