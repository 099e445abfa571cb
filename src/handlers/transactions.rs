//! Dashboard transaction handlers.

use axum::{Json, extract::State};

use crate::{
    error::AppError, middleware::identity::MerchantContext, models::transaction::Transaction,
    state::AppState,
};

/// List the merchant's transactions.
///
/// # Ordering
///
/// Newest first.
pub async fn list_transactions(
    State(state): State<AppState>,
    ctx: MerchantContext,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state.storage().list_transactions(ctx.merchant.id).await?;

    Ok(Json(transactions))
}
