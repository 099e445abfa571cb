//! HTTP handlers for API key management.
//!
//! All routes are scoped to the caller's merchant.

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    error::AppError,
    middleware::identity::MerchantContext,
    models::api_key::{ApiKeyResponse, CreateApiKeyRequest},
    services::api_key_service,
    state::AppState,
    validation::{ApiJson, ApiPath},
};

/// List the merchant's keys, newest first.
///
/// Neither the hash nor the raw key is ever included.
pub async fn list_api_keys(
    State(state): State<AppState>,
    ctx: MerchantContext,
) -> Result<Json<Vec<ApiKeyResponse>>, AppError> {
    let keys = state.storage().list_api_keys(ctx.merchant.id).await?;

    Ok(Json(keys.into_iter().map(Into::into).collect()))
}

/// Issue a new key.
///
/// # Response
///
/// Returns 201 Created. `rawKey` is present in this response only.
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
pub async fn create_api_key(
    State(state): State<AppState>,
    ctx: MerchantContext,
    ApiJson(request): ApiJson<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<ApiKeyResponse>), AppError> {
    let key = api_key_service::issue_api_key(state.storage(), ctx.merchant.id, request).await?;

    tracing::debug!(user_id = %ctx.user.subject, api_key_id = key.id, "API key issued by user");

    Ok((StatusCode::CREATED, Json(key)))
}

/// Delete a key.
///
/// Returns 204 No Content, or 404 if the key does not exist or belongs to
/// another merchant.
pub async fn delete_api_key(
    State(state): State<AppState>,
    ctx: MerchantContext,
    ApiPath(key_id): ApiPath<i32>,
) -> Result<StatusCode, AppError> {
    state
        .storage()
        .delete_api_key(key_id, ctx.merchant.id)
        .await?;

    tracing::info!(
        merchant_id = ctx.merchant.id,
        user_id = %ctx.user.subject,
        api_key_id = key_id,
        "API key deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
