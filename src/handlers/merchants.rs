//! Merchant profile HTTP handlers.
//!
//! - GET /api/merchants/me - The caller's merchant profile
//! - POST /api/merchants - Create the caller's merchant profile (once)

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    error::AppError,
    middleware::identity::AuthUser,
    models::merchant::{CreateMerchantRequest, Merchant},
    state::AppState,
    validation::ApiJson,
};

/// Get the caller's merchant profile.
///
/// # Response
///
/// - **200**: merchant profile
/// - **401**: no identity
/// - **404**: identity has not onboarded yet
pub async fn get_my_merchant(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Merchant>, AppError> {
    let merchant = state
        .storage()
        .get_merchant_by_user_id(&user.subject)
        .await?
        .ok_or(AppError::NotFound("Merchant"))?;

    Ok(Json(merchant))
}

/// Create the caller's merchant profile.
///
/// # Request Body
///
/// ```json
/// { "businessName": "Acme Coffee", "websiteUrl": "https://acme.example.com" }
/// ```
///
/// # Response
///
/// - **201**: created merchant
/// - **400**: validation failure, or a profile already exists for this identity
/// - **401**: no identity
pub async fn create_merchant(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(request): ApiJson<CreateMerchantRequest>,
) -> Result<(StatusCode, Json<Merchant>), AppError> {
    let new_merchant = request.into_new_merchant(user.subject.clone())?;

    if state
        .storage()
        .get_merchant_by_user_id(&user.subject)
        .await?
        .is_some()
    {
        return Err(AppError::MerchantExists);
    }

    // Merchant rows reference users(id)
    state.storage().upsert_user(user.to_upsert()).await?;

    let merchant = state.storage().create_merchant(new_merchant).await?;

    tracing::info!(merchant_id = merchant.id, user_id = %merchant.user_id, "merchant created");

    Ok((StatusCode::CREATED, Json(merchant)))
}
