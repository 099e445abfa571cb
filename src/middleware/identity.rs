//! Identity extractors for the merchant dashboard.
//!
//! Login, sessions and token refresh belong to an upstream OAuth/OIDC proxy.
//! That proxy forwards the authenticated subject in a trusted header (name
//! configured by `IDENTITY_HEADER`); this module only reads it.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    error::AppError,
    models::{merchant::Merchant, user::UpsertUser},
    state::AppState,
};

/// Extractor that requires an authenticated identity.
///
/// Rejects with 401 when the subject header is absent or blank.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(user: AuthUser) -> String {
///     user.subject
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Stable subject identifier from the identity provider
    pub subject: String,
    pub email: Option<String>,
}

impl AuthUser {
    /// Claims in the shape stored in the `users` table.
    pub fn to_upsert(&self) -> UpsertUser {
        UpsertUser {
            id: self.subject.clone(),
            email: self.email.clone(),
            ..UpsertUser::default()
        }
    }
}

fn header_text(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let subject = header_text(parts, state.identity.subject_header.as_str())
            .ok_or(AppError::Unauthenticated)?;
        let email = header_text(parts, state.identity.email_header.as_str());

        Ok(Self { subject, email })
    }
}

/// Extractor that requires an authenticated identity WITH a merchant profile.
///
/// - 401 if there is no identity
/// - 403 if the identity has not created a merchant profile yet
#[derive(Debug, Clone)]
pub struct MerchantContext {
    pub user: AuthUser,
    pub merchant: Merchant,
}

impl FromRequestParts<AppState> for MerchantContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let merchant = state
            .storage()
            .get_merchant_by_user_id(&user.subject)
            .await?
            .ok_or(AppError::MerchantRequired)?;

        Ok(Self { user, merchant })
    }
}
