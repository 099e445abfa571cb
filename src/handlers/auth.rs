//! Identity endpoint used by the dashboard to show who is signed in.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    error::AppError,
    middleware::identity::AuthUser,
    models::user::{UpsertUser, User},
    state::AppState,
};

/// Either the stored profile or, before first use, the forwarded claims.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CurrentUser {
    Stored(User),
    Claims(UpsertUser),
}

/// `GET /api/auth/user`
///
/// - **200**: the caller's profile
/// - **401**: no identity asserted
pub async fn current_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<CurrentUser>, AppError> {
    let current = match state.storage().get_user(&user.subject).await? {
        Some(stored) => CurrentUser::Stored(stored),
        None => CurrentUser::Claims(user.to_upsert()),
    };

    Ok(Json(current))
}
