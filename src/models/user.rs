//! User records mirrored from the external identity provider.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A user as last seen from the identity provider.
///
/// Rows are created lazily (see `Storage::upsert_user`); this service never
/// edits profile fields on its own.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable subject identifier issued by the provider
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Claims forwarded by the identity provider for the current request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUser {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}
