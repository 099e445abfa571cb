//! Data models representing database entities and API payloads.

/// API key model
pub mod api_key;
/// Merchant profile model
pub mod merchant;
/// Payment transaction model
pub mod transaction;
/// Identity-provider user model
pub mod user;
