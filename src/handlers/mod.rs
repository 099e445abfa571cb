//! HTTP request handlers (route handlers).

/// API key management endpoints
pub mod api_keys;
/// Current identity endpoint
pub mod auth;
pub mod health;
/// Merchant profile endpoints
pub mod merchants;
/// Public API and checkout endpoints
pub mod public;
/// Dashboard transaction endpoints
pub mod transactions;
