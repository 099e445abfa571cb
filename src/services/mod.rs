//! Business logic services.
//!
//! Services contain the logic that sits between HTTP handlers and storage.

pub mod api_key_service;
pub mod transaction_service;
