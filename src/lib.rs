//! PayGate - demo payment gateway backend.
//!
//! Merchants onboard through the dashboard API, issue API keys, and create
//! transactions from their own servers (or no-code payment links). Customers
//! settle those transactions on a hosted checkout page backed by a simulated
//! card/BTC processor.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum
//! - **Storage**: PostgreSQL with sqlx, or an in-memory backend
//! - **Dashboard auth**: identity asserted by an upstream provider header
//! - **Public API auth**: API keys stored as SHA-256 hashes

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;
pub mod storage;
pub mod validation;
