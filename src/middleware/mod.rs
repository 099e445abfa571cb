//! Request extractors that establish who is calling.
//!
//! Each extractor produces a typed context value that handlers receive as a
//! parameter. Nothing is written into request extensions.

/// API key authentication for the public API
pub mod auth;
/// Identity asserted by the upstream identity provider
pub mod identity;
