//! Application state shared across handlers.

use std::sync::Arc;

use crate::{
    config::{Config, IdentityConfig},
    storage::Storage,
};

/// Cloned into every handler via `State`.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub identity: Arc<IdentityConfig>,
    /// Path prefix of the hosted checkout page, without trailing slash
    pub checkout_path: Arc<str>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: &Config) -> Self {
        Self {
            storage,
            identity: Arc::new(config.identity()),
            checkout_path: Arc::from(config.checkout_path.trim_end_matches('/')),
        }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn checkout_url(&self, transaction_id: i32) -> String {
        format!("{}/{}", self.checkout_path, transaction_id)
    }
}
