//! Storage façade.
//!
//! Handlers and services talk to persistence only through [`Storage`].
//! Every query that touches merchant-owned rows is filtered by merchant id
//! here, not in the callers.

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        api_key::{ApiKey, NewApiKey},
        merchant::{Merchant, NewMerchant},
        transaction::{NewTransaction, PaymentMethod, Transaction, TransactionStatus},
        user::{UpsertUser, User},
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

/// Typed CRUD access to users, merchants, API keys and transactions.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;

    /// Insert the user or refresh its profile fields.
    async fn upsert_user(&self, user: UpsertUser) -> Result<User, AppError>;

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError>;

    async fn get_merchant_by_user_id(&self, user_id: &str) -> Result<Option<Merchant>, AppError>;

    /// Create the user's merchant profile.
    ///
    /// # Errors
    ///
    /// `MerchantExists` if the user already has one.
    async fn create_merchant(&self, merchant: NewMerchant) -> Result<Merchant, AppError>;

    /// Keys owned by `merchant_id`, newest first.
    async fn list_api_keys(&self, merchant_id: i32) -> Result<Vec<ApiKey>, AppError>;

    async fn create_api_key(&self, key: NewApiKey) -> Result<ApiKey, AppError>;

    /// Delete key `id` only if it belongs to `merchant_id`.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such key exists for this merchant.
    async fn delete_api_key(&self, id: i32, merchant_id: i32) -> Result<(), AppError>;

    /// Merchant owning the active key whose hash is `key_hash`.
    async fn get_merchant_by_api_key_hash(
        &self,
        key_hash: &str,
    ) -> Result<Option<Merchant>, AppError>;

    /// Transactions owned by `merchant_id`, newest first.
    async fn list_transactions(&self, merchant_id: i32) -> Result<Vec<Transaction>, AppError>;

    /// Insert a transaction in the `pending` state.
    async fn create_transaction(&self, transaction: NewTransaction)
    -> Result<Transaction, AppError>;

    async fn get_transaction(&self, id: i32) -> Result<Option<Transaction>, AppError>;

    /// Move a pending transaction to a terminal status.
    ///
    /// The update only applies while the row is still `pending`. Returns
    /// `None` when the transaction does not exist or was already settled,
    /// so two concurrent settlements cannot both succeed.
    async fn settle_transaction(
        &self,
        id: i32,
        status: TransactionStatus,
        method: PaymentMethod,
    ) -> Result<Option<Transaction>, AppError>;
}
