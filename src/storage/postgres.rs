//! PostgreSQL storage backend.

use async_trait::async_trait;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        api_key::{ApiKey, NewApiKey},
        merchant::{Merchant, NewMerchant},
        transaction::{NewTransaction, PaymentMethod, Transaction, TransactionStatus},
        user::{UpsertUser, User},
    },
};

use super::Storage;

const MERCHANT_COLUMNS: &str = "id, user_id, business_name, website_url, created_at";
const API_KEY_COLUMNS: &str = "id, merchant_id, key_hash, prefix, name, is_active, created_at";
const TRANSACTION_COLUMNS: &str = "id, merchant_id, amount, currency, status, customer_email, \
     reference_id, payment_method, created_at";

/// sqlx-backed storage sharing one connection pool.
#[derive(Clone)]
pub struct PgStorage {
    pool: DbPool,
}

impl PgStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn upsert_user(&self, user: UpsertUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, first_name, last_name, profile_image_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET email = COALESCE(EXCLUDED.email, users.email),
                first_name = COALESCE(EXCLUDED.first_name, users.first_name),
                last_name = COALESCE(EXCLUDED.last_name, users.last_name),
                profile_image_url = COALESCE(EXCLUDED.profile_image_url, users.profile_image_url),
                updated_at = NOW()
            RETURNING id, email, first_name, last_name, profile_image_url, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(user.email)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.profile_image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, first_name, last_name, profile_image_url, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_merchant_by_user_id(&self, user_id: &str) -> Result<Option<Merchant>, AppError> {
        let merchant = sqlx::query_as::<_, Merchant>(&format!(
            "SELECT {MERCHANT_COLUMNS} FROM merchants WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(merchant)
    }

    async fn create_merchant(&self, merchant: NewMerchant) -> Result<Merchant, AppError> {
        let result = sqlx::query_as::<_, Merchant>(&format!(
            "INSERT INTO merchants (user_id, business_name, website_url)
             VALUES ($1, $2, $3)
             RETURNING {MERCHANT_COLUMNS}"
        ))
        .bind(merchant.user_id)
        .bind(merchant.business_name)
        .bind(merchant.website_url)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(merchant) => Ok(merchant),
            // UNIQUE(user_id) is the final word when two creates race
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::MerchantExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_api_keys(&self, merchant_id: i32) -> Result<Vec<ApiKey>, AppError> {
        let keys = sqlx::query_as::<_, ApiKey>(&format!(
            "SELECT {API_KEY_COLUMNS} FROM api_keys
             WHERE merchant_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(merchant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }

    async fn create_api_key(&self, key: NewApiKey) -> Result<ApiKey, AppError> {
        let key = sqlx::query_as::<_, ApiKey>(&format!(
            "INSERT INTO api_keys (merchant_id, name, prefix, key_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {API_KEY_COLUMNS}"
        ))
        .bind(key.merchant_id)
        .bind(key.name)
        .bind(key.prefix)
        .bind(key.key_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(key)
    }

    async fn delete_api_key(&self, id: i32, merchant_id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1 AND merchant_id = $2")
            .bind(id)
            // Ensure key belongs to this merchant
            .bind(merchant_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("API key"));
        }

        Ok(())
    }

    async fn get_merchant_by_api_key_hash(
        &self,
        key_hash: &str,
    ) -> Result<Option<Merchant>, AppError> {
        let merchant = sqlx::query_as::<_, Merchant>(
            r#"
            SELECT m.id, m.user_id, m.business_name, m.website_url, m.created_at
            FROM api_keys k
            JOIN merchants m ON m.id = k.merchant_id
            WHERE k.key_hash = $1 AND k.is_active = true
            "#,
        )
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(merchant)
    }

    async fn list_transactions(&self, merchant_id: i32) -> Result<Vec<Transaction>, AppError> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions
             WHERE merchant_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(merchant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn create_transaction(
        &self,
        transaction: NewTransaction,
    ) -> Result<Transaction, AppError> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "INSERT INTO transactions (merchant_id, amount, currency, status, customer_email, reference_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(transaction.merchant_id)
        .bind(transaction.amount)
        .bind(transaction.currency)
        .bind(TransactionStatus::Pending)
        .bind(transaction.customer_email)
        .bind(transaction.reference_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(transaction)
    }

    async fn get_transaction(&self, id: i32) -> Result<Option<Transaction>, AppError> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    async fn settle_transaction(
        &self,
        id: i32,
        status: TransactionStatus,
        method: PaymentMethod,
    ) -> Result<Option<Transaction>, AppError> {
        // Conditional on the current status so only one settlement wins
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "UPDATE transactions
             SET status = $1, payment_method = $2
             WHERE id = $3 AND status = $4
             RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(status)
        .bind(method.as_str())
        .bind(id)
        .bind(TransactionStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }
}
