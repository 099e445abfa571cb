//! In-process storage backend.
//!
//! Mirrors the postgres backend's semantics (ownership filters, ordering,
//! conditional settlement) over plain maps. Nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{
        api_key::{ApiKey, NewApiKey},
        merchant::{Merchant, NewMerchant},
        transaction::{NewTransaction, PaymentMethod, Transaction, TransactionStatus},
        user::{UpsertUser, User},
    },
    security::hashes_match,
};

use super::Storage;

#[derive(Default)]
struct Tables {
    users: BTreeMap<String, User>,
    merchants: BTreeMap<i32, Merchant>,
    api_keys: BTreeMap<i32, ApiKey>,
    transactions: BTreeMap<i32, Transaction>,
    next_merchant_id: i32,
    next_api_key_id: i32,
    next_transaction_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn upsert_user(&self, user: UpsertUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        let stored = tables
            .users
            .entry(user.id.clone())
            .and_modify(|existing| {
                existing.email = user.email.clone().or(existing.email.take());
                existing.first_name = user.first_name.clone().or(existing.first_name.take());
                existing.last_name = user.last_name.clone().or(existing.last_name.take());
                existing.profile_image_url = user
                    .profile_image_url
                    .clone()
                    .or(existing.profile_image_url.take());
                existing.updated_at = now;
            })
            .or_insert_with(|| User {
                id: user.id.clone(),
                email: user.email.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                profile_image_url: user.profile_image_url.clone(),
                created_at: now,
                updated_at: now,
            });

        Ok(stored.clone())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn get_merchant_by_user_id(&self, user_id: &str) -> Result<Option<Merchant>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .merchants
            .values()
            .find(|m| m.user_id == user_id)
            .cloned())
    }

    async fn create_merchant(&self, merchant: NewMerchant) -> Result<Merchant, AppError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&merchant.user_id) {
            return Err(AppError::Storage(format!(
                "merchant references unknown user {}",
                merchant.user_id
            )));
        }
        if tables
            .merchants
            .values()
            .any(|m| m.user_id == merchant.user_id)
        {
            return Err(AppError::MerchantExists);
        }

        let id = next_id(&mut tables.next_merchant_id);
        let created = Merchant {
            id,
            user_id: merchant.user_id,
            business_name: merchant.business_name,
            website_url: merchant.website_url,
            created_at: Utc::now(),
        };
        tables.merchants.insert(id, created.clone());

        Ok(created)
    }

    async fn list_api_keys(&self, merchant_id: i32) -> Result<Vec<ApiKey>, AppError> {
        let tables = self.tables.read().await;
        // BTreeMap iterates by ascending id, which is insertion order
        Ok(tables
            .api_keys
            .values()
            .rev()
            .filter(|k| k.merchant_id == merchant_id)
            .cloned()
            .collect())
    }

    async fn create_api_key(&self, key: NewApiKey) -> Result<ApiKey, AppError> {
        let mut tables = self.tables.write().await;

        if !tables.merchants.contains_key(&key.merchant_id) {
            return Err(AppError::Storage(format!(
                "api key references unknown merchant {}",
                key.merchant_id
            )));
        }
        if tables.api_keys.values().any(|k| k.key_hash == key.key_hash) {
            return Err(AppError::Storage("duplicate api key hash".to_string()));
        }

        let id = next_id(&mut tables.next_api_key_id);
        let created = ApiKey {
            id,
            merchant_id: key.merchant_id,
            key_hash: key.key_hash,
            prefix: key.prefix,
            name: key.name,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.api_keys.insert(id, created.clone());

        Ok(created)
    }

    async fn delete_api_key(&self, id: i32, merchant_id: i32) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;

        match tables.api_keys.get(&id) {
            Some(key) if key.merchant_id == merchant_id => {
                tables.api_keys.remove(&id);
                Ok(())
            }
            _ => Err(AppError::NotFound("API key")),
        }
    }

    async fn get_merchant_by_api_key_hash(
        &self,
        key_hash: &str,
    ) -> Result<Option<Merchant>, AppError> {
        let tables = self.tables.read().await;

        // Compare against every key without short-circuiting
        let mut owner = None;
        for key in tables.api_keys.values() {
            if hashes_match(&key.key_hash, key_hash) && key.is_active {
                owner = Some(key.merchant_id);
            }
        }

        Ok(owner.and_then(|id| tables.merchants.get(&id).cloned()))
    }

    async fn list_transactions(&self, merchant_id: i32) -> Result<Vec<Transaction>, AppError> {
        let tables = self.tables.read().await;
        let mut transactions: Vec<Transaction> = tables
            .transactions
            .values()
            .filter(|t| t.merchant_id == merchant_id)
            .cloned()
            .collect();

        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(transactions)
    }

    async fn create_transaction(
        &self,
        transaction: NewTransaction,
    ) -> Result<Transaction, AppError> {
        let mut tables = self.tables.write().await;

        if !tables.merchants.contains_key(&transaction.merchant_id) {
            return Err(AppError::Storage(format!(
                "transaction references unknown merchant {}",
                transaction.merchant_id
            )));
        }

        let id = next_id(&mut tables.next_transaction_id);
        let created = Transaction {
            id,
            merchant_id: transaction.merchant_id,
            amount: transaction.amount,
            currency: transaction.currency,
            status: TransactionStatus::Pending,
            customer_email: transaction.customer_email,
            reference_id: transaction.reference_id,
            payment_method: None,
            created_at: Utc::now(),
        };
        tables.transactions.insert(id, created.clone());

        Ok(created)
    }

    async fn get_transaction(&self, id: i32) -> Result<Option<Transaction>, AppError> {
        Ok(self.tables.read().await.transactions.get(&id).cloned())
    }

    async fn settle_transaction(
        &self,
        id: i32,
        status: TransactionStatus,
        method: PaymentMethod,
    ) -> Result<Option<Transaction>, AppError> {
        let mut tables = self.tables.write().await;

        match tables.transactions.get_mut(&id) {
            Some(transaction) if transaction.status == TransactionStatus::Pending => {
                transaction.status = status;
                transaction.payment_method = Some(method.as_str().to_string());
                Ok(Some(transaction.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::hash_api_key;

    async fn seeded() -> (MemoryStorage, Merchant) {
        let storage = MemoryStorage::new();
        storage
            .upsert_user(UpsertUser {
                id: "user-a".into(),
                ..UpsertUser::default()
            })
            .await
            .unwrap();
        let merchant = storage
            .create_merchant(NewMerchant {
                user_id: "user-a".into(),
                business_name: "Acme".into(),
                website_url: None,
            })
            .await
            .unwrap();
        (storage, merchant)
    }

    fn pending(merchant_id: i32, amount: i64) -> NewTransaction {
        NewTransaction {
            merchant_id,
            amount,
            currency: "USD".into(),
            customer_email: None,
            reference_id: None,
        }
    }

    #[tokio::test]
    async fn second_merchant_for_same_user_is_rejected() {
        let (storage, first) = seeded().await;

        let second = storage
            .create_merchant(NewMerchant {
                user_id: "user-a".into(),
                business_name: "Other".into(),
                website_url: None,
            })
            .await;

        assert!(matches!(second, Err(AppError::MerchantExists)));
        let stored = storage.get_merchant_by_user_id("user-a").await.unwrap();
        assert_eq!(stored, Some(first));
    }

    #[tokio::test]
    async fn key_hash_lookup_ignores_inactive_and_unknown() {
        let (storage, merchant) = seeded().await;
        let hash = hash_api_key("sk_test_live");
        storage
            .create_api_key(NewApiKey {
                merchant_id: merchant.id,
                name: "k".into(),
                prefix: "sk_test".into(),
                key_hash: hash.clone(),
            })
            .await
            .unwrap();

        let found = storage.get_merchant_by_api_key_hash(&hash).await.unwrap();
        assert_eq!(found.map(|m| m.id), Some(merchant.id));

        let missing = storage
            .get_merchant_by_api_key_hash(&hash_api_key("sk_test_other"))
            .await
            .unwrap();
        assert!(missing.is_none());

        storage.tables.write().await.api_keys.values_mut().for_each(|k| k.is_active = false);
        assert!(
            storage
                .get_merchant_by_api_key_hash(&hash)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn delete_is_scoped_to_owner() {
        let (storage, merchant) = seeded().await;
        let key = storage
            .create_api_key(NewApiKey {
                merchant_id: merchant.id,
                name: "k".into(),
                prefix: "sk_test".into(),
                key_hash: hash_api_key("sk_test_a"),
            })
            .await
            .unwrap();

        let foreign = storage.delete_api_key(key.id, merchant.id + 1).await;
        assert!(matches!(foreign, Err(AppError::NotFound(_))));
        assert_eq!(storage.list_api_keys(merchant.id).await.unwrap().len(), 1);

        storage.delete_api_key(key.id, merchant.id).await.unwrap();
        assert!(storage.list_api_keys(merchant.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn settlement_happens_once() {
        let (storage, merchant) = seeded().await;
        let created = storage
            .create_transaction(pending(merchant.id, 500))
            .await
            .unwrap();

        let first = storage
            .settle_transaction(created.id, TransactionStatus::Success, PaymentMethod::Card)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.status, TransactionStatus::Success);
        assert_eq!(first.payment_method.as_deref(), Some("card"));

        let second = storage
            .settle_transaction(created.id, TransactionStatus::Failed, PaymentMethod::Card)
            .await
            .unwrap();
        assert!(second.is_none());

        let stored = storage.get_transaction(created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TransactionStatus::Success);
    }

    #[tokio::test]
    async fn transactions_are_listed_newest_first() {
        let (storage, merchant) = seeded().await;
        for amount in [100, 200, 300] {
            storage
                .create_transaction(pending(merchant.id, amount))
                .await
                .unwrap();
        }

        let amounts: Vec<i64> = storage
            .list_transactions(merchant.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.amount)
            .collect();

        assert_eq!(amounts, vec![300, 200, 100]);
    }
}
