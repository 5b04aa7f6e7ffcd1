//! In-memory collaborator implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use category_display_core::{AdminRole, AdminUserId, Category, CategoryId};

use super::{AdminDirectory, CategorySource, SettingsStore, StoreError};
use crate::models::AdminAccount;
use crate::services::auth::digest_access_token;

/// Settings held in a process-local map.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored entry.
    pub async fn snapshot(&self) -> HashMap<String, Value> {
        self.values.read().await.clone()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set_many(&self, entries: Vec<(String, Value)>) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        values.extend(entries);
        Ok(())
    }
}

/// A fixed catalog kept in memory, in catalog order.
#[derive(Debug, Default)]
pub struct MemoryCategorySource {
    categories: RwLock<Vec<Category>>,
}

impl MemoryCategorySource {
    #[must_use]
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories: RwLock::new(categories),
        }
    }

    /// Add a category at the end of the catalog, or replace it in place.
    pub async fn upsert(&self, category: Category) {
        let mut categories = self.categories.write().await;
        match categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category,
            None => categories.push(category),
        }
    }

    /// Delete a category from the catalog.
    pub async fn remove(&self, id: &CategoryId) -> bool {
        let mut categories = self.categories.write().await;
        let before = categories.len();
        categories.retain(|c| &c.id != id);
        categories.len() != before
    }
}

#[async_trait]
impl CategorySource for MemoryCategorySource {
    async fn list_all(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.categories.read().await.clone())
    }

    async fn get(&self, id: &CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .find(|c| &c.id == id)
            .cloned())
    }
}

/// Admin accounts kept in memory.
#[derive(Debug, Default)]
pub struct MemoryAdminDirectory {
    accounts: RwLock<Vec<AdminAccount>>,
}

impl MemoryAdminDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that signs in with `access_token`.
    pub async fn insert(
        &self,
        login: &str,
        name: &str,
        role: AdminRole,
        access_token: &str,
    ) -> AdminUserId {
        let mut accounts = self.accounts.write().await;
        let next = accounts.iter().map(|a| a.id.as_i32()).max().unwrap_or(0) + 1;
        let id = AdminUserId::new(next);
        accounts.push(AdminAccount {
            id,
            login: login.to_owned(),
            name: name.to_owned(),
            role,
            token_digest: digest_access_token(access_token),
            created_at: Utc::now(),
            last_login_at: None,
        });
        id
    }
}

#[async_trait]
impl AdminDirectory for MemoryAdminDirectory {
    async fn find_by_login(&self, login: &str) -> Result<Option<AdminAccount>, StoreError> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .find(|a| a.login == login)
            .cloned())
    }

    async fn record_login(&self, id: AdminUserId) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::Backend(format!("unknown admin user {id}")))?;
        account.last_login_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn category(id: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: id.to_owned(),
            slug: id.to_owned(),
            product_count: 1,
            image_url: None,
            link: format!("/product-category/{id}/"),
        }
    }

    #[tokio::test]
    async fn test_settings_get_missing_and_present() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);

        store
            .set_many(vec![("k".to_owned(), json!(true))])
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_settings_set_many_overwrites() {
        let store = MemorySettingsStore::new();
        store
            .set_many(vec![("a".to_owned(), json!(1)), ("b".to_owned(), json!(2))])
            .await
            .unwrap();
        store.set_many(vec![("a".to_owned(), json!(3))]).await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.get("a"), Some(&json!(3)));
        assert_eq!(snapshot.get("b"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_category_source_get_many_skips_missing() {
        let source = MemoryCategorySource::new(vec![category("a"), category("b")]);
        let ids = vec![CategoryId::new("b"), CategoryId::new("zz"), CategoryId::new("b")];
        let found = source.get_many(&ids).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains_key(&CategoryId::new("b")));
    }

    #[tokio::test]
    async fn test_category_source_upsert_and_remove() {
        let source = MemoryCategorySource::new(vec![category("a")]);
        source.upsert(category("b")).await;
        let mut renamed = category("a");
        renamed.name = "Renamed".to_owned();
        source.upsert(renamed).await;

        let all = source.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.first().unwrap().name, "Renamed");

        assert!(source.remove(&CategoryId::new("a")).await);
        assert!(!source.remove(&CategoryId::new("a")).await);
        assert!(source.get(&CategoryId::new("a")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_admin_directory_records_login() {
        let directory = MemoryAdminDirectory::new();
        let id = directory
            .insert("ops", "Ops", AdminRole::Admin, "token-123")
            .await;

        let account = directory.find_by_login("ops").await.unwrap().unwrap();
        assert_eq!(account.id, id);
        assert!(account.last_login_at.is_none());

        directory.record_login(id).await.unwrap();
        let account = directory.find_by_login("ops").await.unwrap().unwrap();
        assert!(account.last_login_at.is_some());
        assert!(directory.find_by_login("nobody").await.unwrap().is_none());
    }
}
