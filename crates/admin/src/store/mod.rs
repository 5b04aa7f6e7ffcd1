//! Collaborator interfaces.
//!
//! The service talks to three external collaborators through these traits:
//!
//! - [`SettingsStore`] - generic key/value option storage
//! - [`CategorySource`] - the host catalog's product categories (read-only)
//! - [`AdminDirectory`] - admin accounts allowed to sign in
//!
//! `PostgreSQL` implementations live in [`crate::db`]; in-memory implementations
//! in [`memory`] back the tests and the CLI's dry runs.

pub mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use category_display_core::{AdminUserId, Category, CategoryId};

use crate::models::AdminAccount;

pub use memory::{MemoryAdminDirectory, MemoryCategorySource, MemorySettingsStore};

/// Errors returned by collaborator implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Persistent, process-wide key/value settings storage.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a value; `None` when the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write several keys as one atomic unit (last writer wins).
    async fn set_many(&self, entries: Vec<(String, Value)>) -> Result<(), StoreError>;

    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Read-only access to the host catalog's product categories.
#[async_trait]
pub trait CategorySource: Send + Sync {
    /// Every category, including empty ones, in catalog order.
    async fn list_all(&self) -> Result<Vec<Category>, StoreError>;

    /// Look up one category; `None` when it does not exist (any more).
    async fn get(&self, id: &CategoryId) -> Result<Option<Category>, StoreError>;

    /// Resolve several IDs at once. Missing IDs are simply absent from the map.
    async fn get_many(
        &self,
        ids: &[CategoryId],
    ) -> Result<HashMap<CategoryId, Category>, StoreError> {
        let mut found = HashMap::with_capacity(ids.len());
        for id in ids {
            if found.contains_key(id) {
                continue;
            }
            if let Some(category) = self.get(id).await? {
                found.insert(id.clone(), category);
            }
        }
        Ok(found)
    }
}

/// Admin accounts that may sign in to the editor.
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    /// Find an account by its login name.
    async fn find_by_login(&self, login: &str) -> Result<Option<AdminAccount>, StoreError>;

    /// Record a successful sign-in.
    async fn record_login(&self, id: AdminUserId) -> Result<(), StoreError>;
}
