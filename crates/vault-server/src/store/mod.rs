//! Tenant-scoped persistence for vault items.
//!
//! The backing document database is an opaque collaborator; this module
//! provides an in-memory implementation of the same contract: documents are
//! stored and replaced wholesale, keyed by owner and item id, with no
//! query semantics beyond point lookup and per-owner listing.
//!
//! # Module invariants
//!
//! - The store itself never touches the cipher. Documents are sealed in
//!   [`record`] before insertion and opened after retrieval.
//! - No owner ever observes another owner's items.

pub mod record;

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::protocol::ItemKind;

/// Errors produced by the item store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No item with the given id exists for this owner.
    #[error("item not found")]
    NotFound,
}

/// A stored vault item: kind, display name, and sealed document.
#[derive(Debug, Clone)]
pub struct StoredItem {
    /// Kind of the item; decides which document fields are sensitive.
    pub kind: ItemKind,
    /// Display name, stored in the clear for list views.
    pub name: String,
    /// The item document with sensitive fields encrypted.
    pub document: serde_json::Value,
}

/// Thread-safe, tenant-scoped item store.
///
/// Wraps an `Arc<RwLock<...>>` so that concurrent request handlers can read
/// without contention while writers atomically swap whole documents.
#[derive(Clone, Debug, Default)]
pub struct ItemStore {
    inner: Arc<RwLock<HashMap<String, HashMap<Uuid, StoredItem>>>>,
}

impl ItemStore {
    /// Create a new, empty [`ItemStore`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new item for `owner`, returning its assigned id.
    pub async fn insert(&self, owner: &str, item: StoredItem) -> Uuid {
        let id = Uuid::new_v4();
        let mut lock = self.inner.write().await;
        lock.entry(owner.to_owned()).or_default().insert(id, item);
        id
    }

    /// Fetch a clone of one item.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `owner` has no item with this id.
    pub async fn get(&self, owner: &str, id: Uuid) -> Result<StoredItem, StoreError> {
        let lock = self.inner.read().await;
        lock.get(owner)
            .and_then(|items| items.get(&id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    /// List all items belonging to `owner`.
    pub async fn list(&self, owner: &str) -> Vec<(Uuid, StoredItem)> {
        let lock = self.inner.read().await;
        lock.get(owner)
            .map(|items| items.iter().map(|(id, item)| (*id, item.clone())).collect())
            .unwrap_or_default()
    }

    /// Replace an existing item wholesale.
    ///
    /// Stored documents are never mutated in place; an update swaps the
    /// entire value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `owner` has no item with this id.
    pub async fn replace(
        &self,
        owner: &str,
        id: Uuid,
        item: StoredItem,
    ) -> Result<(), StoreError> {
        let mut lock = self.inner.write().await;
        let items = lock.get_mut(owner).ok_or(StoreError::NotFound)?;
        match items.get_mut(&id) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    /// Delete an item.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `owner` has no item with this id.
    pub async fn remove(&self, owner: &str, id: Uuid) -> Result<(), StoreError> {
        let mut lock = self.inner.write().await;
        let items = lock.get_mut(owner).ok_or(StoreError::NotFound)?;
        items.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
