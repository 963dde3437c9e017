//! In-memory entity stores.
//!
//! One [`EntityStore`] per entity kind, shared by every handler through
//! `AppState`. Entries keep insertion order so list endpoints page through a
//! stable sequence. Read-modify-write operations run under a single write lock.

use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An entity that can live in an [`EntityStore`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human-readable kind, used in logs.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

#[derive(Debug)]
pub struct EntityStore<T> {
    entries: Arc<RwLock<IndexMap<String, T>>>,
}

impl<T> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Build a store pre-populated with `entities`, in iteration order.
    pub fn seeded(entities: impl IntoIterator<Item = T>) -> Self {
        let entries = entities
            .into_iter()
            .map(|entity| (entity.id().to_string(), entity))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Insert or replace an entity, returning the previous value for its ID.
    pub async fn insert(&self, entity: T) -> Option<T> {
        let id = entity.id().to_string();
        tracing::debug!(kind = T::KIND, id = %id, "Storing entity");
        self.entries.write().await.insert(id, entity)
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.entries.read().await.get(id).cloned()
    }

    /// Snapshot of every entity, in insertion order.
    pub async fn list(&self) -> Vec<T> {
        self.entries.read().await.values().cloned().collect()
    }

    /// Run `f` against the stored entity under the write lock.
    ///
    /// Returns `None` when no entity has this ID. `f` sees and mutates the
    /// stored value directly, so it must leave it consistent even when it
    /// reports an error.
    pub async fn update<R>(&self, id: &str, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut entries = self.entries.write().await;
        entries.get_mut(id).map(f)
    }

    /// Remove an entity, keeping the relative order of the others.
    pub async fn remove(&self, id: &str) -> Option<T> {
        let removed = self.entries.write().await.shift_remove(id);
        if removed.is_some() {
            tracing::debug!(kind = T::KIND, id = %id, "Removed entity");
        }
        removed
    }
}
