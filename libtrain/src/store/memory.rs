//! In-memory document store
//!
//! Behaves like a remote store from the repository's point of view: calls
//! are async, may be slowed down by a configurable latency, and each
//! operation can be told to fail or to never complete. Used by the shell
//! binary and by tests that need a store without network access.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::debug;

use crate::document;
use crate::error::{ConfigError, Result};
use crate::store::{DocumentStore, Fields, StoreError, StoredDocument};
use crate::types::Record;

/// Store operation, used to target injected behavior and call counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Create,
    List,
    Update,
    Delete,
}

/// What an operation does when called
#[derive(Debug, Clone, Default)]
pub enum Behavior {
    #[default]
    Succeed,
    Fail(StoreError),
    /// Never resolves
    Hang,
}

/// In-memory store; clones share the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Vec<StoredDocument>>>>,
    behaviors: Arc<Mutex<HashMap<StoreOp, Behavior>>>,
    calls: Arc<Mutex<HashMap<StoreOp, usize>>>,
    latency: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` before it touches any data
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_behavior(&self, op: StoreOp, behavior: Behavior) {
        lock(&self.behaviors).insert(op, behavior);
    }

    /// Make `op` fail with a network error carrying `message`
    pub fn fail(&self, op: StoreOp, message: &str) {
        self.set_behavior(op, Behavior::Fail(StoreError::Network(message.to_string())));
    }

    pub fn hang(&self, op: StoreOp) {
        self.set_behavior(op, Behavior::Hang);
    }

    /// Number of times `op` was invoked, including failed and hung calls
    pub fn call_count(&self, op: StoreOp) -> usize {
        lock(&self.calls).get(&op).copied().unwrap_or(0)
    }

    /// Snapshot of a collection
    pub fn documents(&self, collection: &str) -> Vec<StoredDocument> {
        lock(&self.collections)
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Insert records directly, bypassing latency and injected behavior
    ///
    /// Records that already carry an id keep it; the others get a fresh one.
    pub fn seed(&self, collection: &str, records: &[Record]) -> Vec<String> {
        let mut collections = lock(&self.collections);
        let documents = collections.entry(collection.to_string()).or_default();

        records
            .iter()
            .map(|record| {
                let id = record
                    .id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(new_id);
                documents.push(StoredDocument {
                    id: id.clone(),
                    fields: document::encode_new(&record.title, &record.body, &record.items, record.timestamp),
                });
                id
            })
            .collect()
    }

    /// Seed a collection from a JSON array of records
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a list of records.
    pub fn seed_from_file(&self, collection: &str, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let records: Vec<Record> = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
            field: format!("seed file {}", path.display()),
            reason: e.to_string(),
        })?;
        Ok(self.seed(collection, &records).len())
    }

    /// Count the call, wait out the latency and apply the injected behavior
    async fn enter(&self, op: StoreOp) -> std::result::Result<(), StoreError> {
        *lock(&self.calls).entry(op).or_insert(0) += 1;

        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }

        let behavior = lock(&self.behaviors).get(&op).cloned().unwrap_or_default();
        match behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail(error) => Err(error),
            Behavior::Hang => {
                debug!("Memory store holding {:?} call forever", op);
                futures::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_document(&self, collection: &str, fields: Fields) -> std::result::Result<String, StoreError> {
        self.enter(StoreOp::Create).await?;

        let id = new_id();
        lock(&self.collections)
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                fields,
            });
        Ok(id)
    }

    async fn list_documents(&self, collection: &str) -> std::result::Result<Vec<StoredDocument>, StoreError> {
        self.enter(StoreOp::List).await?;
        Ok(self.documents(collection))
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> std::result::Result<(), StoreError> {
        self.enter(StoreOp::Update).await?;

        let mut collections = lock(&self.collections);
        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::Rejected(format!("document not found: {}", id)))?;

        document.fields.extend(fields);
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> std::result::Result<(), StoreError> {
        self.enter(StoreOp::Delete).await?;

        if let Some(documents) = lock(&self.collections).get_mut(collection) {
            documents.retain(|d| d.id != id);
        }
        Ok(())
    }
}
