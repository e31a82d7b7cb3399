//! Timeout-guarded repository over the remote document store
//!
//! Every operation races the store call against a fixed deadline and folds
//! all failure modes into [`Outcome::Failure`]. Nothing escapes as an `Err`
//! or a panic.
//!
//! # Late completions
//!
//! Store calls run on their own task. When the deadline fires the task is
//! aborted, so a call that would have completed later can neither mutate
//! the store nor report a result after the timeout was already returned.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use libtrain::{Outcome, RemoteTrainRepository, TrainRepository};
//! use libtrain::store::memory::MemoryStore;
//!
//! # async fn example() {
//! let repository = RemoteTrainRepository::new(
//!     Arc::new(MemoryStore::new()),
//!     "trains",
//!     Duration::from_secs(10),
//! );
//!
//! repository.add("Leg day", "squats, lunges").await;
//! if let Outcome::Success(records) = repository.list().await {
//!     println!("{} records", records.len());
//! }
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use crate::config::RepositoryConfig;
use crate::document;
use crate::error::Result;
use crate::outcome::{ErrorInfo, ErrorKind, Outcome};
use crate::store::{DocumentStore, StoreError};
use crate::types::{Record, SubItem};

/// Record operations as seen by the presentation core
#[async_trait]
pub trait TrainRepository: Send + Sync {
    /// Submit a new record; the store assigns its id
    async fn add(&self, title: &str, body: &str) -> Outcome<()>;

    /// All records in store-defined order
    async fn list(&self) -> Outcome<Vec<Record>>;

    /// Replace title and body of a persisted record
    ///
    /// Fails with `ErrorKind::InvalidArgument` for an empty id without
    /// contacting the store.
    async fn update(&self, id: &str, title: &str, body: &str) -> Outcome<()>;

    /// Remove a persisted record
    ///
    /// Fails with `ErrorKind::InvalidArgument` for an empty id without
    /// contacting the store.
    async fn delete(&self, id: &str) -> Outcome<()>;
}

/// Repository backed by a [`DocumentStore`]
///
/// Holds no mutable state, so one instance can serve any number of
/// concurrent callers.
pub struct RemoteTrainRepository<S> {
    store: Arc<S>,
    collection: String,
    timeout: Duration,
}

impl<S> Clone for RemoteTrainRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
            timeout: self.timeout,
        }
    }
}

impl<S> RemoteTrainRepository<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: Arc<S>, collection: impl Into<String>, timeout: Duration) -> Self {
        Self {
            store,
            collection: collection.into(),
            timeout,
        }
    }

    /// Build from the `[repository]` config section
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout or collection name is invalid.
    pub fn from_config(store: Arc<S>, config: &RepositoryConfig) -> Result<Self> {
        Ok(Self::new(store, config.collection()?, config.request_timeout()?))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Add a record together with its exercises
    pub async fn add_record(&self, title: &str, body: &str, items: &[SubItem]) -> Outcome<()> {
        let fields = document::encode_new(title, body, items, Utc::now());
        let collection = self.collection.clone();

        self.guarded("add", move |store| async move {
            let id = store.create_document(&collection, fields).await?;
            debug!("Store assigned id {} to new record", id);
            Ok::<(), StoreError>(())
        })
        .await
    }

    /// Update a record and replace its exercises
    pub async fn update_record(&self, id: &str, title: &str, body: &str, items: &[SubItem]) -> Outcome<()> {
        let mut fields = document::encode_update(title, body, Utc::now());
        fields.insert(document::KEY_ITEMS.to_string(), document::encode_items(items));
        self.update_fields(id, fields).await
    }

    async fn update_fields(&self, id: &str, fields: crate::store::Fields) -> Outcome<()> {
        if let Some(failure) = require_id("update", id) {
            return failure;
        }

        let collection = self.collection.clone();
        let id = id.to_string();

        self.guarded("update", move |store| async move {
            store.update_document(&collection, &id, fields).await
        })
        .await
    }

    /// Run a store call on its own task, bounded by the deadline
    async fn guarded<T, F, Fut>(&self, operation: &'static str, call: F) -> Outcome<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<S>) -> Fut,
        Fut: Future<Output = std::result::Result<T, StoreError>> + Send + 'static,
    {
        debug!("Starting {} on collection {}", operation, self.collection);

        let mut task = tokio::spawn(call(Arc::clone(&self.store)));

        match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(Ok(Ok(value))) => Outcome::success(value),
            Ok(Ok(Err(e))) => {
                warn!("Store {} failed: {}", operation, e);
                Outcome::failure(ErrorInfo::transport(&e))
            }
            Ok(Err(join_error)) => {
                warn!("Store {} task ended abnormally: {}", operation, join_error);
                Outcome::failure(
                    ErrorInfo::without_message(ErrorKind::Transport).with_cause(join_error.to_string()),
                )
            }
            Err(_) => {
                task.abort();
                warn!(
                    "Store {} exceeded {:?} deadline, abandoning call",
                    operation, self.timeout
                );
                Outcome::failure(ErrorInfo::timeout())
            }
        }
    }
}

fn require_id<T>(operation: &str, id: &str) -> Option<Outcome<T>> {
    if id.trim().is_empty() {
        warn!("Refusing to {} a record without an id", operation);
        Some(Outcome::failure(ErrorInfo::invalid_argument(format!(
            "cannot {} a record without an id",
            operation
        ))))
    } else {
        None
    }
}

#[async_trait]
impl<S> TrainRepository for RemoteTrainRepository<S>
where
    S: DocumentStore + 'static,
{
    async fn add(&self, title: &str, body: &str) -> Outcome<()> {
        self.add_record(title, body, &[]).await
    }

    async fn list(&self) -> Outcome<Vec<Record>> {
        let collection = self.collection.clone();

        self.guarded("list", move |store| async move {
            let documents = store.list_documents(&collection).await?;
            Ok::<Vec<Record>, StoreError>(documents.iter().map(document::decode).collect())
        })
        .await
    }

    async fn update(&self, id: &str, title: &str, body: &str) -> Outcome<()> {
        let fields = document::encode_update(title, body, Utc::now());
        self.update_fields(id, fields).await
    }

    async fn delete(&self, id: &str) -> Outcome<()> {
        if let Some(failure) = require_id("delete", id) {
            return failure;
        }

        let collection = self.collection.clone();
        let id = id.to_string();

        self.guarded("delete", move |store| async move {
            store.delete_document(&collection, &id).await
        })
        .await
    }
}
