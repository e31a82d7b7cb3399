//! Leal Train data layer
//!
//! This library provides the record model, the boundary to the remote
//! document store and the timeout-guarded repository the presentation
//! core calls into.

pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod outcome;
pub mod repository;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TrainError};
pub use outcome::{ErrorInfo, ErrorKind, Outcome};
pub use repository::{RemoteTrainRepository, TrainRepository};
pub use store::{DocumentStore, Fields, StoreError, StoredDocument};
pub use types::{Record, SubItem};
