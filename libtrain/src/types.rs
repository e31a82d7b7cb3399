//! Core types for Leal Train

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A training record as shown to the user
///
/// `id` is assigned by the store when the record is created and never
/// changes afterwards. A record without an id has not been persisted and
/// cannot be updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Option<String>,
    pub title: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<SubItem>,
}

impl Record {
    /// Unsaved record stamped with the current time
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            body: body.into(),
            timestamp: Utc::now(),
            items: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_items(mut self, items: Vec<SubItem>) -> Self {
        self.items = items;
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Identifier or the empty string for unsaved records
    pub fn id_or_empty(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

/// One exercise inside a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItem {
    pub name: String,
    pub image: Option<String>,
    pub note: Option<String>,
}

impl SubItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
            note: None,
        }
    }
}
