//! UI state
//!
//! One immutable snapshot of everything a front end needs to draw. The
//! engine replaces it wholesale on every transition; nothing mutates a
//! published snapshot.

use libtrain::Record;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// A repository call is in flight
    pub is_loading: bool,

    pub records: Vec<Record>,

    /// Last load failure, cleared by the next successful load
    pub error_message: Option<String>,

    pub record_being_edited: Option<Record>,

    pub show_add_dialog: bool,

    pub show_edit_dialog: bool,

    pub title_buffer: String,

    pub body_buffer: String,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutating intents are only accepted while nothing is in flight
    pub fn accepts_mutation(&self) -> bool {
        !self.is_loading
    }

    pub fn find_record(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id.as_deref() == Some(id))
    }
}
