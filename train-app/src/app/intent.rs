//! Intents accepted by the engine
//!
//! The set is closed. Every user gesture or system trigger is one of these
//! immutable values; the reducer (see `reducer.rs`) decides what it does.

use libtrain::Record;

/// Actions a user or the system can request
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Fetch all records from the repository
    Load,

    /// Create a record
    Add { title: String, body: String },

    /// Save the edit buffers into the record selected for editing
    Update,

    /// Delete the record with this id
    Delete(String),

    SetTitleBuffer(String),

    SetBodyBuffer(String),

    SetAddDialogVisible(bool),

    SetEditDialogVisible(bool),

    /// Remember which record the edit dialog works on
    SelectForEdit(Record),
}

impl Intent {
    /// Whether this intent issues a repository call
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Intent::Load | Intent::Add { .. } | Intent::Update | Intent::Delete(_)
        )
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Load => "load",
            Intent::Add { .. } => "add",
            Intent::Update => "update",
            Intent::Delete(_) => "delete",
            Intent::SetTitleBuffer(_) => "set_title_buffer",
            Intent::SetBodyBuffer(_) => "set_body_buffer",
            Intent::SetAddDialogVisible(_) => "set_add_dialog_visible",
            Intent::SetEditDialogVisible(_) => "set_edit_dialog_visible",
            Intent::SelectForEdit(_) => "select_for_edit",
        }
    }
}
