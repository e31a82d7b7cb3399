//! Pure reducer for state transitions
//!
//! `reduce` is a pure function of `(UiState, Action)`. It never touches the
//! repository; instead it returns the next state together with at most one
//! effect and at most one command for the engine to run. Repository results
//! come back in as completion actions (`Loaded`, `Added`, ...).
//!
//! # Purity Guarantees
//!
//! - No network requests
//! - No mutations (returns new state)
//! - Deterministic (same inputs -> same output)

use libtrain::{ErrorInfo, Outcome, Record};

use super::effects::Effect;
use super::intent::Intent;
use super::state::UiState;

pub const LOAD_FAILED: &str = "An error occurred while loading records";
pub const ADD_FAILED: &str = "An error occurred while adding the record";
pub const UPDATE_FAILED: &str = "An error occurred while updating the record";
pub const DELETE_FAILED: &str = "An error occurred while deleting the record";

pub const ADD_SUCCEEDED: &str = "Record added successfully";
pub const UPDATE_SUCCEEDED: &str = "Record updated successfully";
pub const DELETE_SUCCEEDED: &str = "Record deleted successfully";

/// Input to the reducer: an intent or the completion of a repository call
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Intent(Intent),
    Loaded(Outcome<Vec<Record>>),
    Added(Outcome<()>),
    Updated(Outcome<()>),
    Deleted(Outcome<()>),
}

impl Action {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::Intent(intent) => intent.name(),
            Action::Loaded(_) => "loaded",
            Action::Added(_) => "added",
            Action::Updated(_) => "updated",
            Action::Deleted(_) => "deleted",
        }
    }

    /// Error carried by a failed repository completion
    pub fn failure(&self) -> Option<&ErrorInfo> {
        match self {
            Action::Intent(_) => None,
            Action::Loaded(outcome) => outcome.error(),
            Action::Added(outcome) | Action::Updated(outcome) | Action::Deleted(outcome) => outcome.error(),
        }
    }
}

impl From<Intent> for Action {
    fn from(intent: Intent) -> Self {
        Action::Intent(intent)
    }
}

/// Work the engine performs after committing a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Add { title: String, body: String },
    Update { id: String, title: String, body: String },
    Delete { id: String },
    /// Feed another intent in once this transition is committed
    Dispatch(Intent),
}

/// Result of one reducer step
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: UiState,
    pub effect: Option<Effect>,
    pub command: Option<Command>,
}

impl Transition {
    fn to(state: UiState) -> Self {
        Self {
            state,
            effect: None,
            command: None,
        }
    }

    fn with_message(mut self, message: &str) -> Self {
        self.effect = Some(Effect::ShowMessage(message.to_string()));
        self
    }

    fn with_command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }
}

/// Pure reducer function
///
/// Takes current state and an action, returns the transition to commit.
pub fn reduce(state: UiState, action: Action) -> Transition {
    match action {
        Action::Intent(intent) => reduce_intent(state, intent),
        Action::Loaded(outcome) => on_loaded(state, outcome),
        Action::Added(outcome) => on_saved(state, outcome, ADD_SUCCEEDED, ADD_FAILED, |state| UiState {
            show_add_dialog: false,
            ..state
        }),
        Action::Updated(outcome) => on_saved(state, outcome, UPDATE_SUCCEEDED, UPDATE_FAILED, |state| UiState {
            show_edit_dialog: false,
            ..state
        }),
        Action::Deleted(outcome) => match outcome {
            Outcome::Success(()) => Transition::to(UiState {
                is_loading: false,
                ..state
            })
            .with_message(DELETE_SUCCEEDED)
            .with_command(Command::Dispatch(Intent::Load)),
            Outcome::Failure(error) => Transition::to(UiState {
                is_loading: false,
                ..state
            })
            .with_message(error.message_or(DELETE_FAILED)),
        },
    }
}

fn reduce_intent(state: UiState, intent: Intent) -> Transition {
    if intent.is_mutating() && !state.accepts_mutation() {
        tracing::debug!("Ignoring {} while a request is in flight", intent.name());
        return Transition::to(state);
    }

    match intent {
        Intent::Load => Transition::to(UiState {
            is_loading: true,
            ..state
        })
        .with_command(Command::List),

        Intent::Add { title, body } => Transition::to(UiState {
            is_loading: true,
            ..state
        })
        .with_command(Command::Add { title, body }),

        Intent::Update => {
            let command = Command::Update {
                id: state
                    .record_being_edited
                    .as_ref()
                    .map(|record| record.id_or_empty().to_string())
                    .unwrap_or_default(),
                title: state.title_buffer.clone(),
                body: state.body_buffer.clone(),
            };
            Transition::to(UiState {
                is_loading: true,
                ..state
            })
            .with_command(command)
        }

        Intent::Delete(id) => Transition::to(UiState {
            is_loading: true,
            ..state
        })
        .with_command(Command::Delete { id }),

        Intent::SetTitleBuffer(title_buffer) => Transition::to(UiState {
            title_buffer,
            ..state
        }),

        Intent::SetBodyBuffer(body_buffer) => Transition::to(UiState {
            body_buffer,
            ..state
        }),

        Intent::SetAddDialogVisible(show_add_dialog) => Transition::to(UiState {
            show_add_dialog,
            ..state
        }),

        Intent::SetEditDialogVisible(show_edit_dialog) => Transition::to(UiState {
            show_edit_dialog,
            ..state
        }),

        Intent::SelectForEdit(record) => Transition::to(UiState {
            record_being_edited: Some(record),
            ..state
        }),
    }
}

fn on_loaded(state: UiState, outcome: Outcome<Vec<Record>>) -> Transition {
    match outcome {
        Outcome::Success(records) => Transition::to(UiState {
            is_loading: false,
            records,
            error_message: None,
            ..state
        }),
        Outcome::Failure(error) => {
            // Stale records stay on screen
            let message = error.message_or(LOAD_FAILED).to_string();
            Transition::to(UiState {
                is_loading: false,
                error_message: Some(message.clone()),
                ..state
            })
            .with_message(&message)
        }
    }
}

/// Shared completion of Add and Update
fn on_saved(
    state: UiState,
    outcome: Outcome<()>,
    success_message: &str,
    default_failure: &str,
    close_dialog: impl FnOnce(UiState) -> UiState,
) -> Transition {
    match outcome {
        Outcome::Success(()) => Transition::to(close_dialog(UiState {
            is_loading: false,
            title_buffer: String::new(),
            body_buffer: String::new(),
            ..state
        }))
        .with_message(success_message)
        .with_command(Command::Dispatch(Intent::Load)),
        Outcome::Failure(error) => Transition::to(UiState {
            is_loading: false,
            ..state
        })
        .with_message(error.message_or(default_failure)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libtrain::ErrorKind;

    fn loading() -> UiState {
        UiState {
            is_loading: true,
            ..UiState::default()
        }
    }

    fn records() -> Vec<Record> {
        let timestamp = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH;
        ["A", "B"]
            .iter()
            .zip(["1", "2"])
            .map(|(title, id)| Record {
                timestamp,
                ..Record::new(*title, "").with_id(id)
            })
            .collect()
    }

    #[test]
    fn test_reducer_is_pure() {
        let state = UiState::new();
        let transition = reduce(state.clone(), Action::Intent(Intent::SetTitleBuffer("x".to_string())));

        assert_eq!(state.title_buffer, "");
        assert_eq!(transition.state.title_buffer, "x");
        assert!(transition.effect.is_none());
        assert!(transition.command.is_none());
    }

    #[test]
    fn test_set_title_buffer_is_idempotent() {
        let intent = Intent::SetTitleBuffer("x".to_string());
        let once = reduce(UiState::new(), intent.clone().into()).state;
        let twice = reduce(once.clone(), intent.into()).state;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_load_starts_loading_and_lists() {
        let transition = reduce(UiState::new(), Intent::Load.into());
        assert!(transition.state.is_loading);
        assert_eq!(transition.command, Some(Command::List));
        assert!(transition.effect.is_none());
    }

    #[test]
    fn test_loaded_success_replaces_records_and_clears_error() {
        let state = UiState {
            error_message: Some("old".to_string()),
            ..loading()
        };

        let transition = reduce(state, Action::Loaded(Outcome::success(records())));

        assert!(!transition.state.is_loading);
        assert_eq!(transition.state.records, records());
        assert!(transition.state.error_message.is_none());
        assert!(transition.effect.is_none());
        assert!(transition.command.is_none());
    }

    #[test]
    fn test_loaded_failure_keeps_records() {
        let state = UiState {
            records: records(),
            ..loading()
        };

        let transition = reduce(
            state,
            Action::Loaded(Outcome::failure(ErrorInfo::new(ErrorKind::Transport, "offline"))),
        );

        assert!(!transition.state.is_loading);
        assert_eq!(transition.state.records, records());
        assert_eq!(transition.state.error_message.as_deref(), Some("offline"));
        assert_eq!(transition.effect, Some(Effect::ShowMessage("offline".to_string())));
    }

    #[test]
    fn test_loaded_failure_without_message_uses_default() {
        let transition = reduce(
            loading(),
            Action::Loaded(Outcome::failure(ErrorInfo::without_message(ErrorKind::Transport))),
        );

        assert_eq!(transition.state.error_message.as_deref(), Some(LOAD_FAILED));
        assert_eq!(transition.effect, Some(Effect::ShowMessage(LOAD_FAILED.to_string())));
    }

    #[test]
    fn test_add_issues_command() {
        let transition = reduce(
            UiState::new(),
            Intent::Add {
                title: "T".to_string(),
                body: "B".to_string(),
            }
            .into(),
        );

        assert!(transition.state.is_loading);
        assert_eq!(
            transition.command,
            Some(Command::Add {
                title: "T".to_string(),
                body: "B".to_string()
            })
        );
    }

    #[test]
    fn test_added_success_clears_buffers_and_reloads() {
        let state = UiState {
            title_buffer: "T".to_string(),
            body_buffer: "B".to_string(),
            show_add_dialog: true,
            ..loading()
        };

        let transition = reduce(state, Action::Added(Outcome::success(())));

        assert!(!transition.state.is_loading);
        assert_eq!(transition.state.title_buffer, "");
        assert_eq!(transition.state.body_buffer, "");
        assert!(!transition.state.show_add_dialog);
        assert_eq!(transition.effect, Some(Effect::ShowMessage(ADD_SUCCEEDED.to_string())));
        assert_eq!(transition.command, Some(Command::Dispatch(Intent::Load)));
    }

    #[test]
    fn test_added_failure_keeps_buffers() {
        let state = UiState {
            title_buffer: "T".to_string(),
            body_buffer: "B".to_string(),
            show_add_dialog: true,
            ..loading()
        };

        let transition = reduce(
            state,
            Action::Added(Outcome::failure(ErrorInfo::new(ErrorKind::Transport, "network down"))),
        );

        assert!(!transition.state.is_loading);
        assert_eq!(transition.state.title_buffer, "T");
        assert_eq!(transition.state.body_buffer, "B");
        assert!(transition.state.show_add_dialog);
        assert!(transition.state.error_message.is_none());
        assert_eq!(transition.effect, Some(Effect::ShowMessage("network down".to_string())));
        assert!(transition.command.is_none());
    }

    #[test]
    fn test_update_reads_buffers_and_selected_id() {
        let state = UiState {
            title_buffer: "new title".to_string(),
            body_buffer: "new body".to_string(),
            record_being_edited: Some(Record::new("old", "old").with_id("7")),
            ..UiState::default()
        };

        let transition = reduce(state, Intent::Update.into());

        assert!(transition.state.is_loading);
        assert_eq!(
            transition.command,
            Some(Command::Update {
                id: "7".to_string(),
                title: "new title".to_string(),
                body: "new body".to_string(),
            })
        );
    }

    #[test]
    fn test_update_without_selection_sends_empty_id() {
        let transition = reduce(UiState::new(), Intent::Update.into());

        match transition.command {
            Some(Command::Update { id, .. }) => assert_eq!(id, ""),
            other => panic!("expected update command, got {:?}", other),
        }
    }

    #[test]
    fn test_updated_success_closes_edit_dialog() {
        let selected = Record::new("t", "b").with_id("1");
        let state = UiState {
            show_edit_dialog: true,
            record_being_edited: Some(selected.clone()),
            title_buffer: "t".to_string(),
            ..loading()
        };

        let transition = reduce(state, Action::Updated(Outcome::success(())));

        assert!(!transition.state.show_edit_dialog);
        assert_eq!(transition.state.record_being_edited, Some(selected));
        assert_eq!(transition.state.title_buffer, "");
        assert_eq!(transition.effect, Some(Effect::ShowMessage(UPDATE_SUCCEEDED.to_string())));
        assert_eq!(transition.command, Some(Command::Dispatch(Intent::Load)));
    }

    #[test]
    fn test_second_update_targets_same_record() {
        let state = UiState {
            record_being_edited: Some(Record::new("t", "b").with_id("1")),
            ..loading()
        };

        let saved = reduce(state, Action::Updated(Outcome::success(()))).state;
        let loaded = reduce(reduce(saved, Intent::Load.into()).state, Action::Loaded(Outcome::success(records()))).state;
        let again = reduce(
            UiState {
                title_buffer: "t2".to_string(),
                ..loaded
            },
            Intent::Update.into(),
        );

        assert_eq!(
            again.command,
            Some(Command::Update {
                id: "1".to_string(),
                title: "t2".to_string(),
                body: String::new(),
            })
        );
    }

    #[test]
    fn test_updated_invalid_argument_surfaces_message() {
        let transition = reduce(
            loading(),
            Action::Updated(Outcome::failure(ErrorInfo::invalid_argument(
                "cannot update a record without an id",
            ))),
        );

        assert!(!transition.state.is_loading);
        assert_eq!(
            transition.effect,
            Some(Effect::ShowMessage("cannot update a record without an id".to_string()))
        );
    }

    #[test]
    fn test_deleted_success_reloads() {
        let transition = reduce(loading(), Action::Deleted(Outcome::success(())));

        assert!(!transition.state.is_loading);
        assert_eq!(transition.effect, Some(Effect::ShowMessage(DELETE_SUCCEEDED.to_string())));
        assert_eq!(transition.command, Some(Command::Dispatch(Intent::Load)));
    }

    #[test]
    fn test_deleted_failure_without_message_uses_default() {
        let state = UiState {
            records: records(),
            ..loading()
        };

        let transition = reduce(
            state,
            Action::Deleted(Outcome::failure(ErrorInfo::without_message(ErrorKind::Transport))),
        );

        assert!(!transition.state.is_loading);
        assert_eq!(transition.state.records, records());
        assert_eq!(transition.effect, Some(Effect::ShowMessage(DELETE_FAILED.to_string())));
        assert!(transition.command.is_none());
    }

    #[test]
    fn test_mutating_intent_rejected_while_loading() {
        for intent in [
            Intent::Load,
            Intent::Update,
            Intent::Delete("1".to_string()),
            Intent::Add {
                title: "t".to_string(),
                body: "b".to_string(),
            },
        ] {
            let transition = reduce(loading(), intent.into());
            assert_eq!(transition.state, loading());
            assert!(transition.effect.is_none());
            assert!(transition.command.is_none());
        }
    }

    #[test]
    fn test_pure_intents_accepted_while_loading() {
        let transition = reduce(loading(), Intent::SetBodyBuffer("typing".to_string()).into());
        assert_eq!(transition.state.body_buffer, "typing");
        assert!(transition.state.is_loading);
    }

    #[test]
    fn test_dialog_toggles_and_selection() {
        let record = Record::new("t", "b").with_id("1");

        let mut state = UiState::new();
        state = reduce(state, Intent::SetAddDialogVisible(true).into()).state;
        assert!(state.show_add_dialog);
        state = reduce(state, Intent::SetEditDialogVisible(true).into()).state;
        assert!(state.show_edit_dialog);
        state = reduce(state, Intent::SelectForEdit(record.clone()).into()).state;
        assert_eq!(state.record_being_edited, Some(record));
        state = reduce(state, Intent::SetAddDialogVisible(false).into()).state;
        assert!(!state.show_add_dialog);
        assert!(state.show_edit_dialog);
    }
}
