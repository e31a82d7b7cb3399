//! Plain-text rendering of state snapshots for the shell

use std::fmt::Write as _;

use libtrain::document::format_date;
use libtrain::Record;

use crate::app::UiState;

/// One line per record: `[id] date  title - body`
pub fn render_record(record: &Record) -> String {
    let mut line = format!(
        "[{}] {}  {}",
        record.id.as_deref().unwrap_or("unsaved"),
        format_date(&record.timestamp),
        record.title
    );
    if !record.body.is_empty() {
        let _ = write!(line, " - {}", record.body);
    }
    if !record.items.is_empty() {
        let _ = write!(line, " ({} exercises)", record.items.len());
    }
    line
}

/// Short status line printed after each transition
pub fn render_summary(state: &UiState) -> String {
    let mut summary = if state.is_loading {
        "loading...".to_string()
    } else {
        format!("{} records", state.records.len())
    };

    if let Some(error) = &state.error_message {
        let _ = write!(summary, " | error: {}", error);
    }
    if state.show_add_dialog {
        summary.push_str(" | add dialog open");
    }
    if state.show_edit_dialog {
        summary.push_str(" | edit dialog open");
    }
    if let Some(record) = &state.record_being_edited {
        let _ = write!(summary, " | editing {}", record.id_or_empty());
    }
    summary
}

/// Full dump for the `state` command
pub fn render_state(state: &UiState) -> String {
    let mut out = render_summary(state);
    let _ = write!(out, "\ntitle buffer: {:?}\nbody buffer: {:?}", state.title_buffer, state.body_buffer);
    for record in &state.records {
        out.push('\n');
        out.push_str(&render_record(record));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use libtrain::SubItem;

    fn record() -> Record {
        Record {
            timestamp: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
            ..Record::new("Leg day", "squats").with_id("1")
        }
    }

    #[test]
    fn test_render_record() {
        assert_eq!(render_record(&record()), "[1] 1970-01-01 00:00:00  Leg day - squats");
    }

    #[test]
    fn test_render_unsaved_record_with_items() {
        let record = Record {
            id: None,
            body: String::new(),
            ..record().with_items(vec![SubItem::new("squat"), SubItem::new("lunge")])
        };
        assert_eq!(render_record(&record), "[unsaved] 1970-01-01 00:00:00  Leg day (2 exercises)");
    }

    #[test]
    fn test_summary_while_loading() {
        let state = UiState {
            is_loading: true,
            ..UiState::default()
        };
        assert_eq!(render_summary(&state), "loading...");
    }

    #[test]
    fn test_summary_with_error_and_dialogs() {
        let state = UiState {
            records: vec![record()],
            error_message: Some("offline".to_string()),
            show_edit_dialog: true,
            record_being_edited: Some(record()),
            ..UiState::default()
        };
        assert_eq!(
            render_summary(&state),
            "1 records | error: offline | edit dialog open | editing 1"
        );
    }

    #[test]
    fn test_render_state_lists_records() {
        let state = UiState {
            records: vec![record()],
            title_buffer: "T".to_string(),
            ..UiState::default()
        };
        let out = render_state(&state);
        assert!(out.contains("title buffer: \"T\""));
        assert!(out.ends_with("[1] 1970-01-01 00:00:00  Leg day - squats"));
    }
}
