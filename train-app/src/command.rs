//! Shell command parsing
//!
//! One line of input becomes one [`ShellCommand`]. Parsing is pure; turning
//! a command into an [`Intent`] needs the current state only to resolve
//! `select <id>` into the record it names.

use thiserror::Error;

use crate::app::{Intent, UiState};

/// Separator between title and body in `add <title> | <body>`
const ADD_SEPARATOR: char = '|';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("no record with id '{0}'")]
    UnknownRecord(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Load,
    Add { title: String, body: String },
    Title(String),
    Body(String),
    Select(String),
    Update,
    Delete(String),
    ShowAdd,
    HideAdd,
    ShowEdit,
    HideEdit,
    State,
    Help,
    Quit,
}

/// Parse one input line; blank lines yield `None`
pub fn parse(line: &str) -> Result<Option<ShellCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "load" | "reload" => ShellCommand::Load,
        "add" => parse_add(rest)?,
        // Buffers may legitimately be set to empty text
        "title" => ShellCommand::Title(rest.to_string()),
        "body" => ShellCommand::Body(rest.to_string()),
        "select" => ShellCommand::Select(required("select", "a record id", rest)?),
        "update" => ShellCommand::Update,
        "delete" | "rm" => ShellCommand::Delete(required("delete", "a record id", rest)?),
        "show-add" => ShellCommand::ShowAdd,
        "hide-add" => ShellCommand::HideAdd,
        "show-edit" => ShellCommand::ShowEdit,
        "hide-edit" => ShellCommand::HideEdit,
        "state" | "ls" => ShellCommand::State,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };

    Ok(Some(command))
}

fn parse_add(rest: &str) -> Result<ShellCommand, CommandError> {
    let (title, body) = match rest.split_once(ADD_SEPARATOR) {
        Some((title, body)) => (title.trim(), body.trim()),
        None => (rest, ""),
    };

    if title.is_empty() {
        return Err(CommandError::MissingArgument {
            command: "add",
            argument: "a title",
        });
    }

    Ok(ShellCommand::Add {
        title: title.to_string(),
        body: body.to_string(),
    })
}

fn required(command: &'static str, argument: &'static str, rest: &str) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, argument })
    } else {
        Ok(rest.to_string())
    }
}

impl ShellCommand {
    /// Intent this command dispatches, if any
    ///
    /// `State`, `Help` and `Quit` are handled by the shell itself.
    pub fn into_intent(self, state: &UiState) -> Result<Option<Intent>, CommandError> {
        let intent = match self {
            ShellCommand::Load => Intent::Load,
            ShellCommand::Add { title, body } => Intent::Add { title, body },
            ShellCommand::Title(text) => Intent::SetTitleBuffer(text),
            ShellCommand::Body(text) => Intent::SetBodyBuffer(text),
            ShellCommand::Select(id) => match state.find_record(&id) {
                Some(record) => Intent::SelectForEdit(record.clone()),
                None => return Err(CommandError::UnknownRecord(id)),
            },
            ShellCommand::Update => Intent::Update,
            ShellCommand::Delete(id) => Intent::Delete(id),
            ShellCommand::ShowAdd => Intent::SetAddDialogVisible(true),
            ShellCommand::HideAdd => Intent::SetAddDialogVisible(false),
            ShellCommand::ShowEdit => Intent::SetEditDialogVisible(true),
            ShellCommand::HideEdit => Intent::SetEditDialogVisible(false),
            ShellCommand::State | ShellCommand::Help | ShellCommand::Quit => return Ok(None),
        };
        Ok(Some(intent))
    }
}

pub const HELP: &str = "\
commands:
  load                    reload all records
  add <title> | <body>    create a record
  title <text>            set the title buffer
  body <text>             set the body buffer
  select <id>             pick a record to edit
  update                  save the buffers into the selected record
  delete <id>             delete a record
  show-add | hide-add     toggle the add dialog
  show-edit | hide-edit   toggle the edit dialog
  state                   print the current state
  quit                    leave";
