//! Two-variant outcome returned by every repository operation
//!
//! Repository calls never return `Err` or panic into the caller. Every
//! failure mode (deadline exceeded, transport error, bad argument) is
//! folded into `Outcome::Failure` carrying an [`ErrorInfo`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Message surfaced when a store call misses its deadline
pub const CONNECTIVITY_MESSAGE: &str = "please check your internet connection";

/// Failure taxonomy at the repository boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Deadline exceeded waiting on the store
    Timeout,
    /// The store raised an error
    Transport,
    /// Caller-side precondition violated
    InvalidArgument,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::InvalidArgument => write!(f, "invalid argument"),
        }
    }
}

/// Error payload of a failed outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    /// Human-readable message, if the failure produced one
    pub message: Option<String>,
    /// Underlying cause, for logs
    pub cause: Option<String>,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            cause: None,
        }
    }

    /// Failure without a message; consumers fall back to their own default text.
    pub fn without_message(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            cause: None,
        }
    }

    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout, CONNECTIVITY_MESSAGE)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Transport failure keeping the store's own message
    pub fn transport(error: &StoreError) -> Self {
        let message = error.message();
        Self {
            kind: ErrorKind::Transport,
            message: if message.trim().is_empty() {
                None
            } else {
                Some(message.to_string())
            },
            cause: Some(error.to_string()),
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Message to show a user, never blank
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.message.as_deref() {
            Some(message) if !message.trim().is_empty() => message,
            _ => default,
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, &self.cause) {
            (Some(message), _) => write!(f, "{}: {}", self.kind, message),
            (None, Some(cause)) => write!(f, "{}: {}", self.kind, cause),
            (None, None) => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ErrorInfo {}

/// `Success(value)` or `Failure(error)`, never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Failure(ErrorInfo),
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    pub fn failure(error: ErrorInfo) -> Self {
        Outcome::Failure(error)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Apply exactly one of the two functions depending on the variant
    pub fn fold<U>(self, on_success: impl FnOnce(T) -> U, on_failure: impl FnOnce(ErrorInfo) -> U) -> U {
        match self {
            Outcome::Success(value) => on_success(value),
            Outcome::Failure(error) => on_failure(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, ErrorInfo> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }
}

impl<T> From<std::result::Result<T, ErrorInfo>> for Outcome<T> {
    fn from(result: std::result::Result<T, ErrorInfo>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Failure(error),
        }
    }
}
