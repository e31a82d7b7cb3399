//! train-app library
//!
//! Exports the engine and its types for testing and for other front ends.

pub mod app;
pub mod command;
pub mod error;
pub mod view;

// Re-export commonly used types
pub use app::{reduce, Action, Command, Effect, Engine, Intent, Transition, UiState};
pub use error::{AppError, Result};
