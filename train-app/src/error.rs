//! Error types for train-app
//!
//! Wraps data layer errors and IO errors for the shell. The engine itself
//! never fails: repository failures are values and end up as effects.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Data layer error (configuration, seeding)
    #[error("Service error: {0}")]
    Service(#[from] libtrain::TrainError),

    /// Terminal/IO error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Unusable shell input
    #[error("Command error: {0}")]
    Command(#[from] crate::command::CommandError),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Service(e) => e.exit_code(),
            AppError::Terminal(_) => 1,
            AppError::Command(_) => 3,
        }
    }
}

/// Result type for train-app operations
pub type Result<T> = std::result::Result<T, AppError>;
