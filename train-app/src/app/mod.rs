//! Application module
//!
//! Contains the core application architecture:
//! - Intents: What the user (or the system) asks for
//! - State: What should be displayed right now
//! - Effects: One-shot notifications, outside the state
//! - Reducer: Pure function (State, Action) -> (State, Effect?, Command?)
//! - Engine: Serializes transitions and runs repository commands

pub mod effects;
pub mod engine;
pub mod intent;
pub mod reducer;
pub mod state;

// Re-export commonly used types
pub use effects::{Effect, EffectQueue, EffectReceiver};
pub use engine::{Engine, StateReceiver};
pub use intent::Intent;
pub use reducer::{reduce, Action, Command, Transition};
pub use state::UiState;
