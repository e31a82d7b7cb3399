//! One-shot side effects
//!
//! Effects are notifications a front end acts on once (show a message) and
//! that never belong in the state. The queue has one producer (the engine)
//! and one consumer: the receiver can be taken a single time, effects are
//! received in the order they were pushed, and each is handed out once.
//!
//! Effects pushed before the consumer attaches wait in the queue, and the
//! queue is unbounded: an embedder that never takes the receiver keeps every
//! effect for the lifetime of the queue. Take it (or drop it, which makes
//! later pushes a no-op) right after construction.
//!
//! # Example
//!
//! ```
//! use train_app::app::effects::{Effect, EffectQueue};
//!
//! # async fn example() {
//! let queue = EffectQueue::new();
//! let mut receiver = queue.take_receiver().unwrap();
//!
//! queue.push(Effect::ShowMessage("Record added successfully".to_string()));
//!
//! let effect = receiver.recv().await.unwrap();
//! assert_eq!(effect.message(), "Record added successfully");
//! # }
//! ```

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

/// Receiving end of the effect queue
pub type EffectReceiver = mpsc::UnboundedReceiver<Effect>;

/// Notification emitted by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a short message to the user
    ShowMessage(String),
}

impl Effect {
    pub fn message(&self) -> &str {
        match self {
            Effect::ShowMessage(message) => message,
        }
    }
}

/// Single-producer/single-consumer effect queue
pub struct EffectQueue {
    sender: mpsc::UnboundedSender<Effect>,
    receiver: Mutex<Option<EffectReceiver>>,
}

impl EffectQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(Some(receiver)),
        }
    }

    /// Append an effect at the tail of the queue
    ///
    /// If the consumer has gone away the effect is dropped.
    pub fn push(&self, effect: Effect) {
        if self.sender.send(effect).is_err() {
            tracing::debug!("Effect consumer dropped, discarding effect");
        }
    }

    /// Hand out the consumer end; `None` once it has been taken
    pub fn take_receiver(&self) -> Option<EffectReceiver> {
        self.receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Default for EffectQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> Effect {
        Effect::ShowMessage(text.to_string())
    }

    #[tokio::test]
    async fn test_effects_delivered_in_order() {
        let queue = EffectQueue::new();
        let mut receiver = queue.take_receiver().unwrap();

        queue.push(message("first"));
        queue.push(message("second"));
        queue.push(message("third"));

        assert_eq!(receiver.recv().await.unwrap(), message("first"));
        assert_eq!(receiver.recv().await.unwrap(), message("second"));
        assert_eq!(receiver.recv().await.unwrap(), message("third"));
    }

    #[tokio::test]
    async fn test_effects_are_not_replayed() {
        let queue = EffectQueue::new();
        let mut receiver = queue.take_receiver().unwrap();

        queue.push(message("once"));
        assert_eq!(receiver.recv().await.unwrap(), message("once"));

        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_receiver_taken_once() {
        let queue = EffectQueue::new();
        assert!(queue.take_receiver().is_some());
        assert!(queue.take_receiver().is_none());
    }

    #[tokio::test]
    async fn test_effects_buffered_until_consumer_attaches() {
        let queue = EffectQueue::new();
        queue.push(message("early"));

        let mut receiver = queue.take_receiver().unwrap();
        assert_eq!(receiver.recv().await.unwrap(), message("early"));
    }

    #[test]
    fn test_push_without_consumer_does_not_panic() {
        let queue = EffectQueue::new();
        drop(queue.take_receiver());

        queue.push(message("nobody listens"));
    }
}
