//! State engine
//!
//! Holds the single authoritative [`UiState`], serializes every transition
//! through [`reduce`], publishes snapshots to subscribers and pushes
//! effects onto the [`EffectQueue`]. Repository calls run outside the state
//! lock, so pure intents (typing into a buffer, toggling a dialog) are
//! applied while a request is in flight.
//!
//! Follow-up work produced by a transition (a repository result, the reload
//! after a successful write) is processed from a local work queue rather
//! than by recursion, which keeps every re-dispatch strictly after the
//! transition that asked for it has been committed.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use libtrain::TrainRepository;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::effects::{EffectQueue, EffectReceiver};
use super::intent::Intent;
use super::reducer::{reduce, Action, Command, Transition};
use super::state::UiState;

/// Stream of state snapshots, starting with the one current at subscription
pub type StateReceiver = mpsc::UnboundedReceiver<UiState>;

struct Shared {
    state: Mutex<UiState>,
    subscribers: StdMutex<Vec<mpsc::UnboundedSender<UiState>>>,
    effects: EffectQueue,
    repository: Arc<dyn TrainRepository>,
}

/// Cheap to clone; all clones drive the same state
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl Engine {
    pub fn new(repository: Arc<dyn TrainRepository>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(UiState::new()),
                subscribers: StdMutex::new(Vec::new()),
                effects: EffectQueue::new(),
                repository,
            }),
        }
    }

    /// Current snapshot
    pub async fn state(&self) -> UiState {
        self.shared.state.lock().await.clone()
    }

    /// Receive the current snapshot, then every committed change
    pub async fn subscribe(&self) -> StateReceiver {
        let (sender, receiver) = mpsc::unbounded_channel();

        // Registering under the state lock means no transition slips in
        // between the initial snapshot and the first published change.
        let state = self.shared.state.lock().await;
        // Cannot fail: the receiver is still held here
        sender.send(state.clone()).ok();
        self.subscribers().push(sender);

        receiver
    }

    /// Consumer end of the effect queue; `None` after the first call
    ///
    /// Effects accumulate until this is taken, so a front end that shows
    /// messages should take it right after building the engine.
    pub fn take_effects(&self) -> Option<EffectReceiver> {
        self.shared.effects.take_receiver()
    }

    /// Process an intent and everything it triggers, returning when the
    /// chain has settled
    pub async fn dispatch(&self, intent: Intent) {
        debug!("Dispatching {}", intent.name());

        let mut work = VecDeque::from([Action::Intent(intent)]);
        while let Some(action) = work.pop_front() {
            if let Some(command) = self.apply(action).await {
                if let Some(next) = self.run(command).await {
                    work.push_back(next);
                }
            }
        }
    }

    /// Dispatch on a background task
    pub fn send(&self, intent: Intent) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move { engine.dispatch(intent).await })
    }

    /// Kick off the initial load
    pub fn start(&self) -> JoinHandle<()> {
        info!("Starting engine, loading records");
        self.send(Intent::Load)
    }

    /// Reduce one action and commit the result
    async fn apply(&self, action: Action) -> Option<Command> {
        let name = action.name();
        if let Some(error) = action.failure() {
            warn!("{} failed: {}", name, error);
        }

        let mut state = self.shared.state.lock().await;

        let Transition {
            state: next,
            effect,
            command,
        } = reduce(state.clone(), action);

        if next != *state {
            *state = next;
            self.publish(&state);
        } else {
            debug!("Action {} left state unchanged", name);
        }

        // Pushed while the lock is held so effects keep transition order
        if let Some(effect) = effect {
            debug!("Effect from {}: {}", name, effect.message());
            self.shared.effects.push(effect);
        }

        command
    }

    /// Execute a command, returning the action that reports its result
    async fn run(&self, command: Command) -> Option<Action> {
        let repository = &self.shared.repository;
        match command {
            Command::List => Some(Action::Loaded(repository.list().await)),
            Command::Add { title, body } => Some(Action::Added(repository.add(&title, &body).await)),
            Command::Update { id, title, body } => {
                Some(Action::Updated(repository.update(&id, &title, &body).await))
            }
            Command::Delete { id } => Some(Action::Deleted(repository.delete(&id).await)),
            Command::Dispatch(intent) => {
                debug!("Re-dispatching {}", intent.name());
                Some(Action::Intent(intent))
            }
        }
    }

    fn publish(&self, state: &UiState) {
        self.subscribers()
            .retain(|subscriber| subscriber.send(state.clone()).is_ok());
    }

    fn subscribers(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::UnboundedSender<UiState>>> {
        self.shared
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
