//! Command execution pipeline (application-level orchestration).
//!
//! ```text
//! Command
//!   ↓
//! 1. Lock the target stream (one writer per stream)
//!   ↓
//! 2. Load the stream and rehydrate the aggregate
//!   ↓
//! 3. Handle the command (validates, then records events as pending changes)
//!   ↓
//! 4. Sink the changes (append, then synchronous fan-out to consumers)
//! ```
//!
//! Replay → validate → append runs under a per-stream mutex. Without it, two commands for
//! the same stream could replay the same history and both append, e.g. two players each
//! taking the last seat.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use tictactoe_core::{Aggregate, DomainError, StreamId};

use crate::event_store::{EventStore, EventStoreError};

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The command was rejected by the aggregate; nothing was appended.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The target stream has no events.
    #[error("stream not found: {0}")]
    NotFound(StreamId),

    /// A stream with this id already exists.
    #[error("stream already exists: {0}")]
    StreamExists(StreamId),

    /// Appending or notifying consumers failed.
    #[error(transparent)]
    Store(EventStoreError),
}

impl From<EventStoreError> for DispatchError {
    fn from(value: EventStoreError) -> Self {
        match value {
            EventStoreError::StreamNotFound(id) => DispatchError::NotFound(id),
            other => DispatchError::Store(other),
        }
    }
}

/// Reusable command execution engine for event-sourced aggregates.
///
/// Aggregates are never cached: each command rebuilds its aggregate from the stream, and
/// the aggregate is dropped once its changes are handed to the store.
#[derive(Debug)]
pub struct CommandDispatcher<S> {
    store: S,
    locks: Mutex<HashMap<StreamId, Arc<Mutex<()>>>>,
}

impl<S> CommandDispatcher<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // The lock map holds no invariant a panic could break, so poisoning is ignored.
    fn lock_map(&self) -> MutexGuard<'_, HashMap<StreamId, Arc<Mutex<()>>>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock entry for a stream about to be opened.
    fn opening_stream_lock(&self, stream_id: &StreamId) -> Arc<Mutex<()>> {
        self.lock_map().entry(stream_id.clone()).or_default().clone()
    }

    /// Lock entry for a stream that already holds events.
    ///
    /// Unknown ids get no entry, so the map grows only with real streams. Streams appended
    /// to the store directly (not through [`CommandDispatcher::create`]) get one on first use.
    fn existing_stream_lock<E>(&self, stream_id: &StreamId) -> Option<Arc<Mutex<()>>>
    where
        S: EventStore<E>,
    {
        let mut locks = self.lock_map();
        if let Some(lock) = locks.get(stream_id) {
            return Some(lock.clone());
        }
        if !self.store.contains(stream_id) {
            return None;
        }
        Some(locks.entry(stream_id.clone()).or_default().clone())
    }

    /// Persist a freshly created aggregate as a new stream.
    ///
    /// Returns the committed events (the aggregate's pending changes).
    pub fn create<A>(&self, stream_id: &StreamId, mut aggregate: A) -> Result<Vec<A::Event>, DispatchError>
    where
        A: Aggregate<Error = DomainError>,
        S: EventStore<A::Event>,
    {
        let lock = self.opening_stream_lock(stream_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self.store.contains(stream_id) {
            return Err(DispatchError::StreamExists(stream_id.clone()));
        }

        let changes = aggregate.take_changes();
        self.store.sink(stream_id, changes.clone())?;

        tracing::info!(
            stream_id = %stream_id,
            events = changes.len(),
            "stream opened"
        );
        Ok(changes)
    }

    /// Dispatch a command through the full pipeline.
    pub fn dispatch<A>(&self, stream_id: &StreamId, command: &A::Command) -> Result<Vec<A::Event>, DispatchError>
    where
        A: Aggregate<Error = DomainError> + Default,
        S: EventStore<A::Event>,
    {
        self.execute(stream_id, |aggregate: &mut A| aggregate.handle(command))
    }

    /// Run arbitrary decision logic against the rehydrated aggregate.
    ///
    /// Used when the command to issue depends on the aggregate's state (for example,
    /// join-or-move). Whatever `decide` records is appended; on error nothing is.
    pub fn execute<A, F>(&self, stream_id: &StreamId, decide: F) -> Result<Vec<A::Event>, DispatchError>
    where
        A: Aggregate<Error = DomainError> + Default,
        S: EventStore<A::Event>,
        F: FnOnce(&mut A) -> Result<(), DomainError>,
    {
        let lock = self
            .existing_stream_lock::<A::Event>(stream_id)
            .ok_or_else(|| DispatchError::NotFound(stream_id.clone()))?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let history = self.store.stream(stream_id)?;
        let mut aggregate = A::rehydrate(&history)?;

        if let Err(err) = decide(&mut aggregate) {
            tracing::warn!(stream_id = %stream_id, error = %err, "command rejected");
            return Err(err.into());
        }

        let changes = aggregate.take_changes();
        if changes.is_empty() {
            return Ok(changes);
        }

        self.store.sink(stream_id, changes.clone())?;

        tracing::info!(
            stream_id = %stream_id,
            events = changes.len(),
            version = aggregate.version(),
            "command committed"
        );
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use tictactoe_game::{Game, GameCommand, GameEvent, Player};

    use crate::event_store::InMemoryEventStore;

    use super::*;

    type Store = Arc<InMemoryEventStore<GameEvent>>;

    fn join(name: &str) -> GameCommand {
        GameCommand::Join {
            player: Player::new(name),
        }
    }

    fn lock_count(dispatcher: &CommandDispatcher<Store>) -> usize {
        dispatcher.lock_map().len()
    }

    #[test]
    fn unknown_streams_get_no_lock_entry() {
        let dispatcher = CommandDispatcher::new(Store::default());

        for i in 0..1_000 {
            let err = dispatcher
                .dispatch::<Game>(&StreamId::new(format!("missing-{i}")), &join("alice"))
                .unwrap_err();
            assert!(matches!(err, DispatchError::NotFound(_)));
        }

        assert_eq!(lock_count(&dispatcher), 0);
    }

    #[test]
    fn lock_entries_follow_real_streams() {
        let dispatcher = CommandDispatcher::new(Store::default());
        let id = StreamId::new("g");

        dispatcher.create(&id, Game::create(3).unwrap()).unwrap();
        dispatcher.dispatch::<Game>(&id, &join("alice")).unwrap();
        dispatcher.dispatch::<Game>(&StreamId::new("other"), &join("alice")).unwrap_err();

        assert_eq!(lock_count(&dispatcher), 1);
    }

    #[test]
    fn stream_appended_outside_the_dispatcher_is_dispatchable() {
        let dispatcher = CommandDispatcher::new(Store::default());
        let id = StreamId::new("external");
        let mut game = Game::create(3).unwrap();
        dispatcher.store().sink(&id, game.take_changes()).unwrap();

        let committed = dispatcher.dispatch::<Game>(&id, &join("alice")).unwrap();

        assert_eq!(committed.len(), 1);
        assert_eq!(lock_count(&dispatcher), 1);
    }
}
