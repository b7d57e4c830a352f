use std::sync::Arc;

use thiserror::Error;

use tictactoe_core::StreamId;
use tictactoe_events::{ConsumerError, EventConsumer};

/// Event store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors (validation, rules).
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// The stream has never been appended to.
    #[error("stream not found: {0}")]
    StreamNotFound(StreamId),

    /// A consumer failed while being notified. The events it was notified about are
    /// already appended; the append is not rolled back.
    #[error(transparent)]
    Consumer(#[from] ConsumerError),

    #[error("event store lock poisoned")]
    Poisoned,
}

/// Append-only event store with synchronous fan-out.
///
/// ## Append Semantics
///
/// `sink()`:
/// - Appends the batch to the stream in order, creating the stream on first use
/// - Then, for each appended event in order, notifies every attached consumer in
///   attachment order
/// - Returns only after every consumer has seen every event
///
/// ## Load Semantics
///
/// `stream()`:
/// - Returns all events of the stream in append order
/// - Fails with `StreamNotFound` for a stream that was never appended to; unknown ids are
///   never treated as empty streams
pub trait EventStore<E>: Send + Sync {
    /// Append events to a stream and notify consumers.
    fn sink(&self, stream_id: &StreamId, events: Vec<E>) -> Result<(), EventStoreError>;

    /// Load the full stream.
    fn stream(&self, stream_id: &StreamId) -> Result<Vec<E>, EventStoreError>;

    /// Whether the stream holds at least one event.
    fn contains(&self, stream_id: &StreamId) -> bool;

    /// Register a consumer for all future appends.
    fn attach(&self, consumer: Arc<dyn EventConsumer<E>>) -> Result<(), EventStoreError>;
}

impl<E, S> EventStore<E> for Arc<S>
where
    S: EventStore<E> + ?Sized,
{
    fn sink(&self, stream_id: &StreamId, events: Vec<E>) -> Result<(), EventStoreError> {
        (**self).sink(stream_id, events)
    }

    fn stream(&self, stream_id: &StreamId) -> Result<Vec<E>, EventStoreError> {
        (**self).stream(stream_id)
    }

    fn contains(&self, stream_id: &StreamId) -> bool {
        (**self).contains(stream_id)
    }

    fn attach(&self, consumer: Arc<dyn EventConsumer<E>>) -> Result<(), EventStoreError> {
        (**self).attach(consumer)
    }
}
