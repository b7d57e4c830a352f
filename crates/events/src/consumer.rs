use thiserror::Error;

use tictactoe_core::StreamId;

/// Failure reported by an event consumer.
///
/// Consumers run inline with the append that notified them, so this error travels back to
/// whoever appended the events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("consumer `{consumer}` failed: {message}")]
pub struct ConsumerError {
    pub consumer: String,
    pub message: String,
}

impl ConsumerError {
    pub fn new(consumer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            consumer: consumer.into(),
            message: message.into(),
        }
    }
}

/// Receives every event appended to an event store, in append order.
///
/// Read models (projections) are the typical consumer: they fold each event into a
/// query-optimized view keyed by stream. Delivery is synchronous and exactly once per
/// appended event; there is no redelivery, so consumers do not need to be idempotent.
///
/// Consumers take `&self` because the store shares them across callers; implementations
/// that keep state use interior mutability.
pub trait EventConsumer<E>: Send + Sync {
    fn consume(&self, event: &E, stream_id: &StreamId) -> Result<(), ConsumerError>;
}

impl<E, F> EventConsumer<E> for F
where
    F: Fn(&E, &StreamId) -> Result<(), ConsumerError> + Send + Sync,
{
    fn consume(&self, event: &E, stream_id: &StreamId) -> Result<(), ConsumerError> {
        self(event, stream_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn closures_are_consumers() {
        let seen = Mutex::new(Vec::new());
        let consumer = |event: &u32, stream_id: &StreamId| {
            seen.lock().unwrap().push((*event, stream_id.clone()));
            Ok::<(), ConsumerError>(())
        };

        EventConsumer::<u32>::consume(&consumer, &7, &StreamId::new("s")).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(7, StreamId::new("s"))]);
    }

    #[test]
    fn error_names_the_consumer() {
        let err = ConsumerError::new("games", "unknown stream");
        assert_eq!(err.to_string(), "consumer `games` failed: unknown stream");
    }
}
