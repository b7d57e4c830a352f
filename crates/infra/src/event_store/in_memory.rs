use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tictactoe_core::StreamId;
use tictactoe_events::{Event, EventConsumer};

use super::r#trait::{EventStore, EventStoreError};

/// In-memory append-only event store.
///
/// Lives for the whole process; streams are never compacted or dropped.
pub struct InMemoryEventStore<E> {
    streams: RwLock<HashMap<StreamId, Vec<E>>>,
    consumers: RwLock<Vec<Arc<dyn EventConsumer<E>>>>,
}

impl<E> InMemoryEventStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of every stream that holds events.
    pub fn stream_ids(&self) -> Result<Vec<StreamId>, EventStoreError> {
        let streams = self.streams.read().map_err(|_| EventStoreError::Poisoned)?;
        let mut ids: Vec<_> = streams.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

impl<E> Default for InMemoryEventStore<E> {
    fn default() -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
            consumers: RwLock::new(Vec::new()),
        }
    }
}

impl<E> core::fmt::Debug for InMemoryEventStore<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let streams = self.streams.read().map(|s| s.len()).unwrap_or_default();
        let consumers = self.consumers.read().map(|c| c.len()).unwrap_or_default();
        f.debug_struct("InMemoryEventStore")
            .field("streams", &streams)
            .field("consumers", &consumers)
            .finish()
    }
}

impl<E> EventStore<E> for InMemoryEventStore<E>
where
    E: Event,
{
    fn sink(&self, stream_id: &StreamId, events: Vec<E>) -> Result<(), EventStoreError> {
        if events.is_empty() {
            return Ok(());
        }

        {
            let mut streams = self.streams.write().map_err(|_| EventStoreError::Poisoned)?;
            let stream = streams.entry(stream_id.clone()).or_insert_with(|| {
                tracing::info!(stream_id = %stream_id, "stream created");
                Vec::new()
            });
            stream.extend(events.iter().cloned());
        }

        // Fan out outside the stream lock so consumers may read the store.
        let consumers = self
            .consumers
            .read()
            .map_err(|_| EventStoreError::Poisoned)?
            .clone();

        for event in &events {
            for consumer in &consumers {
                tracing::debug!(
                    stream_id = %stream_id,
                    event_type = event.event_type(),
                    "notifying consumer"
                );
                if let Err(err) = consumer.consume(event, stream_id) {
                    tracing::error!(
                        stream_id = %stream_id,
                        event_type = event.event_type(),
                        error = %err,
                        "consumer failed; appended events are kept"
                    );
                    return Err(err.into());
                }
            }
        }

        Ok(())
    }

    fn stream(&self, stream_id: &StreamId) -> Result<Vec<E>, EventStoreError> {
        let streams = self.streams.read().map_err(|_| EventStoreError::Poisoned)?;
        streams
            .get(stream_id)
            .cloned()
            .ok_or_else(|| EventStoreError::StreamNotFound(stream_id.clone()))
    }

    fn contains(&self, stream_id: &StreamId) -> bool {
        self.streams
            .read()
            .map(|streams| streams.get(stream_id).is_some_and(|s| !s.is_empty()))
            .unwrap_or(false)
    }

    fn attach(&self, consumer: Arc<dyn EventConsumer<E>>) -> Result<(), EventStoreError> {
        let mut consumers = self.consumers.write().map_err(|_| EventStoreError::Poisoned)?;
        consumers.push(consumer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tictactoe_events::ConsumerError;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestEvent(u32);

    impl Event for TestEvent {
        fn event_type(&self) -> &'static str {
            "test.event"
        }
    }

    type Log = Arc<Mutex<Vec<(&'static str, u32, StreamId)>>>;

    fn recorder(name: &'static str, log: Log) -> Arc<dyn EventConsumer<TestEvent>> {
        Arc::new(move |event: &TestEvent, stream_id: &StreamId| {
            log.lock().unwrap().push((name, event.0, stream_id.clone()));
            Ok::<_, ConsumerError>(())
        })
    }

    fn events(ids: &[u32]) -> Vec<TestEvent> {
        ids.iter().copied().map(TestEvent).collect()
    }

    #[test]
    fn stream_holds_events_in_append_order() {
        let store = InMemoryEventStore::new();
        let id = StreamId::new("test");

        store.sink(&id, events(&[1, 2, 3])).unwrap();
        store.sink(&id, events(&[4, 5, 6])).unwrap();

        assert!(store.contains(&id));
        assert_eq!(store.stream(&id).unwrap(), events(&[1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn streams_are_isolated() {
        let store = InMemoryEventStore::new();
        store.sink(&StreamId::new("a"), events(&[1])).unwrap();
        store.sink(&StreamId::new("b"), events(&[2])).unwrap();

        assert_eq!(store.stream(&StreamId::new("a")).unwrap(), events(&[1]));
        assert_eq!(store.stream(&StreamId::new("b")).unwrap(), events(&[2]));
        assert_eq!(
            store.stream_ids().unwrap(),
            vec![StreamId::new("a"), StreamId::new("b")]
        );
    }

    #[test]
    fn unknown_stream_is_not_found() {
        let store: InMemoryEventStore<TestEvent> = InMemoryEventStore::new();
        let missing = StreamId::new("missing");

        assert!(matches!(
            store.stream(&missing),
            Err(EventStoreError::StreamNotFound(id)) if id == missing
        ));
        assert!(!store.contains(&missing));
    }

    #[test]
    fn empty_sink_does_not_create_stream() {
        let store: InMemoryEventStore<TestEvent> = InMemoryEventStore::new();
        let id = StreamId::new("empty");

        store.sink(&id, Vec::new()).unwrap();

        assert!(!store.contains(&id));
        assert!(store.stream(&id).is_err());
    }

    #[test]
    fn consumers_are_notified_per_event_in_attachment_order() {
        let store = InMemoryEventStore::new();
        let log: Log = Arc::default();
        store.attach(recorder("c1", log.clone())).unwrap();
        store.attach(recorder("c2", log.clone())).unwrap();

        let id = StreamId::new("s");
        store.sink(&id, events(&[1, 2, 3])).unwrap();

        let seen: Vec<_> = log.lock().unwrap().iter().map(|(c, e, _)| (*c, *e)).collect();
        assert_eq!(
            seen,
            vec![("c1", 1), ("c2", 1), ("c1", 2), ("c2", 2), ("c1", 3), ("c2", 3)]
        );
        assert!(log.lock().unwrap().iter().all(|(_, _, s)| *s == id));
    }

    #[test]
    fn consumer_attached_later_only_sees_later_events() {
        let store = InMemoryEventStore::new();
        let id = StreamId::new("s");
        store.sink(&id, events(&[1])).unwrap();

        let log: Log = Arc::default();
        store.attach(recorder("late", log.clone())).unwrap();
        store.sink(&id, events(&[2])).unwrap();

        let seen: Vec<_> = log.lock().unwrap().iter().map(|(_, e, _)| *e).collect();
        assert_eq!(seen, vec![2]);
    }

    #[test]
    fn consumer_failure_is_surfaced_and_append_is_kept() {
        let store = InMemoryEventStore::new();
        let log: Log = Arc::default();
        store
            .attach(Arc::new(|event: &TestEvent, _: &StreamId| {
                if event.0 == 2 {
                    Err(ConsumerError::new("picky", "refuses 2"))
                } else {
                    Ok(())
                }
            }))
            .unwrap();
        store.attach(recorder("after", log.clone())).unwrap();

        let id = StreamId::new("s");
        let err = store.sink(&id, events(&[1, 2, 3])).unwrap_err();

        assert!(matches!(err, EventStoreError::Consumer(_)));
        assert_eq!(store.stream(&id).unwrap(), events(&[1, 2, 3]));
        let seen: Vec<_> = log.lock().unwrap().iter().map(|(_, e, _)| *e).collect();
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn consumers_may_read_the_store() {
        let store = Arc::new(InMemoryEventStore::new());
        let lengths = Arc::new(Mutex::new(Vec::new()));
        {
            let reader = store.clone();
            let lengths = lengths.clone();
            store
                .attach(Arc::new(move |_: &TestEvent, stream_id: &StreamId| {
                    let len = reader.stream(stream_id).map(|s| s.len()).unwrap_or_default();
                    lengths.lock().unwrap().push(len);
                    Ok::<_, ConsumerError>(())
                }))
                .unwrap();
        }

        store.sink(&StreamId::new("s"), events(&[1, 2])).unwrap();

        assert_eq!(*lengths.lock().unwrap(), vec![2, 2]);
    }
}
