//! Append-only event store boundary.
//!
//! Streams are keyed by [`StreamId`](tictactoe_core::StreamId) and only ever grow. Every
//! appended event is pushed, inline, to the consumers attached to the store.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryEventStore;
pub use r#trait::{EventStore, EventStoreError};
