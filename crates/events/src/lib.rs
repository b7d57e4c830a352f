//! Domain event abstractions shared by the domain and infrastructure crates.

pub mod consumer;
pub mod event;

pub use consumer::{ConsumerError, EventConsumer};
pub use event::Event;
