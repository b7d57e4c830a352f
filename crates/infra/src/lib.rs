//! Infrastructure layer: event store, projections, command dispatch.

pub mod command_dispatcher;
pub mod event_store;
pub mod projections;
