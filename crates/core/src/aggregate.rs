//! Aggregate trait for event-sourced domain models.

/// Aggregate execution semantics (pure, deterministic).
///
/// - **State mutation**: `apply(&mut self, event)` folds a trusted event into state. It
///   performs no rule checks; it is what replay uses.
/// - **Decision logic**: `handle(&mut self, cmd)` validates the command against current
///   state and, on success, applies the resulting events and records them as pending
///   changes.
///
/// Aggregates must not perform IO or side effects, and must not read the clock: replaying
/// the same events always yields the same state.
pub trait Aggregate: Sized {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Evolve in-memory state from a single event.
    ///
    /// Implementations should bump their `version()` by one per applied event.
    fn apply(&mut self, event: &Self::Event) -> Result<(), Self::Error>;

    /// Validate a command and record the events it produces.
    ///
    /// A failed command must leave the aggregate exactly as it was.
    fn handle(&mut self, command: &Self::Command) -> Result<(), Self::Error>;

    /// Events produced by commands since the aggregate was loaded.
    fn changes(&self) -> &[Self::Event];

    /// Hand the pending changes to the caller (typically after they are persisted).
    fn take_changes(&mut self) -> Vec<Self::Event>;

    /// Number of events applied so far.
    fn version(&self) -> u64;

    /// Rebuild an aggregate by replaying its history from the empty state.
    fn rehydrate<'a, I>(history: I) -> Result<Self, Self::Error>
    where
        Self: Default,
        Self::Event: 'a,
        I: IntoIterator<Item = &'a Self::Event>,
    {
        let mut aggregate = Self::default();
        for event in history {
            aggregate.apply(event)?;
        }
        Ok(aggregate)
    }
}
