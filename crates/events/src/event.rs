/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - designed to be **append-only**
/// - free of wall-clock data, so replay depends on event order alone
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "game.player_moved").
    fn event_type(&self) -> &'static str;
}
