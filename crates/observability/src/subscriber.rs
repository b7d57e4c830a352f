//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Resolve the filter from `RUST_LOG`-style directives.
///
/// Directives that fail to parse are reported on stderr (no subscriber exists yet) and
/// replaced by [`DEFAULT_FILTER`].
pub fn filter_from(directives: Option<&str>) -> EnvFilter {
    let Some(directives) = directives.map(str::trim).filter(|d| !d.is_empty()) else {
        return EnvFilter::new(DEFAULT_FILTER);
    };

    EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("invalid {}={directives:?} ({err}); using {DEFAULT_FILTER:?}", EnvFilter::DEFAULT_ENV);
        EnvFilter::new(DEFAULT_FILTER)
    })
}

/// Install the process-wide JSON subscriber.
///
/// Events are flattened so `stream_id`, `event_type` and friends sit next to `message`.
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_from(directives.as_deref()))
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_target(false)
        .try_init();
}
