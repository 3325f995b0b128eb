//! System-wide constants for the OpenSettle settlement engine.

/// Default number of settlement events retained in memory.
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 100_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenSettle";
