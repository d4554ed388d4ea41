use std::time::Duration;

/// Quiet period after the last local edit before a block is persisted.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(1000);

/// Grace period during which writes to a deleted block id are dropped.
pub const TOMBSTONE_TTL: Duration = Duration::from_secs(5);
