use std::time::Duration;

/// Default input poll interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// How often elapsed durations are refreshed, in seconds
pub const REFRESH_SECS: u64 = 60;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// Get duration refresh interval
pub fn refresh_interval() -> Duration {
    Duration::from_secs(REFRESH_SECS)
}
