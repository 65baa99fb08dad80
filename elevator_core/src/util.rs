//! Common time helpers for elevator_core.

use std::time::Duration;

/// True once strictly more than `interval_ms` has passed since `since_ms`.
/// A `now_ms` earlier than `since_ms` counts as no time passed.
#[inline]
pub fn interval_elapsed(now_ms: u64, since_ms: u64, interval_ms: u64) -> bool {
    now_ms.saturating_sub(since_ms) > interval_ms
}

/// Idle time handed back after each loop iteration.
#[inline]
pub fn idle_duration(idle_us: u64) -> Duration {
    Duration::from_micros(idle_us)
}

/// Duration as whole microseconds, saturating at `u64::MAX`.
#[inline]
pub fn as_micros_u64(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
