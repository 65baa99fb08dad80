use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Time source for the control loop and the simulated surfaces.
///
/// `sleep` is the only place the loop ever waits. Virtual clocks implement it
/// by moving time forward instead of blocking.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);

    /// Milliseconds elapsed since `epoch`, saturating at 0 on underflow
    /// and at `u64::MAX` on overflow.
    fn ms_since(&self, epoch: Instant) -> u64 {
        let dur = self.now().saturating_duration_since(epoch);
        u64::try_from(dur.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Real-time monotonic clock backed by std::time::Instant.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

/// Virtual clock whose time only moves when told to.
///
/// Time is `origin` plus a shared microsecond offset. `sleep(d)` adds `d` to
/// the offset without waiting, so a blocking wait inside the control loop
/// costs exactly `d` of virtual time. Clones share the offset, which lets a
/// scripted input source and the controller observe one timeline.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_us: Arc<AtomicU64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_us: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn advance(&self, d: Duration) {
        let step = micros(d);
        // fetch_update only fails when the closure returns None
        let _ = self
            .offset_us
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |off| {
                Some(off.saturating_add(step))
            });
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Jump to an absolute offset from the origin.
    pub fn set_offset(&self, d: Duration) {
        self.offset_us.store(micros(d), Ordering::Release);
    }

    /// Current offset from origin in whole milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.offset_us.load(Ordering::Acquire) / 1_000
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_micros(self.offset_us.load(Ordering::Acquire))
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}
