use crate::TimeSource;
use crate::time::unix_now_millis;
use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicI64, Ordering},
    },
    thread::{self, JoinHandle},
    time::Instant,
};

/// Shared ticker state, updated once per millisecond.
#[derive(Debug)]
struct TickerInner {
    /// Milliseconds since the Unix epoch, as of the latest tick.
    now: AtomicI64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A coarse, never-decreasing time source.
///
/// `MonotonicClock` anchors itself to the wall clock exactly once, at
/// construction, and from then on advances an atomic millisecond counter
/// from a background ticker thread driven by [`Instant`]. Reads are a
/// single atomic load: no syscall on the hot path, and no way for an NTP
/// step or manual clock reset to rewind what callers observe, so a
/// generator driven by this clock cannot report [`ClockRegression`].
///
/// The trade-off is coarseness and drift: the reported time lags real time
/// by up to one tick and follows the monotonic timer rather than NTP, so it
/// slowly diverges from the wall clock over long uptimes. For ID generation
/// (where ordering matters and absolute accuracy does not) that is the
/// right trade.
///
/// Cloning is cheap and shares the ticker. The ticker thread holds only a
/// [`Weak`] reference to the shared state and exits on its next tick after
/// the last clock handle is dropped.
///
/// [`ClockRegression`]: crate::Error::ClockRegression
/// [`Weak`]: std::sync::Weak
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<TickerInner>,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Creates a clock anchored to the current wall-clock time and starts
    /// its ticker thread.
    ///
    /// # Example
    ///
    /// ```
    /// use rimeid::{MonotonicClock, TimeSource};
    ///
    /// let clock = MonotonicClock::new();
    /// let a = clock.current_millis();
    /// let b = clock.current_millis();
    /// assert!(b >= a);
    /// ```
    pub fn new() -> Self {
        let origin = unix_now_millis();
        let start = Instant::now();

        let inner = Arc::new(TickerInner {
            now: AtomicI64::new(origin),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick: u64 = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Sleep until the next tick target, if we are early.
                let target = start + Duration::from_millis(tick);
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                // Store the actual elapsed time rather than the target, so
                // oversleeping never makes the counter lie ahead of a later
                // tick.
                let elapsed_ms = start.elapsed().as_millis() as u64;
                inner_ref
                    .now
                    .store(origin + elapsed_ms as i64, Ordering::Relaxed);

                tick = elapsed_ms + 1;
            }
        });

        // The cell is freshly created; only this thread can have set it.
        let _ = inner._handle.set(handle);

        Self { inner }
    }
}

impl TimeSource for MonotonicClock {
    /// Milliseconds since the Unix epoch as of the latest tick;
    /// never decreases across reads.
    fn current_millis(&self) -> i64 {
        self.inner.now.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SystemClock;

    #[test]
    fn reads_never_decrease() {
        let clock = MonotonicClock::new();
        let mut prev = clock.current_millis();
        for _ in 0..1_000 {
            let now = clock.current_millis();
            assert!(now >= prev);
            prev = now;
        }
    }

    #[test]
    fn stays_anchored_to_the_wall_clock() {
        let clock = MonotonicClock::new();
        let wall = SystemClock.current_millis();
        let mono = clock.current_millis();
        // Freshly constructed, the two should agree to within a few ticks.
        assert!((wall - mono).abs() < 5_000, "wall={wall} mono={mono}");
    }

    #[test]
    fn advances_while_the_process_sleeps() {
        let clock = MonotonicClock::new();
        let before = clock.current_millis();
        thread::sleep(Duration::from_millis(50));
        let after = clock.current_millis();
        assert!(after > before, "before={before} after={after}");
    }
}
