use std::time::{SystemTime, UNIX_EPOCH};

/// Default epoch for new generators: 2015-01-01 00:00:00 UTC+8, in Unix
/// milliseconds.
///
/// Every millisecond an ID spends below its epoch is a millisecond of time
/// horizon wasted, so prefer an epoch near your system's birth over the
/// Unix epoch itself.
pub const DEFAULT_EPOCH: i64 = 1_420_041_600_000;

/// The classic scheme's epoch: 2010-11-04 01:42:54.657 UTC, in Unix
/// milliseconds.
pub const TWITTER_EPOCH: i64 = 1_288_834_974_657;

/// A source of current time for ID generation.
///
/// Implementations report milliseconds since the Unix epoch: absolute
/// time, not time since a generator's epoch. Generators subtract their own
/// epoch when packing the timestamp field, so one clock can back any number
/// of generators with different epochs.
pub trait TimeSource {
    /// The current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> i64;
}

/// Wall-clock time source backed by [`SystemTime`].
///
/// The straightforward choice, and the one that can move backward: a step
/// adjustment (NTP correction, a manual reset, a VM migration) rewinds it,
/// which a generator surfaces as [`ClockRegression`]. Use
/// [`MonotonicClock`] where that must not happen.
///
/// [`ClockRegression`]: crate::Error::ClockRegression
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        unix_now_millis()
    }
}

pub(crate) fn unix_now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock set before the UNIX epoch")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_reads_after_the_default_epoch() {
        let now = SystemClock.current_millis();
        assert!(now > DEFAULT_EPOCH);
    }

    #[test]
    fn system_clock_never_jumps_wildly_between_reads() {
        let a = SystemClock.current_millis();
        let b = SystemClock.current_millis();
        // Consecutive reads are at most a scheduler hiccup apart.
        assert!((b - a).abs() < 1_000);
    }
}
