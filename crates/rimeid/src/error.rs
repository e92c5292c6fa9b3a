use core::fmt;
use core::time::Duration;
#[cfg(not(feature = "parking-lot"))]
use std::sync::{MutexGuard, PoisonError};

/// Convenience alias for fallible operations in this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything that can go wrong while building a layout, building a
/// generator, or generating an ID.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Error {
    /// The requested field widths leave no room below the reserved sign bit.
    InvalidLayout { total_bits: u32 },
    /// A datacenter or worker identifier falls outside the range its
    /// configured bit width allows.
    InvalidIdentifier {
        field: &'static str,
        value: i64,
        max: i64,
    },
    /// The clock reported a time earlier than the last issued millisecond.
    ///
    /// The generator refuses to produce an ID rather than risk repeating
    /// one. Recovery is environmental (fix the clock, or wait until it
    /// catches up); the generator performs no correction of its own.
    ClockRegression { last_timestamp: i64, now: i64 },
    /// The clock failed to advance within the caller's wait budget while
    /// the current millisecond's sequence was already spent.
    SequenceExhausted { budget: Duration },
    /// The mutex guarding generator state was poisoned by a panicking
    /// thread.
    #[cfg(not(feature = "parking-lot"))]
    LockPoisoned,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLayout { total_bits } => write!(
                f,
                "bit layout occupies {total_bits} bits; at most 63 fit below the sign bit"
            ),
            Self::InvalidIdentifier { field, value, max } => {
                write!(f, "{field} {value} out of range [0, {max}]")
            }
            Self::ClockRegression { last_timestamp, now } => write!(
                f,
                "clock moved backwards: refusing to generate an id for {} ms (last={last_timestamp}, now={now})",
                last_timestamp - now
            ),
            Self::SequenceExhausted { budget } => {
                write!(f, "sequence exhausted: clock did not advance within {budget:?}")
            }
            #[cfg(not(feature = "parking-lot"))]
            Self::LockPoisoned => write!(f, "generator state lock poisoned"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_field() {
        let err = Error::InvalidIdentifier {
            field: "worker id",
            value: 32,
            max: 31,
        };
        assert_eq!(err.to_string(), "worker id 32 out of range [0, 31]");
    }

    #[test]
    fn display_reports_how_far_the_clock_went_back() {
        let err = Error::ClockRegression {
            last_timestamp: 1_000,
            now: 700,
        };
        let msg = err.to_string();
        assert!(msg.contains("300 ms"), "unexpected message: {msg}");
    }
}
