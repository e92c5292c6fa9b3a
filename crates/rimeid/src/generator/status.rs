use crate::SnowflakeId;

/// Outcome of a non-blocking generation probe ([`poll_id`]).
///
/// [`Pending`] reports how many milliseconds of clock progress the
/// generator is waiting on. Callers decide how to spend that time: spin,
/// sleep, or hand the wait to an executor via
/// [`SnowflakeGeneratorAsyncExt`].
///
/// [`poll_id`]: crate::SnowflakeGenerator::poll_id
/// [`Pending`]: IdGenStatus::Pending
/// [`SnowflakeGeneratorAsyncExt`]: crate::SnowflakeGeneratorAsyncExt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdGenStatus {
    /// A fresh ID was issued.
    Ready { id: SnowflakeId },
    /// The current millisecond's sequence is spent; retry once the clock
    /// has advanced by roughly `yield_for` milliseconds.
    Pending { yield_for: i64 },
}
