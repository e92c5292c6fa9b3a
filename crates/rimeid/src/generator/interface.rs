use crate::{IdGenStatus, Result, SnowflakeId, TimeSource};
use core::time::Duration;

/// A minimal interface over the generator flavors.
///
/// The flavors differ in how they guard their mutable state, not in what
/// they produce, so code that only needs "give me the next ID" can take any
/// `SnowflakeGenerator`; the async adapters and the test suite do.
pub trait SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Returns the next ID, waiting out the current millisecond when its
    /// sequence is spent.
    fn next_id(&self) -> Result<SnowflakeId>;

    /// Returns the next ID, or [`SequenceExhausted`] if the clock fails to
    /// advance within `budget`.
    ///
    /// [`SequenceExhausted`]: crate::Error::SequenceExhausted
    fn next_id_within(&self, budget: Duration) -> Result<SnowflakeId>;

    /// Non-blocking probe: either an ID, or a hint to retry shortly.
    fn poll_id(&self) -> Result<IdGenStatus>;
}
