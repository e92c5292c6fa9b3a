use super::core::{GenCore, GenState};
use crate::{IdGenStatus, Layout, Result, SnowflakeGenerator, SnowflakeId, TimeSource};
use core::cell::Cell;
use core::time::Duration;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A single-threaded Snowflake ID generator.
///
/// State lives in a [`Cell`], so this type is `!Sync`: it fits an instance
/// owned by one thread (or one instance per thread), where taking a lock
/// for every ID would buy nothing. It deliberately does not implement
/// `Clone`: two copies of the same state would issue the same IDs.
///
/// For an instance shared across threads, use [`LockSnowflakeGenerator`].
///
/// # Example
///
/// ```
/// use rimeid::{BasicSnowflakeGenerator, DEFAULT_EPOCH, Layout, SystemClock};
///
/// let generator =
///     BasicSnowflakeGenerator::new(Layout::default(), DEFAULT_EPOCH, 1, 1, SystemClock)?;
/// let a = generator.next_id()?;
/// let b = generator.next_id()?;
/// assert!(b > a);
/// # Ok::<(), rimeid::Error>(())
/// ```
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
#[derive(Debug)]
pub struct BasicSnowflakeGenerator<T> {
    core: GenCore<T>,
    state: Cell<GenState>,
}

impl<T> BasicSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for one `(datacenter, worker)` identity.
    ///
    /// `epoch` is the instant (Unix milliseconds) the timestamp field
    /// counts from; it must not lie in the future. `datacenter_id` and
    /// `worker_id` are checked against `layout` and rejected with
    /// [`InvalidIdentifier`] when out of range; uniqueness across instances
    /// rests entirely on every instance having its own pair, so the check
    /// is not optional.
    ///
    /// [`InvalidIdentifier`]: crate::Error::InvalidIdentifier
    pub fn new(
        layout: Layout,
        epoch: i64,
        datacenter_id: i64,
        worker_id: i64,
        clock: T,
    ) -> Result<Self> {
        Ok(Self {
            core: GenCore::new(layout, epoch, datacenter_id, worker_id, clock)?,
            state: Cell::new(GenState::initial()),
        })
    }

    /// Returns the next ID.
    ///
    /// Within one millisecond the sequence counts upward from 0; once it
    /// has visited every value the call busy-waits for the next millisecond
    /// and resumes at 0, so the wait is bounded by about a millisecond
    /// under a healthy clock. A clock reading earlier than the last issued
    /// millisecond aborts with [`ClockRegression`] and leaves state
    /// unchanged.
    ///
    /// [`ClockRegression`]: crate::Error::ClockRegression
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = self.state.get();
        let id = self.core.advance(&mut state)?;
        self.state.set(state);
        Ok(id)
    }

    /// Returns the next ID, giving up with [`SequenceExhausted`] if the
    /// clock fails to advance within `budget` while the sequence is spent.
    ///
    /// [`SequenceExhausted`]: crate::Error::SequenceExhausted
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id_within(&self, budget: Duration) -> Result<SnowflakeId> {
        let mut state = self.state.get();
        let id = self.core.advance_within(&mut state, budget)?;
        self.state.set(state);
        Ok(id)
    }

    /// Non-blocking probe: [`IdGenStatus::Pending`] instead of waiting when
    /// the current millisecond's sequence is spent.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<IdGenStatus> {
        let mut state = self.state.get();
        let status = self.core.poll(&mut state)?;
        self.state.set(state);
        Ok(status)
    }

    /// The bit layout IDs are packed with.
    pub const fn layout(&self) -> Layout {
        self.core.layout()
    }

    /// The epoch (Unix milliseconds) the timestamp field counts from.
    pub const fn epoch(&self) -> i64 {
        self.core.epoch()
    }

    /// The datacenter identifier packed into every ID.
    pub const fn datacenter_id(&self) -> i64 {
        self.core.datacenter_id()
    }

    /// The worker identifier packed into every ID.
    pub const fn worker_id(&self) -> i64 {
        self.core.worker_id()
    }
}

impl<T> SnowflakeGenerator<T> for BasicSnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn next_id(&self) -> Result<SnowflakeId> {
        self.next_id()
    }

    fn next_id_within(&self, budget: Duration) -> Result<SnowflakeId> {
        self.next_id_within(budget)
    }

    fn poll_id(&self) -> Result<IdGenStatus> {
        self.poll_id()
    }
}
