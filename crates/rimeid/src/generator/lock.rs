use super::core::{GenCore, GenState};
use super::mutex::Mutex;
use crate::{IdGenStatus, Layout, Result, SnowflakeGenerator, SnowflakeId, TimeSource};
use core::time::Duration;
#[cfg(feature = "cache-padded")]
use crossbeam_utils::CachePadded;
use std::sync::Arc;
#[cfg(feature = "tracing")]
use tracing::instrument;

#[cfg(feature = "cache-padded")]
type State = CachePadded<Mutex<GenState>>;
#[cfg(not(feature = "cache-padded"))]
type State = Mutex<GenState>;

fn new_state(state: GenState) -> State {
    #[cfg(feature = "cache-padded")]
    {
        CachePadded::new(Mutex::new(state))
    }
    #[cfg(not(feature = "cache-padded"))]
    {
        Mutex::new(state)
    }
}

/// A thread-safe Snowflake ID generator.
///
/// The whole generation step, including the busy-wait when a millisecond's
/// sequence is spent, runs under a single mutex acquisition, so concurrent
/// callers are fully serialized and can never observe the same
/// `(timestamp, sequence)` pair. This is the flavor to share across
/// threads.
///
/// Cloning is cheap and shares the underlying counter: clones issue from
/// the same sequence and never collide with each other.
///
/// By default the mutex is `std::sync::Mutex` and a poisoned lock surfaces
/// as `Error::LockPoisoned`; with the `parking-lot` feature it is
/// `parking_lot`'s mutex, which cannot poison. The `cache-padded` feature
/// pads the state to its own cache line to dodge false sharing under heavy
/// contention.
///
/// # Example
///
/// ```
/// use rimeid::{DEFAULT_EPOCH, Layout, LockSnowflakeGenerator, SystemClock};
///
/// let generator =
///     LockSnowflakeGenerator::new(Layout::default(), DEFAULT_EPOCH, 1, 2, SystemClock)?;
///
/// std::thread::scope(|s| {
///     for _ in 0..4 {
///         let generator = generator.clone();
///         s.spawn(move || {
///             for _ in 0..100 {
///                 generator.next_id().unwrap();
///             }
///         });
///     }
/// });
/// # Ok::<(), rimeid::Error>(())
/// ```
///
/// ## See also
/// - [`BasicSnowflakeGenerator`] when a single thread owns the instance
///
/// [`BasicSnowflakeGenerator`]: crate::BasicSnowflakeGenerator
#[derive(Clone, Debug)]
pub struct LockSnowflakeGenerator<T> {
    core: GenCore<T>,
    state: Arc<State>,
}

impl<T> LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for one `(datacenter, worker)` identity.
    ///
    /// `epoch` is the instant (Unix milliseconds) the timestamp field
    /// counts from; it must not lie in the future. `datacenter_id` and
    /// `worker_id` are checked against `layout` and rejected with
    /// [`InvalidIdentifier`] when out of range.
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
            state: Arc::new(new_state(GenState::initial())),
        })
    }

    /// Returns the next ID.
    ///
    /// The sequence counts upward from 0 within each millisecond; when it
    /// has visited every value the call busy-waits until the clock rolls
    /// over (still holding the lock, so waiters queue behind it), then
    /// resumes at 0. A clock reading earlier than the last issued
    /// millisecond aborts with [`ClockRegression`] and leaves state
    /// unchanged.
    ///
    /// [`ClockRegression`]: crate::Error::ClockRegression
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
        self.core.advance(&mut state)
    }

    /// Returns the next ID, giving up with [`SequenceExhausted`] if the
    /// clock fails to advance within `budget` while the sequence is spent.
    ///
    /// The budget covers the wait for clock rollover, not the wait for the
    /// lock itself.
    ///
    /// [`SequenceExhausted`]: crate::Error::SequenceExhausted
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id_within(&self, budget: Duration) -> Result<SnowflakeId> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
        self.core.advance_within(&mut state, budget)
    }

    /// Non-blocking probe: [`IdGenStatus::Pending`] instead of waiting when
    /// the current millisecond's sequence is spent. The lock is held only
    /// for the probe itself.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<IdGenStatus> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
        self.core.poll(&mut state)
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

impl<T> SnowflakeGenerator<T> for LockSnowflakeGenerator<T>
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
