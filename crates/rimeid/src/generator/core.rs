use crate::{Error, IdGenStatus, Layout, Result, SnowflakeId, TimeSource};
use core::cmp::Ordering;
use core::time::Duration;
use std::time::Instant;

/// Mutable generation state: the last millisecond an ID was issued for, and
/// how much of that millisecond's sequence is used.
///
/// `last_timestamp` holds absolute Unix milliseconds. `-1` is the initial
/// sentinel meaning "no ID issued yet"; it compares below any sane clock
/// reading, so the first call always takes the new-millisecond path.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GenState {
    pub(crate) last_timestamp: i64,
    pub(crate) sequence: i64,
}

impl GenState {
    pub(crate) const fn initial() -> Self {
        Self {
            last_timestamp: -1,
            sequence: 0,
        }
    }
}

/// The immutable half of a generator: layout, epoch, assigned identifiers,
/// and the clock.
///
/// Both generator flavors run the same transition logic through this type;
/// they differ only in how they guard a [`GenState`].
#[derive(Clone, Debug)]
pub(crate) struct GenCore<T> {
    layout: Layout,
    epoch: i64,
    datacenter_id: i64,
    worker_id: i64,
    time: T,
}

impl<T> GenCore<T> {
    pub(crate) fn new(
        layout: Layout,
        epoch: i64,
        datacenter_id: i64,
        worker_id: i64,
        time: T,
    ) -> Result<Self> {
        if datacenter_id < 0 || datacenter_id > layout.max_datacenter_id() {
            return Err(Error::InvalidIdentifier {
                field: "datacenter id",
                value: datacenter_id,
                max: layout.max_datacenter_id(),
            });
        }
        if worker_id < 0 || worker_id > layout.max_worker_id() {
            return Err(Error::InvalidIdentifier {
                field: "worker id",
                value: worker_id,
                max: layout.max_worker_id(),
            });
        }
        Ok(Self {
            layout,
            epoch,
            datacenter_id,
            worker_id,
            time,
        })
    }

    pub(crate) const fn layout(&self) -> Layout {
        self.layout
    }

    pub(crate) const fn epoch(&self) -> i64 {
        self.epoch
    }

    pub(crate) const fn datacenter_id(&self) -> i64 {
        self.datacenter_id
    }

    pub(crate) const fn worker_id(&self) -> i64 {
        self.worker_id
    }

    fn compose(&self, timestamp: i64, sequence: i64) -> SnowflakeId {
        self.layout.compose(
            timestamp - self.epoch,
            self.datacenter_id,
            self.worker_id,
            sequence,
        )
    }
}

impl<T> GenCore<T>
where
    T: TimeSource,
{
    /// One non-blocking step: issues an ID, reports the sequence as spent,
    /// or fails on a regressed clock. Never mutates state on `Pending` or
    /// on error.
    pub(crate) fn poll(&self, state: &mut GenState) -> Result<IdGenStatus> {
        let now = self.time.current_millis();
        match now.cmp(&state.last_timestamp) {
            Ordering::Equal => {
                if state.sequence < self.layout().max_sequence() {
                    state.sequence += 1;
                    Ok(IdGenStatus::Ready {
                        id: self.compose(now, state.sequence),
                    })
                } else {
                    Ok(IdGenStatus::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                state.last_timestamp = now;
                state.sequence = 0;
                Ok(IdGenStatus::Ready {
                    id: self.compose(now, 0),
                })
            }
            Ordering::Less => Err(clock_regression(state.last_timestamp, now)),
        }
    }

    /// Blocking step: where [`Self::poll`] would report `Pending`, this
    /// wraps the sequence and spins out the rest of the millisecond.
    pub(crate) fn advance(&self, state: &mut GenState) -> Result<SnowflakeId> {
        self.advance_with(state, |time, last_timestamp| {
            Ok(wait_for_next_millis(time, last_timestamp))
        })
    }

    /// Like [`Self::advance`], but gives up with
    /// [`Error::SequenceExhausted`] if the clock does not move within
    /// `budget`. State is left untouched on failure, so a later call can
    /// still succeed.
    pub(crate) fn advance_within(
        &self,
        state: &mut GenState,
        budget: Duration,
    ) -> Result<SnowflakeId> {
        // A budget too large for an Instant means no deadline at all.
        let deadline = Instant::now().checked_add(budget);
        self.advance_with(state, |time, last_timestamp| {
            let mut now = time.current_millis();
            while now <= last_timestamp {
                if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                    return Err(Error::SequenceExhausted { budget });
                }
                core::hint::spin_loop();
                now = time.current_millis();
            }
            Ok(now)
        })
    }

    /// The transition shared by the blocking entry points. `wait` is called
    /// only when the current millisecond's sequence is spent and must
    /// return a clock reading strictly past `last_timestamp` (or an error,
    /// which propagates without touching state).
    fn advance_with(
        &self,
        state: &mut GenState,
        wait: impl FnOnce(&T, i64) -> Result<i64>,
    ) -> Result<SnowflakeId> {
        let now = self.time.current_millis();
        match now.cmp(&state.last_timestamp) {
            Ordering::Equal => {
                if state.sequence < self.layout().max_sequence() {
                    state.sequence += 1;
                } else {
                    // Sequence wrapped: wait out the rest of the millisecond.
                    let now = wait(&self.time, state.last_timestamp)?;
                    state.last_timestamp = now;
                    state.sequence = 0;
                }
            }
            Ordering::Greater => {
                state.last_timestamp = now;
                state.sequence = 0;
            }
            Ordering::Less => return Err(clock_regression(state.last_timestamp, now)),
        }
        Ok(self.compose(state.last_timestamp, state.sequence))
    }
}

/// Spins until `time` reads past `last_timestamp`, returning the first
/// later value.
///
/// A spin, not a sleep: the expected wait is sub-millisecond, below what
/// sleeping can resolve without surrendering the rest of the scheduler
/// slice.
pub(crate) fn wait_for_next_millis<T>(time: &T, last_timestamp: i64) -> i64
where
    T: TimeSource,
{
    let mut now = time.current_millis();
    while now <= last_timestamp {
        core::hint::spin_loop();
        now = time.current_millis();
    }
    now
}

#[cold]
#[inline(never)]
fn clock_regression(last_timestamp: i64, now: i64) -> Error {
    Error::ClockRegression { last_timestamp, now }
}
