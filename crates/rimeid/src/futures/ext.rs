use core::future::Future;
use core::time::Duration;

use super::SleepProvider;
use crate::{IdGenStatus, Result, SnowflakeGenerator, SnowflakeId, TimeSource};

/// Extension trait for generating Snowflake IDs in a `Future`-based context.
///
/// Implemented for every [`SnowflakeGenerator`] that is `Sync`, so a shared
/// reference can be polled from async tasks. Where the sync API would spin
/// out an exhausted millisecond, the future instead hands the wait to a
/// [`SleepProvider`] and retries once the runtime wakes it.
pub trait SnowflakeGeneratorAsyncExt<T>
where
    T: TimeSource,
{
    /// Returns a future that resolves to the next available ID.
    ///
    /// While the generator reports [`IdGenStatus::Pending`], the future
    /// sleeps for the indicated duration via `S` and polls again.
    ///
    /// # Errors
    ///
    /// Fails if the underlying generator does, e.g. with
    /// [`Error::ClockRegression`].
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    fn try_next_id_async<S>(&self) -> impl Future<Output = Result<SnowflakeId>> + Send
    where
        S: SleepProvider;
}

impl<G, T> SnowflakeGeneratorAsyncExt<T> for G
where
    G: SnowflakeGenerator<T> + Sync,
    T: TimeSource + Send,
{
    fn try_next_id_async<S>(&self) -> impl Future<Output = Result<SnowflakeId>> + Send
    where
        S: SleepProvider,
    {
        async {
            loop {
                let dur = match self.poll_id()? {
                    IdGenStatus::Ready { id } => return Ok(id),
                    IdGenStatus::Pending { yield_for } => {
                        Duration::from_millis(yield_for.max(0) as u64)
                    }
                };
                S::sleep_for(dur).await;
            }
        }
    }
}
