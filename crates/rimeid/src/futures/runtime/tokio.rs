use core::future::Future;

use crate::futures::SleepProvider;
use crate::{Result, SnowflakeGenerator, SnowflakeId, TimeSource};

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for async applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    async fn sleep_for(dur: core::time::Duration) {
        tokio::time::sleep(dur).await;
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// This strategy skips the timer and yields straight back to the scheduler,
/// which can improve latency when few tasks are waiting. The cost is a
/// tighter polling loop: under heavy contention a timer-based sleep
/// ([`TokioSleep`]) wastes less CPU on rescheduling.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    async fn sleep_for(_dur: core::time::Duration) {
        tokio::task::yield_now().await;
    }
}

/// Extension trait for generating Snowflake IDs on the
/// [`tokio`](https://docs.rs/tokio) runtime.
///
/// A convenience over [`SnowflakeGeneratorAsyncExt`] that fixes the sleep
/// strategy to [`TokioSleep`], so callers never name a provider.
///
/// [`SnowflakeGeneratorAsyncExt`]: crate::futures::SnowflakeGeneratorAsyncExt
pub trait SnowflakeGeneratorAsyncTokioExt<T>
where
    T: TimeSource,
{
    /// Returns a future that resolves to the next available ID, sleeping on
    /// Tokio's timer while the generator is pending.
    ///
    /// # Errors
    ///
    /// Fails if the underlying generator does.
    fn try_next_id_async(&self) -> impl Future<Output = Result<SnowflakeId>> + Send;
}

impl<G, T> SnowflakeGeneratorAsyncTokioExt<T> for G
where
    G: SnowflakeGenerator<T> + Sync,
    T: TimeSource + Send,
{
    fn try_next_id_async(&self) -> impl Future<Output = Result<SnowflakeId>> + Send {
        <Self as crate::futures::SnowflakeGeneratorAsyncExt<T>>::try_next_id_async::<TokioSleep>(
            self,
        )
    }
}
