use core::future::Future;

use smol::Timer;

use crate::futures::SleepProvider;
use crate::{Result, SnowflakeGenerator, SnowflakeId, TimeSource};

/// An implementation of [`SleepProvider`] using Smol's timer.
///
/// This is the default provider for async applications built on Smol.
pub struct SmolSleep;
impl SleepProvider for SmolSleep {
    async fn sleep_for(dur: core::time::Duration) {
        Timer::after(dur).await;
    }
}

/// An implementation of [`SleepProvider`] using Smol's yield.
///
/// This strategy skips the timer and yields straight back to the scheduler,
/// which can improve latency when few tasks are waiting. The cost is a
/// tighter polling loop: under heavy contention a timer-based sleep
/// ([`SmolSleep`]) wastes less CPU on rescheduling.
pub struct SmolYield;
impl SleepProvider for SmolYield {
    async fn sleep_for(_dur: core::time::Duration) {
        smol::future::yield_now().await;
    }
}

/// Extension trait for generating Snowflake IDs on the
/// [`smol`](https://docs.rs/smol) runtime.
///
/// A convenience over [`SnowflakeGeneratorAsyncExt`] that fixes the sleep
/// strategy to [`SmolSleep`], so callers never name a provider.
///
/// [`SnowflakeGeneratorAsyncExt`]: crate::futures::SnowflakeGeneratorAsyncExt
pub trait SnowflakeGeneratorAsyncSmolExt<T>
where
    T: TimeSource,
{
    /// Returns a future that resolves to the next available ID, sleeping on
    /// Smol's timer while the generator is pending.
    ///
    /// # Errors
    ///
    /// Fails if the underlying generator does.
    fn try_next_id_async(&self) -> impl Future<Output = Result<SnowflakeId>> + Send;
}

impl<G, T> SnowflakeGeneratorAsyncSmolExt<T> for G
where
    G: SnowflakeGenerator<T> + Sync,
    T: TimeSource + Send,
{
    fn try_next_id_async(&self) -> impl Future<Output = Result<SnowflakeId>> + Send {
        <Self as crate::futures::SnowflakeGeneratorAsyncExt<T>>::try_next_id_async::<SmolSleep>(
            self,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use futures::future::try_join_all;
    use smol::Task;

    use super::*;
    use crate::{DEFAULT_EPOCH, Layout, LockSnowflakeGenerator, MonotonicClock};

    const NUM_GENERATORS: i64 = 8;
    // Enough for each generator to hit several Pending cycles.
    const IDS_PER_GENERATOR: usize = 4096 * 8;

    #[test]
    fn generates_many_unique_ids_with_smol_sleep() {
        smol::block_on(async {
            generate_many_explicit::<SmolSleep>().await.unwrap();
        });
    }

    #[test]
    fn generates_many_unique_ids_with_smol_yield() {
        smol::block_on(async {
            generate_many_explicit::<SmolYield>().await.unwrap();
        });
    }

    #[test]
    fn generates_many_unique_ids_with_the_convenience_ext() {
        smol::block_on(async {
            let tasks: Vec<Task<Result<Vec<SnowflakeId>>>> = workers()
                .unwrap()
                .into_iter()
                .map(|g| {
                    smol::spawn(async move {
                        let mut ids = Vec::with_capacity(IDS_PER_GENERATOR);
                        for _ in 0..IDS_PER_GENERATOR {
                            // No explicit SleepProvider here.
                            ids.push(g.try_next_id_async().await?);
                        }
                        Ok(ids)
                    })
                })
                .collect();

            validate_unique_ids(tasks).await.unwrap();
        });
    }

    // One generator per worker id, all sharing a clock.
    fn workers() -> Result<Vec<LockSnowflakeGenerator<MonotonicClock>>> {
        let clock = MonotonicClock::default();
        (0..NUM_GENERATORS)
            .map(|worker_id| {
                LockSnowflakeGenerator::new(
                    Layout::default(),
                    DEFAULT_EPOCH,
                    0,
                    worker_id,
                    clock.clone(),
                )
            })
            .collect()
    }

    async fn generate_many_explicit<S>() -> Result<()>
    where
        S: SleepProvider,
    {
        let tasks: Vec<Task<Result<Vec<SnowflakeId>>>> = workers()?
            .into_iter()
            .map(|g| {
                smol::spawn(async move {
                    let mut ids = Vec::with_capacity(IDS_PER_GENERATOR);
                    for _ in 0..IDS_PER_GENERATOR {
                        let id = crate::futures::SnowflakeGeneratorAsyncExt::try_next_id_async::<S>(
                            &g,
                        )
                        .await?;
                        ids.push(id);
                    }
                    Ok(ids)
                })
            })
            .collect();

        validate_unique_ids(tasks).await
    }

    async fn validate_unique_ids(tasks: Vec<Task<Result<Vec<SnowflakeId>>>>) -> Result<()> {
        let all_ids: Vec<_> = try_join_all(tasks).await?.into_iter().flatten().collect();

        #[allow(clippy::cast_sign_loss)]
        let expected_total = NUM_GENERATORS as usize * IDS_PER_GENERATOR;
        assert_eq!(all_ids.len(), expected_total);

        let mut seen = HashSet::with_capacity(all_ids.len());
        for id in &all_ids {
            assert!(seen.insert(id), "duplicate id: {id}");
        }
        Ok(())
    }
}
