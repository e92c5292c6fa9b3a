use core::future::Future;
use core::time::Duration;

/// Abstracts how an async caller waits out a [`Pending`] millisecond,
/// keeping the generators generic over runtimes like `Tokio` or `Smol`.
///
/// The returned future must be `Send` so waits can ride on multi-threaded
/// executors.
///
/// [`Pending`]: crate::IdGenStatus::Pending
pub trait SleepProvider {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
