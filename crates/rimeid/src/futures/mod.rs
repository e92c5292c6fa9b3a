mod ext;
#[cfg(any(feature = "async-tokio", feature = "async-smol"))]
mod runtime;
mod sleep_provider;

pub use crate::futures::{ext::*, sleep_provider::*};
#[cfg(any(feature = "async-tokio", feature = "async-smol"))]
pub use crate::futures::runtime::*;
