#[cfg(feature = "async-smol")]
mod smol;
#[cfg(feature = "async-tokio")]
mod tokio;

#[cfg(feature = "async-smol")]
pub use crate::futures::runtime::smol::*;
#[cfg(feature = "async-tokio")]
pub use crate::futures::runtime::tokio::*;
