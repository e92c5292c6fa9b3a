//! Mutex selection for the lock-based generator: `std::sync` by default,
//! `parking_lot` under the `parking-lot` feature (no poisoning, so locking
//! is infallible there).

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::Mutex;
#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::Mutex;
