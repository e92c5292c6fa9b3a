mod error;
mod futures;
mod generator;
mod id;
mod layout;
mod mono_clock;
mod time;

pub use crate::error::*;
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::layout::*;
pub use crate::mono_clock::*;
pub use crate::time::*;
