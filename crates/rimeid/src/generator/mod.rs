mod basic;
mod core;
mod interface;
mod lock;
mod mutex;
mod status;


pub use crate::generator::{basic::*, interface::*, lock::*, status::*};
