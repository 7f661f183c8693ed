//! Matrix multiplication on per-lane register tiles.

pub mod spike;

mod base;
mod fragment;

pub use base::*;
pub use fragment::*;
