//! Warp-level matmul: one warp's tile partitioned across its lanes.

mod config;
mod matmul;
mod setup;

pub use config::*;
pub use matmul::*;
pub use setup::*;
