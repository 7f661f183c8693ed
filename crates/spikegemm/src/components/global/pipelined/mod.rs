//! Double-buffered threadblock mainloop over the reduction dimension.

mod config;
mod matmul;
mod setup;

pub use config::*;
pub use matmul::*;
pub use setup::*;
