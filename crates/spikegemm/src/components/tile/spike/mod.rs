//! Register-level matmul with one binary operand: the multiply is replaced
//! by an add predicated on the firing bit.

mod config;
mod matmul;
mod setup;

pub use config::*;
pub use matmul::*;
pub use setup::*;
