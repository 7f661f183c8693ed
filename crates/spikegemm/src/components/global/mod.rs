//! Threadblock-level assembly: predicated global memory access, the
//! double-buffered mainloop and the masked output writer.

pub mod memory;
pub mod pipelined;

mod barrier;
mod write;

pub use barrier::*;
pub use write::*;
