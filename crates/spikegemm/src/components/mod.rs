pub mod global;
pub mod stage;
pub mod tile;

mod error;
mod ident;
mod layout;
mod numeric;
mod problem;
mod selection;
mod spike;
mod tiling_scheme;

pub use error::*;
pub use ident::*;
pub use layout::*;
pub use numeric::*;
pub use problem::*;
pub use selection::*;
pub use spike::*;
pub use tiling_scheme::*;
