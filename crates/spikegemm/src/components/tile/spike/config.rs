use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::components::TileSize;
use crate::components::tile::TileConfig;

/// Configuration of the register-level spike matmul.
#[derive(new, Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpikeTileConfig {
    tile_size: TileSize,
}

impl TileConfig for SpikeTileConfig {
    fn tile_size(&self) -> TileSize {
        self.tile_size
    }
}
