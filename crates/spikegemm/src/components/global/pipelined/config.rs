use derive_new::new;

use crate::components::global::memory::GlobalMemoryConfig;
use crate::components::stage::plane::PlaneStageConfig;
use crate::components::{PlanePartition, TileSize};

/// Configuration of the double-buffered mainloop for one threadblock.
#[derive(new, Copy, Clone, Debug)]
pub struct PipelinedGlobalConfig {
    stage_config: PlaneStageConfig,
    plane_partition: PlanePartition,
    num_stages: u32,
    check_m_bounds: bool,
    check_n_bounds: bool,
    check_k_bounds: bool,
}

impl PipelinedGlobalConfig {
    pub fn stage_config(&self) -> PlaneStageConfig {
        self.stage_config
    }

    pub fn plane_partition(&self) -> PlanePartition {
        self.plane_partition
    }

    /// Flat index of the warp at `(row, col)` in the partition.
    pub fn plane_index(&self, plane: (u32, u32)) -> u32 {
        plane.0 * self.plane_partition.n + plane.1
    }

    pub fn num_stages(&self) -> u32 {
        self.num_stages
    }

    pub fn tile_size(&self) -> TileSize {
        self.stage_config.tile_size()
    }

    /// Threadblock tile extent along m.
    pub fn cube_m(&self) -> u32 {
        self.stage_config.plane_m() * self.plane_partition.m
    }

    /// Threadblock tile extent along n.
    pub fn cube_n(&self) -> u32 {
        self.stage_config.plane_n() * self.plane_partition.n
    }

    /// Elements of k staged per pipeline stage.
    pub fn stage_k(&self) -> u32 {
        self.stage_config.stage_k()
    }

    /// Number of staged tiles needed to cover a reduction of depth `k`.
    pub fn k_tiles(&self, k: u32) -> u32 {
        k.div_ceil(self.stage_k())
    }

    pub fn check_m_bounds(&self) -> bool {
        self.check_m_bounds
    }

    pub fn check_n_bounds(&self) -> bool {
        self.check_n_bounds
    }

    pub fn check_k_bounds(&self) -> bool {
        self.check_k_bounds
    }

    /// Bounds description of the first operand's staged tile.
    pub fn lhs_memory_config(&self) -> GlobalMemoryConfig {
        GlobalMemoryConfig::new(
            self.cube_m(),
            self.stage_k(),
            self.check_m_bounds,
            self.check_k_bounds,
        )
    }

    /// Bounds description of the second operand's staged tile.
    pub fn rhs_memory_config(&self) -> GlobalMemoryConfig {
        GlobalMemoryConfig::new(
            self.stage_k(),
            self.cube_n(),
            self.check_k_bounds,
            self.check_n_bounds,
        )
    }
}
