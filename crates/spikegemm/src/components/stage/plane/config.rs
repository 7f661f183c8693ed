use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::components::tile::TileConfig;
use crate::components::tile::spike::SpikeTileConfig;
use crate::components::{ComplexTransform, LanePartition, PlaneTileSize, TileSize};

/// Configuration for the warp (plane) matmul level.
#[derive(new, Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneStageConfig {
    tile_config: SpikeTileConfig,
    lane_partition: LanePartition,
    plane_tile: PlaneTileSize,
    stage_k: u32,
    transform_lhs: ComplexTransform,
    transform_rhs: ComplexTransform,
}

impl PlaneStageConfig {
    pub fn tile_config(&self) -> SpikeTileConfig {
        self.tile_config
    }

    pub fn tile_size(&self) -> TileSize {
        self.tile_config.tile_size()
    }

    pub fn lane_partition(&self) -> LanePartition {
        self.lane_partition
    }

    pub fn num_lanes(&self) -> u32 {
        self.lane_partition.num_lanes()
    }

    /// Flat index of lane `(row, col)` within the warp.
    pub fn lane_index(&self, lane: (u32, u32)) -> u32 {
        lane.0 * self.lane_partition.cols + lane.1
    }

    /// Warp tile extent along m.
    pub fn plane_m(&self) -> u32 {
        self.plane_tile.m
    }

    /// Warp tile extent along n.
    pub fn plane_n(&self) -> u32 {
        self.plane_tile.n
    }

    /// Elements of k staged per pipeline stage.
    pub fn stage_k(&self) -> u32 {
        self.stage_k
    }

    /// Number of per-lane accumulate calls needed to consume one stage.
    pub fn k_groups(&self) -> u32 {
        self.stage_k / self.tile_size().k
    }

    pub fn transform_lhs(&self) -> ComplexTransform {
        self.transform_lhs
    }

    pub fn transform_rhs(&self) -> ComplexTransform {
        self.transform_rhs
    }
}
