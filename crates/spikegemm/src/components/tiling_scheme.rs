use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::components::{FormattedConfigError, MatmulSetupError};

/// Extents of one lane's register tile along m, n and k.
#[derive(new, Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSize {
    pub m: u32,
    pub n: u32,
    pub k: u32,
}

impl TileSize {
    /// Number of elements in the first-operand fragment.
    pub fn mk(&self) -> u32 {
        self.m * self.k
    }

    /// Number of elements in the second-operand fragment.
    pub fn kn(&self) -> u32 {
        self.k * self.n
    }

    /// Number of elements in the accumulator fragment.
    pub fn mn(&self) -> u32 {
        self.m * self.n
    }
}

/// Extents of the tile one warp owns along m and n.
#[derive(new, Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaneTileSize {
    pub m: u32,
    pub n: u32,
}

/// How a warp's lanes split its tile: a `rows x cols` grid of lanes.
#[derive(new, Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanePartition {
    pub rows: u32,
    pub cols: u32,
}

impl LanePartition {
    pub fn num_lanes(&self) -> u32 {
        self.rows * self.cols
    }
}

/// How warps split the threadblock tile along m and n.
#[derive(new, Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanePartition {
    pub m: u32,
    pub n: u32,
}

impl PlanePartition {
    pub fn num_planes(&self) -> u32 {
        self.m * self.n
    }
}

/// The compile-time tiling hierarchy.
///
/// The threadblock tile is the warp tile times the warp partition; the warp
/// tile divides across the lane partition into per-lane register tiles. The
/// reduction dimension advances `stage_k` elements per pipeline stage and is
/// consumed `lane_k` elements at a time by each lane.
#[derive(new, Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilingScheme {
    pub plane_tile: PlaneTileSize,
    pub lane_partition: LanePartition,
    /// Depth of one per-lane accumulate call along k.
    pub lane_k: u32,
    pub plane_partition: PlanePartition,
    /// Elements of k staged per pipeline stage.
    pub stage_k: u32,
}

impl TilingScheme {
    /// Threadblock tile extent along m.
    pub fn cube_m(&self) -> u32 {
        self.plane_tile.m * self.plane_partition.m
    }

    /// Threadblock tile extent along n.
    pub fn cube_n(&self) -> u32 {
        self.plane_tile.n * self.plane_partition.n
    }

    /// Per-lane tile extents, derived from the warp tile and lane partition.
    ///
    /// The partition must evenly divide the warp tile; any remainder means a
    /// lane without a rectangular tile, which is refused.
    pub fn lane_tile(&self) -> Result<TileSize, MatmulSetupError> {
        let LanePartition { rows, cols } = self.lane_partition;
        let PlaneTileSize { m, n } = self.plane_tile;

        if rows == 0 || cols == 0 {
            return Err(FormattedConfigError::new(move || {
                format!("Error: lane partition {rows}x{cols} has a zero extent.")
            })
            .into());
        }

        if m % rows != 0 || n % cols != 0 {
            return Err(FormattedConfigError::new(move || {
                format!(
                    "Error: lane partition {rows}x{cols} does not evenly divide warp tile {m}x{n}."
                )
            })
            .into());
        }

        Ok(TileSize::new(m / rows, n / cols, self.lane_k))
    }
}
