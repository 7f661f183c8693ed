use std::marker::PhantomData;

use crate::components::stage::StageMemory;
use crate::components::tile::Fragment;
use crate::components::{Layout, TileElement, TileSize};

/// Streams one lane's first-operand fragments out of the staged tile.
///
/// The staged tile covers the whole threadblock; `plane_row` selects the
/// warp's band of rows, lane `(row, col)` its sub-tile within the band, and
/// `group` which k slice of the stage is consumed. Fragments are written in
/// the layout `L` the lane addresses its registers with.
pub struct LhsStageReader<'a, E: TileElement, L: Layout> {
    stage: &'a StageMemory<E>,
    plane_row: u32,
    _layout: PhantomData<L>,
}

impl<'a, E: TileElement, L: Layout> LhsStageReader<'a, E, L> {
    pub fn new(stage: &'a StageMemory<E>, plane_row: u32) -> Self {
        Self {
            stage,
            plane_row,
            _layout: PhantomData,
        }
    }

    /// Fill `fragment` with the lane's `m x k` tile for k-group `group`.
    pub fn fill(&self, lane: (u32, u32), group: u32, tile: TileSize, fragment: &mut Fragment<E>) {
        let row0 = self.plane_row + lane.0 * tile.m;
        let col0 = group * tile.k;

        for m in 0..tile.m {
            for k in 0..tile.k {
                let offset = L::offset((tile.m, tile.k), (m, k)) as usize;
                fragment[offset] = self.stage.get(row0 + m, col0 + k);
            }
        }
    }
}

/// Streams one lane's second-operand fragments out of the staged tile.
///
/// Mirror of [`LhsStageReader`] over the other axis: `plane_col` selects the
/// warp's band of columns and the k slice advances down the stage rows.
pub struct RhsStageReader<'a, E: TileElement, L: Layout> {
    stage: &'a StageMemory<E>,
    plane_col: u32,
    _layout: PhantomData<L>,
}

impl<'a, E: TileElement, L: Layout> RhsStageReader<'a, E, L> {
    pub fn new(stage: &'a StageMemory<E>, plane_col: u32) -> Self {
        Self {
            stage,
            plane_col,
            _layout: PhantomData,
        }
    }

    /// Fill `fragment` with the lane's `k x n` tile for k-group `group`.
    pub fn fill(&self, lane: (u32, u32), group: u32, tile: TileSize, fragment: &mut Fragment<E>) {
        let row0 = group * tile.k;
        let col0 = self.plane_col + lane.1 * tile.n;

        for k in 0..tile.k {
            for n in 0..tile.n {
                let offset = L::offset((tile.k, tile.n), (k, n)) as usize;
                fragment[offset] = self.stage.get(row0 + k, col0 + n);
            }
        }
    }
}
