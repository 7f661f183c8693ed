use std::marker::PhantomData;

use crate::components::global::memory::{GlobalMemoryConfig, GlobalView, NoPermute, PermuteLayout};
use crate::components::stage::StageMemory;
use crate::components::{Layout, MatmulIdent, TileElement};

/// Tile iterator over global memory with boundary predication: elements
/// outside the matrix are masked to zero rather than addressed.
///
/// Optional gather indices remap the non-reduction axis (rows of the first
/// operand, columns of the second); an optional permute layout re-addresses
/// coordinates before the load. Advancing walks the view along the
/// reduction dimension, one staged tile at a time.
pub struct PredicatedTileIterator<'a, E: TileElement, L: Layout, P: PermuteLayout = NoPermute> {
    view: GlobalView<'a, E, L>,
    ident: MatmulIdent,
    row_offset: u32,
    col_offset: u32,
    gather: Option<&'a [u32]>,
    config: GlobalMemoryConfig,
    _permute: PhantomData<P>,
}

impl<'a, E: TileElement, L: Layout, P: PermuteLayout> PredicatedTileIterator<'a, E, L, P> {
    pub fn new(
        view: GlobalView<'a, E, L>,
        ident: MatmulIdent,
        origin: (u32, u32),
        gather: Option<&'a [u32]>,
        config: GlobalMemoryConfig,
    ) -> Self {
        Self {
            view,
            ident,
            row_offset: origin.0,
            col_offset: origin.1,
            gather,
            config,
            _permute: PhantomData,
        }
    }

    /// Advance the view along the reduction dimension by `k_offset`.
    pub fn advance_view(&mut self, k_offset: u32) {
        match self.ident {
            MatmulIdent::Lhs => self.col_offset += k_offset,
            MatmulIdent::Rhs => self.row_offset += k_offset,
            MatmulIdent::Out => unreachable!("the output view never advances along k"),
        }
    }

    /// Load one staged tile. In-bounds elements are copied; everything else
    /// stays zero, so partial edge tiles contribute nothing downstream.
    pub fn load_into(&self, stage: &mut StageMemory<E>) {
        let gathered = self.gather.is_some();

        if self.config.checks_bounds() || gathered {
            stage.clear();
            for r in 0..stage.rows() {
                for c in 0..stage.cols() {
                    let coord = self.source_coord((r, c));
                    if self.view.in_bounds(coord) {
                        stage.set(r, c, self.view.read(coord));
                    }
                }
            }
        } else {
            // Full interior tile: every coordinate is in bounds by
            // construction of the check flags.
            for r in 0..stage.rows() {
                for c in 0..stage.cols() {
                    let coord = P::apply(
                        (self.row_offset + r, self.col_offset + c),
                        (self.view.rows(), self.view.cols()),
                    );
                    stage.set(r, c, self.view.read(coord));
                }
            }
        }
    }

    fn source_coord(&self, tile_coord: (u32, u32)) -> (u32, u32) {
        let coord = (
            self.row_offset + tile_coord.0,
            self.col_offset + tile_coord.1,
        );
        let coord = self.gathered(coord);
        P::apply(coord, (self.view.rows(), self.view.cols()))
    }

    /// Remap the non-reduction axis through the gather indices. An index
    /// beyond the gather table masks the whole element.
    fn gathered(&self, coord: (u32, u32)) -> (u32, u32) {
        let Some(indices) = self.gather else {
            return coord;
        };
        match self.ident {
            MatmulIdent::Lhs => (
                indices.get(coord.0 as usize).copied().unwrap_or(u32::MAX),
                coord.1,
            ),
            MatmulIdent::Rhs => (
                coord.0,
                indices.get(coord.1 as usize).copied().unwrap_or(u32::MAX),
            ),
            MatmulIdent::Out => coord,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::RowMajor;

    fn view(data: &[i32]) -> GlobalView<'_, i32, RowMajor> {
        GlobalView::new(data, 2, 4)
    }

    #[test]
    fn partial_edge_tiles_stay_zero_beyond_bounds() {
        let data: Vec<i32> = (1..=8).collect();
        let config = GlobalMemoryConfig::new(3, 3, true, true);
        let iter: PredicatedTileIterator<'_, i32, RowMajor> =
            PredicatedTileIterator::new(view(&data), MatmulIdent::Lhs, (0, 2), None, config);

        let mut stage = StageMemory::new(3, 3);
        iter.load_into(&mut stage);

        assert_eq!(stage.get(0, 0), 3);
        assert_eq!(stage.get(0, 1), 4);
        assert_eq!(stage.get(0, 2), 0);
        assert_eq!(stage.get(1, 0), 7);
        assert_eq!(stage.get(2, 0), 0);
    }

    #[test]
    fn advancing_walks_k_per_operand_axis() {
        let data: Vec<i32> = (1..=8).collect();
        let config = GlobalMemoryConfig::new(2, 2, false, false);

        let mut lhs: PredicatedTileIterator<'_, i32, RowMajor> =
            PredicatedTileIterator::new(view(&data), MatmulIdent::Lhs, (0, 0), None, config);
        let mut stage = StageMemory::new(2, 2);

        lhs.advance_view(2);
        lhs.load_into(&mut stage);
        assert_eq!(stage.get(0, 0), 3);
        assert_eq!(stage.get(1, 1), 8);
    }

    #[test]
    fn gather_remaps_lhs_rows() {
        let data: Vec<i32> = (1..=8).collect();
        let config = GlobalMemoryConfig::new(2, 2, false, false);
        let indices = [1u32, 1];
        let iter: PredicatedTileIterator<'_, i32, RowMajor> = PredicatedTileIterator::new(
            view(&data),
            MatmulIdent::Lhs,
            (0, 0),
            Some(&indices),
            config,
        );

        let mut stage = StageMemory::new(2, 2);
        iter.load_into(&mut stage);

        assert_eq!(stage.get(0, 0), 5);
        assert_eq!(stage.get(1, 0), 5);
        assert_eq!(stage.get(1, 1), 6);
    }

    #[test]
    fn permute_readdresses_coordinates() {
        #[derive(Copy, Clone, Debug, Default)]
        struct SwapHalves;

        impl PermuteLayout for SwapHalves {
            fn apply(coord: (u32, u32), extents: (u32, u32)) -> (u32, u32) {
                let half = extents.1 / 2;
                (coord.0, (coord.1 + half) % extents.1)
            }
        }

        let data: Vec<i32> = (1..=8).collect();
        let config = GlobalMemoryConfig::new(2, 4, false, false);
        let iter: PredicatedTileIterator<'_, i32, RowMajor, SwapHalves> =
            PredicatedTileIterator::new(view(&data), MatmulIdent::Lhs, (0, 0), None, config);

        let mut stage = StageMemory::new(2, 4);
        iter.load_into(&mut stage);

        assert_eq!(stage.get(0, 0), 3);
        assert_eq!(stage.get(0, 2), 1);
        assert_eq!(stage.get(1, 3), 6);
    }
}
