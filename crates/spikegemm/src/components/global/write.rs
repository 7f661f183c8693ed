use std::marker::PhantomData;

use crate::components::global::pipelined::{CubeAccumulators, PipelinedGlobalConfig};
use crate::components::tile::Tile;
use crate::components::{AccumulatorLayout, Numeric};

/// Writes per-lane accumulators back to the output, masking cells outside
/// the matrix edge.
pub struct GlobalWriter<'a, E: Numeric, L: AccumulatorLayout> {
    data: &'a mut [E],
    rows: u32,
    cols: u32,
    ld: u32,
    _layout: PhantomData<L>,
}

impl<'a, E: Numeric, L: AccumulatorLayout> GlobalWriter<'a, E, L> {
    /// Writer over packed output storage.
    pub fn new(data: &'a mut [E], rows: u32, cols: u32) -> Self {
        let ld = L::packed_ld((rows, cols));
        Self {
            data,
            rows,
            cols,
            ld,
            _layout: PhantomData,
        }
    }

    /// Store one lane's tile with its top-left corner at `origin`.
    pub fn write_tile(&mut self, origin: (u32, u32), extents: (u32, u32), fragment: &[E]) {
        let tile = Tile::<E, L>::new(fragment, extents);

        for m in 0..extents.0 {
            for n in 0..extents.1 {
                let row = origin.0 + m;
                let col = origin.1 + n;
                if row < self.rows && col < self.cols {
                    let offset = L::offset_strided((row, col), self.ld) as usize;
                    self.data[offset] = tile.get((m, n));
                }
            }
        }
    }

    /// Store every lane tile of the threadblock at `cube_origin`.
    pub fn write_accumulators(
        &mut self,
        accumulators: &CubeAccumulators<E>,
        cube_origin: (u32, u32),
        config: PipelinedGlobalConfig,
    ) {
        let stage_config = config.stage_config();
        let tile = stage_config.tile_size();

        for plane_row in 0..config.plane_partition().m {
            for plane_col in 0..config.plane_partition().n {
                let plane = accumulators.plane(config.plane_index((plane_row, plane_col)));

                for lane_row in 0..stage_config.lane_partition().rows {
                    for lane_col in 0..stage_config.lane_partition().cols {
                        let origin = (
                            cube_origin.0
                                + plane_row * stage_config.plane_m()
                                + lane_row * tile.m,
                            cube_origin.1
                                + plane_col * stage_config.plane_n()
                                + lane_col * tile.n,
                        );

                        let lane = stage_config.lane_index((lane_row, lane_col));
                        self.write_tile(origin, (tile.m, tile.n), plane.lane(lane).as_slice());
                    }
                }
            }
        }
    }
}
