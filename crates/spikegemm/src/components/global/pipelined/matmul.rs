use std::marker::PhantomData;

use crate::components::global::Barrier;
use crate::components::global::memory::{GlobalView, PermuteLayout, PredicatedTileIterator};
use crate::components::global::pipelined::PipelinedGlobalConfig;
use crate::components::stage::plane::{PlaneAccumulators, PlaneSpikeMatmul};
use crate::components::stage::{DoubleBuffer, LhsStageReader, RhsStageReader, StageMemory};
use crate::components::{AccumulatorLayout, Layout, Numeric, SpikeSide};

/// Per-warp accumulators for one threadblock.
#[derive(Clone, Debug)]
pub struct CubeAccumulators<E: Numeric> {
    planes: Vec<PlaneAccumulators<E>>,
}

impl<E: Numeric> CubeAccumulators<E> {
    /// Zeroed accumulators for every warp of the threadblock.
    pub fn new(config: PipelinedGlobalConfig) -> Self {
        Self {
            planes: (0..config.plane_partition().num_planes())
                .map(|_| PlaneAccumulators::new(config.stage_config()))
                .collect(),
        }
    }

    pub fn plane(&self, index: u32) -> &PlaneAccumulators<E> {
        &self.planes[index as usize]
    }

    pub fn plane_mut(&mut self, index: u32) -> &mut PlaneAccumulators<E> {
        &mut self.planes[index as usize]
    }

    /// Load initial accumulator values from `c`, masked at the matrix edge;
    /// cells stay zero when no accumulator operand is given.
    pub fn init_from<L: AccumulatorLayout>(
        &mut self,
        c: Option<&GlobalView<'_, E, L>>,
        cube_origin: (u32, u32),
        config: PipelinedGlobalConfig,
    ) {
        let Some(view) = c else {
            return;
        };

        let stage_config = config.stage_config();
        let tile = stage_config.tile_size();

        for plane_row in 0..config.plane_partition().m {
            for plane_col in 0..config.plane_partition().n {
                let plane = self.plane_mut(config.plane_index((plane_row, plane_col)));

                for lane_row in 0..stage_config.lane_partition().rows {
                    for lane_col in 0..stage_config.lane_partition().cols {
                        let row0 = cube_origin.0
                            + plane_row * stage_config.plane_m()
                            + lane_row * tile.m;
                        let col0 = cube_origin.1
                            + plane_col * stage_config.plane_n()
                            + lane_col * tile.n;

                        let lane = stage_config.lane_index((lane_row, lane_col));
                        let fragment = plane.lane_mut(lane);
                        for m in 0..tile.m {
                            for n in 0..tile.n {
                                let offset = L::offset((tile.m, tile.n), (m, n)) as usize;
                                fragment[offset] = view.read_masked((row0 + m, col0 + n));
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Threadblock-scoped mainloop, software pipelined over the reduction
/// dimension with two staging slots per operand.
///
/// The prologue primes the first slot. Each steady-state step issues the
/// next tile's load into the idle slot, synchronizes, computes against the
/// staged tile and swaps the slots. The epilogue computes the last staged
/// tile with no further load. Progress is driven purely by the countdown of
/// remaining k tiles; load latency hides behind the previous tile's compute.
pub struct PipelinedSpikeMatmul<S: SpikeSide, E: Numeric, LA: Layout, LB: Layout, LC: Layout> {
    _phantom: PhantomData<(S, E, LA, LB, LC)>,
}

impl<S, E, LA, LB, LC> PipelinedSpikeMatmul<S, E, LA, LB, LC>
where
    S: SpikeSide,
    E: Numeric,
    LA: Layout,
    LB: Layout,
    LC: Layout,
{
    pub fn execute<PA: PermuteLayout, PB: PermuteLayout>(
        lhs_iter: &mut PredicatedTileIterator<'_, S::Lhs<E>, LA, PA>,
        rhs_iter: &mut PredicatedTileIterator<'_, S::Rhs<E>, LB, PB>,
        accumulators: &mut CubeAccumulators<E>,
        barrier: &mut Barrier,
        k: u32,
        config: PipelinedGlobalConfig,
    ) {
        let mut remaining = config.k_tiles(k);
        if remaining == 0 {
            return;
        }

        let mut lhs_stages = DoubleBuffer::new(config.cube_m(), config.stage_k());
        let mut rhs_stages = DoubleBuffer::new(config.stage_k(), config.cube_n());

        // Prologue: prime the first slot.
        lhs_iter.load_into(lhs_stages.back_mut());
        rhs_iter.load_into(rhs_stages.back_mut());
        lhs_iter.advance_view(config.stage_k());
        rhs_iter.advance_view(config.stage_k());
        lhs_stages.swap();
        rhs_stages.swap();
        barrier.sync();

        // Steady state.
        while remaining > 1 {
            lhs_iter.load_into(lhs_stages.back_mut());
            rhs_iter.load_into(rhs_stages.back_mut());
            lhs_iter.advance_view(config.stage_k());
            rhs_iter.advance_view(config.stage_k());

            barrier.sync();

            Self::compute_stage(lhs_stages.front(), rhs_stages.front(), accumulators, config);

            lhs_stages.swap();
            rhs_stages.swap();
            remaining -= 1;
        }

        // Epilogue: last staged tile, nothing left to load.
        Self::compute_stage(lhs_stages.front(), rhs_stages.front(), accumulators, config);
    }

    fn compute_stage(
        lhs_stage: &StageMemory<S::Lhs<E>>,
        rhs_stage: &StageMemory<S::Rhs<E>>,
        accumulators: &mut CubeAccumulators<E>,
        config: PipelinedGlobalConfig,
    ) {
        let stage_config = config.stage_config();

        for plane_row in 0..config.plane_partition().m {
            for plane_col in 0..config.plane_partition().n {
                let lhs = LhsStageReader::<_, LA::Unit>::new(
                    lhs_stage,
                    plane_row * stage_config.plane_m(),
                );
                let rhs = RhsStageReader::<_, LB::Unit>::new(
                    rhs_stage,
                    plane_col * stage_config.plane_n(),
                );

                let plane = accumulators.plane_mut(config.plane_index((plane_row, plane_col)));
                PlaneSpikeMatmul::<S, E, LA, LB, LC>::execute(&lhs, &rhs, plane, stage_config);
            }
        }
    }
}

