use std::marker::PhantomData;

use crate::components::stage::plane::PlaneStageConfig;
use crate::components::stage::{LhsStageReader, RhsStageReader};
use crate::components::tile::spike::SpikeTileMatmulFamily;
use crate::components::tile::{Fragment, TileMatmul, TileMatmulFamily};
use crate::components::{ElemKind, Layout, Numeric, SpikeSide, TileElement};

/// The register routine one lane runs, selected through the tile family and
/// addressed with the per-lane layouts.
type ThreadMma<S, E, LA, LB, LC> = <SpikeTileMatmulFamily<S> as TileMatmulFamily>::Matmul<
    E,
    <LA as Layout>::Unit,
    <LB as Layout>::Unit,
    LC,
>;

/// Computes the matrix product of one warp's tile with lane-parallel scalar
/// math.
///
/// The warp tile is split across the lane partition; every lane owns one
/// register tile and consumes the staged k slice in `lane_k`-deep groups.
/// Lanes touch disjoint accumulator cells, so the lockstep execution of the
/// hardware is reproduced here by running them in sequence.
pub struct PlaneSpikeMatmul<S: SpikeSide, E: Numeric, LA: Layout, LB: Layout, LC: Layout> {
    _phantom: PhantomData<(S, E, LA, LB, LC)>,
}

impl<S, E, LA, LB, LC> PlaneSpikeMatmul<S, E, LA, LB, LC>
where
    S: SpikeSide,
    E: Numeric,
    LA: Layout,
    LB: Layout,
    LC: Layout,
{
    /// Whether the four-wide packed integer pairing applies to these
    /// element and layout choices.
    ///
    /// Routing information for the assembly layer: when it holds, the dense
    /// integer path owns the instruction selection and this specialization
    /// is not used. It can never hold while one operand is binary, and it is
    /// never consulted at runtime.
    pub const PACKED_I8: bool = LA::INTERLEAVE == 4
        && matches!(<S::Lhs<E> as TileElement>::KIND, ElemKind::I8)
        && matches!(<S::Rhs<E> as TileElement>::KIND, ElemKind::I8);

    /// Performs a warp-level matrix multiply-accumulate operation for one
    /// lane: `d = a (*) b + c` over the lane's register tile.
    ///
    /// `group_idx` identifies the k group when the reduction is split across
    /// warps; this specialization keeps the whole reduction in one warp and
    /// ignores it.
    pub fn accumulate(
        d: &mut Fragment<E>,
        a: &Fragment<S::Lhs<E>>,
        b: &Fragment<S::Rhs<E>>,
        c: &Fragment<E>,
        _group_idx: u32,
        config: PlaneStageConfig,
    ) {
        ThreadMma::<S, E, LA, LB, LC>::accumulate(d, a, b, c, config.tile_config());
    }

    /// Copies operand fragments into the form the register routine expects.
    ///
    /// The configured complex transforms reduce to a plain copy here: real
    /// and binary elements are self-conjugate.
    pub fn transform(
        dst_a: &mut Fragment<S::Lhs<E>>,
        dst_b: &mut Fragment<S::Rhs<E>>,
        a: &Fragment<S::Lhs<E>>,
        b: &Fragment<S::Rhs<E>>,
        _config: PlaneStageConfig,
    ) {
        dst_a.copy_from(a);
        dst_b.copy_from(b);
    }

    /// Runs every lane of the warp over one staged k slice, accumulating
    /// into the per-lane accumulators.
    pub fn execute(
        lhs: &LhsStageReader<'_, S::Lhs<E>, LA::Unit>,
        rhs: &RhsStageReader<'_, S::Rhs<E>, LB::Unit>,
        accumulators: &mut PlaneAccumulators<E>,
        config: PlaneStageConfig,
    ) {
        let tile = config.tile_size();
        let tile_config = config.tile_config();

        let mut loaded_a = ThreadMma::<S, E, LA, LB, LC>::allocate_lhs(tile_config);
        let mut loaded_b = ThreadMma::<S, E, LA, LB, LC>::allocate_rhs(tile_config);
        let mut a = ThreadMma::<S, E, LA, LB, LC>::allocate_lhs(tile_config);
        let mut b = ThreadMma::<S, E, LA, LB, LC>::allocate_rhs(tile_config);
        let mut scratch = ThreadMma::<S, E, LA, LB, LC>::allocate_acc(tile_config);

        for lane_row in 0..config.lane_partition().rows {
            for lane_col in 0..config.lane_partition().cols {
                let lane = (lane_row, lane_col);
                let acc = accumulators.lane_mut(config.lane_index(lane));

                for group in 0..config.k_groups() {
                    lhs.fill(lane, group, tile, &mut loaded_a);
                    rhs.fill(lane, group, tile, &mut loaded_b);
                    Self::transform(&mut a, &mut b, &loaded_a, &loaded_b, config);

                    // The previous accumulator value is this call's c input.
                    std::mem::swap(acc, &mut scratch);
                    Self::accumulate(acc, &a, &b, &scratch, group, config);
                }
            }
        }
    }
}

/// Per-lane accumulator fragments for one warp.
///
/// Live across every k group and every pipeline stage; this is the warp's
/// running result until the epilogue writes it out.
#[derive(Clone, Debug)]
pub struct PlaneAccumulators<E: Numeric> {
    lanes: Vec<Fragment<E>>,
}

impl<E: Numeric> PlaneAccumulators<E> {
    /// Zeroed accumulators for every lane of the warp.
    pub fn new(config: PlaneStageConfig) -> Self {
        let size = config.tile_size().mn();
        Self {
            lanes: (0..config.num_lanes()).map(|_| Fragment::new(size)).collect(),
        }
    }

    pub fn lane(&self, index: u32) -> &Fragment<E> {
        &self.lanes[index as usize]
    }

    pub fn lane_mut(&mut self, index: u32) -> &mut Fragment<E> {
        &mut self.lanes[index as usize]
    }
}
