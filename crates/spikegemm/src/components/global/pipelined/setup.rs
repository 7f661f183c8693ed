use std::marker::PhantomData;

use crate::components::global::pipelined::PipelinedGlobalConfig;
use crate::components::stage::plane::{PlaneSpikeMatmul, PlaneSpikeMatmulFamily};
use crate::components::{
    AccumulatorLayout, FormattedConfigError, Layout, MatmulAvailabilityError, MatmulProblem,
    MatmulSelection, MatmulSetupError, MatrixMajor, Numeric, OperatorClass, SharedMemoryClear,
    SpikeSide, TileElement,
};

/// On-chip staging budget for both pipeline slots of both operands.
const STAGING_LIMIT_BYTES: usize = 48 * 1024;

/// Assembles the threadblock-scoped spike mainloop: warp/thread
/// decomposition, staging geometry, bounds predication and the two-slot
/// pipeline driver.
///
/// Only the lane-parallel operator class with a two-stage pipeline and no
/// staging-clear option is specialized; any other selection is refused with
/// an availability error. The accumulator layout must address rows
/// contiguously; other layouts do not satisfy [`AccumulatorLayout`] and
/// refuse to build:
///
/// ```
/// use spikegemm::components::{
///     LanePartition, MatmulProblem, MatmulSelection, PlanePartition, PlaneTileSize, RowMajor,
///     SpikeLhs, TilingScheme,
/// };
/// use spikegemm::components::global::pipelined::PipelinedSpikeMatmulFamily;
///
/// let scheme = TilingScheme::new(
///     PlaneTileSize::new(4, 4),
///     LanePartition::new(2, 2),
///     2,
///     PlanePartition::new(2, 2),
///     4,
/// );
/// let problem = MatmulProblem::new(16, 16, 8);
/// let config = PipelinedSpikeMatmulFamily::<SpikeLhs, f32, RowMajor, RowMajor, RowMajor>::setup(
///     &problem,
///     &MatmulSelection::simt(scheme),
/// )
/// .unwrap();
/// assert_eq!(config.cube_m(), 8);
/// ```
///
/// A column-major accumulator is rejected at build time:
///
/// ```compile_fail
/// use spikegemm::components::{
///     ColMajor, LanePartition, MatmulProblem, MatmulSelection, PlanePartition, PlaneTileSize,
///     RowMajor, SpikeLhs, TilingScheme,
/// };
/// use spikegemm::components::global::pipelined::PipelinedSpikeMatmulFamily;
///
/// let scheme = TilingScheme::new(
///     PlaneTileSize::new(4, 4),
///     LanePartition::new(2, 2),
///     2,
///     PlanePartition::new(2, 2),
///     4,
/// );
/// let problem = MatmulProblem::new(16, 16, 8);
/// let config = PipelinedSpikeMatmulFamily::<SpikeLhs, f32, RowMajor, RowMajor, ColMajor>::setup(
///     &problem,
///     &MatmulSelection::simt(scheme),
/// );
/// ```
pub struct PipelinedSpikeMatmulFamily<S, E, LA, LB, LC>
where
    S: SpikeSide,
    E: Numeric,
    LA: Layout,
    LB: Layout,
    LC: AccumulatorLayout,
{
    _phantom: PhantomData<(S, E, LA, LB, LC)>,
}

impl<S, E, LA, LB, LC> PipelinedSpikeMatmulFamily<S, E, LA, LB, LC>
where
    S: SpikeSide,
    E: Numeric,
    LA: Layout,
    LB: Layout,
    LC: AccumulatorLayout,
{
    pub fn setup(
        problem: &MatmulProblem,
        selection: &MatmulSelection,
    ) -> Result<PipelinedGlobalConfig, MatmulSetupError> {
        match selection.op_class {
            OperatorClass::Simt => {}
            op_class => {
                return Err(MatmulAvailabilityError::OperatorClassUnsupported { op_class }.into());
            }
        }

        if selection.num_stages != 2 {
            return Err(MatmulAvailabilityError::PipelineStagesUnsupported {
                stages: selection.num_stages,
            }
            .into());
        }

        if selection.smem_clear != SharedMemoryClear::None {
            return Err(MatmulAvailabilityError::SharedMemoryClearUnsupported {
                option: selection.smem_clear,
            }
            .into());
        }

        let scheme = selection.tiling_scheme;
        let partition = scheme.plane_partition;
        if partition.m == 0 || partition.n == 0 {
            return Err(FormattedConfigError::new(move || {
                format!(
                    "Error: warp partition {}x{} has a zero extent.",
                    partition.m, partition.n
                )
            })
            .into());
        }

        Self::check_alignment(problem, selection)?;

        let stage_k = scheme.stage_k as usize;
        let staging_bytes = selection.num_stages as usize
            * (scheme.cube_m() as usize * stage_k * <S::Lhs<E> as TileElement>::KIND.size()
                + stage_k * scheme.cube_n() as usize * <S::Rhs<E> as TileElement>::KIND.size());
        if staging_bytes > STAGING_LIMIT_BYTES {
            return Err(FormattedConfigError::new(move || {
                format!(
                    "Error: staging needs {staging_bytes} bytes, the limit is {STAGING_LIMIT_BYTES}."
                )
            })
            .into());
        }

        let stage_config = PlaneSpikeMatmulFamily::<S>::setup(selection)?;

        let cube_m = scheme.cube_m() as usize;
        let cube_n = scheme.cube_n() as usize;
        let config = PipelinedGlobalConfig::new(
            stage_config,
            partition,
            selection.num_stages,
            problem.m % cube_m != 0,
            problem.n % cube_n != 0,
            problem.k % scheme.stage_k as usize != 0,
        );

        log::debug!(
            "spike mainloop assembled: binary operand {:?}, cube tile {}x{}x{}, {} warps of {} lanes, packed i8 pairing {}",
            S::BINARY_OPERAND,
            config.cube_m(),
            config.cube_n(),
            config.stage_k(),
            partition.num_planes(),
            stage_config.num_lanes(),
            PlaneSpikeMatmul::<S, E, LA, LB, LC>::PACKED_I8,
        );

        Ok(config)
    }

    /// Leading dimensions must honor the requested access granularity.
    fn check_alignment(
        problem: &MatmulProblem,
        selection: &MatmulSelection,
    ) -> Result<(), MatmulSetupError> {
        let lhs_leading = match LA::MAJOR {
            MatrixMajor::Row => problem.k,
            MatrixMajor::Col => problem.m,
        };
        let rhs_leading = match LB::MAJOR {
            MatrixMajor::Row => problem.n,
            MatrixMajor::Col => problem.k,
        };

        for (ident, leading, alignment) in [
            ("lhs", lhs_leading, selection.alignment_lhs),
            ("rhs", rhs_leading, selection.alignment_rhs),
        ] {
            if alignment == 0 || leading % alignment as usize != 0 {
                return Err(FormattedConfigError::new(move || {
                    format!(
                        "Error: {ident} leading dimension {leading} is not aligned to {alignment} elements."
                    )
                })
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{
        LanePartition, PlanePartition, PlaneTileSize, RowMajor, SpikeLhs, TilingScheme,
    };

    type Family = PipelinedSpikeMatmulFamily<SpikeLhs, f32, RowMajor, RowMajor, RowMajor>;

    fn scheme() -> TilingScheme {
        TilingScheme::new(
            PlaneTileSize::new(4, 4),
            LanePartition::new(2, 2),
            2,
            PlanePartition::new(2, 2),
            4,
        )
    }

    #[test]
    fn only_the_two_stage_simt_tuple_is_specialized() {
        let problem = MatmulProblem::new(16, 16, 8);

        let mut selection = MatmulSelection::simt(scheme());
        selection.num_stages = 3;
        assert!(matches!(
            Family::setup(&problem, &selection),
            Err(MatmulSetupError::Unavailable(
                MatmulAvailabilityError::PipelineStagesUnsupported { stages: 3 }
            ))
        ));

        let mut selection = MatmulSelection::simt(scheme());
        selection.op_class = OperatorClass::TensorOp;
        assert!(matches!(
            Family::setup(&problem, &selection),
            Err(MatmulSetupError::Unavailable(
                MatmulAvailabilityError::OperatorClassUnsupported { .. }
            ))
        ));

        let mut selection = MatmulSelection::simt(scheme());
        selection.smem_clear = SharedMemoryClear::ZFill;
        assert!(matches!(
            Family::setup(&problem, &selection),
            Err(MatmulSetupError::Unavailable(
                MatmulAvailabilityError::SharedMemoryClearUnsupported { .. }
            ))
        ));
    }

    #[test]
    fn bounds_checks_follow_the_problem_shape() {
        let selection = MatmulSelection::simt(scheme());

        let config = Family::setup(&MatmulProblem::new(16, 16, 8), &selection).unwrap();
        assert!(!config.check_m_bounds());
        assert!(!config.check_n_bounds());
        assert!(!config.check_k_bounds());

        let config = Family::setup(&MatmulProblem::new(17, 16, 9), &selection).unwrap();
        assert!(config.check_m_bounds());
        assert!(!config.check_n_bounds());
        assert!(config.check_k_bounds());
    }

    #[test]
    fn oversized_staging_is_refused() {
        let selection = MatmulSelection::simt(TilingScheme::new(
            PlaneTileSize::new(128, 128),
            LanePartition::new(8, 4),
            4,
            PlanePartition::new(4, 4),
            64,
        ));
        assert!(matches!(
            Family::setup(&MatmulProblem::new(1024, 1024, 1024), &selection),
            Err(MatmulSetupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn misaligned_leading_dimension_is_refused() {
        let mut selection = MatmulSelection::simt(scheme());
        selection.alignment_lhs = 4;
        // Row-major lhs: leading dimension is k = 6.
        assert!(matches!(
            Family::setup(&MatmulProblem::new(16, 16, 6), &selection),
            Err(MatmulSetupError::InvalidConfig(_))
        ));
    }
}
