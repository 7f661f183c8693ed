use std::marker::PhantomData;

use crate::components::stage::plane::PlaneStageConfig;
use crate::components::tile::TileMatmulFamily;
use crate::components::tile::spike::SpikeTileMatmulFamily;
use crate::components::{FormattedConfigError, MatmulSelection, MatmulSetupError, SpikeSide};

/// Builds the warp-level configuration on top of the tile family.
///
/// Derives the per-lane tile from the warp tile and lane partition, then
/// checks that the staged depth is consumable in whole k groups.
pub struct PlaneSpikeMatmulFamily<S: SpikeSide> {
    _phantom: PhantomData<S>,
}

impl<S: SpikeSide> PlaneSpikeMatmulFamily<S> {
    pub fn setup(selection: &MatmulSelection) -> Result<PlaneStageConfig, MatmulSetupError> {
        let tile_config = SpikeTileMatmulFamily::<S>::setup(&selection.tiling_scheme)?;

        let scheme = selection.tiling_scheme;
        if scheme.stage_k == 0 || scheme.stage_k % scheme.lane_k != 0 {
            return Err(FormattedConfigError::new(move || {
                format!(
                    "Error: stage depth {} is not a positive multiple of lane depth {}.",
                    scheme.stage_k, scheme.lane_k
                )
            })
            .into());
        }

        Ok(PlaneStageConfig::new(
            tile_config,
            scheme.lane_partition,
            scheme.plane_tile,
            scheme.stage_k,
            selection.transform_lhs,
            selection.transform_rhs,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{
        LanePartition, PlanePartition, PlaneTileSize, SpikeLhs, TilingScheme,
    };

    #[test]
    fn stage_depth_must_be_a_multiple_of_lane_depth() {
        let selection = MatmulSelection::simt(TilingScheme::new(
            PlaneTileSize::new(4, 4),
            LanePartition::new(2, 2),
            3,
            PlanePartition::new(1, 1),
            4,
        ));
        assert!(matches!(
            PlaneSpikeMatmulFamily::<SpikeLhs>::setup(&selection),
            Err(MatmulSetupError::InvalidConfig(_))
        ));
    }
}
