use std::marker::PhantomData;

use crate::components::tile::TileMatmulFamily;
use crate::components::tile::spike::{SpikeTileConfig, SpikeTileMatmul};
use crate::components::{FormattedConfigError, Layout, MatmulSetupError, Numeric, SpikeSide, TilingScheme};

/// Uniform entry to the register level for spike pairings.
///
/// Presents the same family interface as any other tile matmul while always
/// selecting the predicated-add routine; which operand is binary is fixed by
/// the side marker, so no decision survives into the compiled code.
pub struct SpikeTileMatmulFamily<S: SpikeSide> {
    _phantom: PhantomData<S>,
}

impl<S: SpikeSide> TileMatmulFamily for SpikeTileMatmulFamily<S> {
    type LhsElem<E: Numeric> = S::Lhs<E>;
    type RhsElem<E: Numeric> = S::Rhs<E>;

    type Config = SpikeTileConfig;

    type Matmul<E: Numeric, LA: Layout, LB: Layout, LC: Layout> =
        SpikeTileMatmul<S, E, LA, LB, LC>;

    fn setup(scheme: &TilingScheme) -> Result<SpikeTileConfig, MatmulSetupError> {
        let tile_size = scheme.lane_tile()?;

        if tile_size.m == 0 || tile_size.n == 0 || tile_size.k == 0 {
            return Err(FormattedConfigError::new(move || {
                format!(
                    "Error: lane tile {}x{}x{} has a zero extent.",
                    tile_size.m, tile_size.n, tile_size.k
                )
            })
            .into());
        }

        log::debug!(
            "tile matmul setup: binary operand {:?}, lane tile {}x{}x{}",
            S::BINARY_OPERAND,
            tile_size.m,
            tile_size.n,
            tile_size.k
        );

        Ok(SpikeTileConfig::new(tile_size))
    }
}
