use std::fmt::Debug;

use crate::components::tile::Fragment;
use crate::components::{Layout, MatmulSetupError, Numeric, TileElement, TileSize, TilingScheme};

/// Configuration for the tile (register) matmul level.
pub trait TileConfig: Copy + Debug + Send + Sync + 'static {
    /// Extents of one lane's tile along m, n and k.
    fn tile_size(&self) -> TileSize;
}

/// Provides matrix multiplication for one lane's register tile.
///
/// Dimensions are fixed by the config; inputs must always be valid. If the
/// actual product is smaller than the tile, operands must be padded with
/// zeros upstream; a zeroed operand contributes nothing to the accumulator.
pub trait TileMatmul<L: TileElement, R: TileElement, EA: Numeric> {
    type Config: TileConfig;

    /// Computes `d = a (*) b + c` over the whole tile, where `(*)` is the
    /// predicated product of the operand pairing.
    ///
    /// Pure over register state: `a`, `b` and `c` are read-only and `d` is
    /// fully overwritten.
    fn accumulate(
        d: &mut Fragment<EA>,
        a: &Fragment<L>,
        b: &Fragment<R>,
        c: &Fragment<EA>,
        config: Self::Config,
    );

    /// Zeroed container for first-operand data.
    fn allocate_lhs(config: Self::Config) -> Fragment<L>;

    /// Zeroed container for second-operand data.
    fn allocate_rhs(config: Self::Config) -> Fragment<R>;

    /// Zeroed container for accumulator data.
    fn allocate_acc(config: Self::Config) -> Fragment<EA>;
}

/// Family selecting the tile-level routine for an operand pairing and
/// validating its configuration.
///
/// The warp layer talks to the family, never to a concrete routine: the
/// choice of algorithm is resolved entirely during monomorphization.
pub trait TileMatmulFamily {
    /// Element stored in first-operand fragments.
    type LhsElem<E: Numeric>: TileElement;
    /// Element stored in second-operand fragments.
    type RhsElem<E: Numeric>: TileElement;

    type Config: TileConfig;

    type Matmul<E: Numeric, LA: Layout, LB: Layout, LC: Layout>: TileMatmul<
            Self::LhsElem<E>,
            Self::RhsElem<E>,
            E,
            Config = Self::Config,
        >;

    fn setup(scheme: &TilingScheme) -> Result<Self::Config, MatmulSetupError>;
}
