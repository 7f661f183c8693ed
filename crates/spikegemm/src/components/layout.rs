use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Major ordering of a layout once interleaving is stripped away.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixMajor {
    Row,
    Col,
}

/// Coordinate-to-offset addressing function mapping a 2-d tile onto flat
/// storage.
///
/// Extents and coordinates are `(rows, cols)` / `(row, col)` pairs. The
/// layout is a pure compile-time description; strides come from the caller
/// or from [`Layout::packed_ld`] for densely packed storage.
pub trait Layout: Copy + Debug + Default + Send + Sync + 'static {
    /// Interleaving factor of the packed groups (1 for plain layouts).
    const INTERLEAVE: u32;

    /// Major ordering of the addressing function.
    const MAJOR: MatrixMajor;

    /// The layout a single lane addresses its register tile with, once the
    /// interleaved grouping is peeled off.
    type Unit: Layout;

    /// Leading dimension of packed storage with the given extents.
    fn packed_ld(extents: (u32, u32)) -> u32;

    /// Offset of `coord` given leading dimension `ld`.
    fn offset_strided(coord: (u32, u32), ld: u32) -> u32;

    /// Offset of `coord` in packed storage with the given extents.
    fn offset(extents: (u32, u32), coord: (u32, u32)) -> u32 {
        Self::offset_strided(coord, Self::packed_ld(extents))
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct RowMajor;

#[derive(Copy, Clone, Debug, Default)]
pub struct ColMajor;

/// Row-major storage where rows are packed in interleaved groups of `I`.
#[derive(Copy, Clone, Debug, Default)]
pub struct RowMajorInterleaved<const I: u32>;

/// Column-major storage where columns are packed in interleaved groups of `I`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ColMajorInterleaved<const I: u32>;

impl Layout for RowMajor {
    const INTERLEAVE: u32 = 1;
    const MAJOR: MatrixMajor = MatrixMajor::Row;
    type Unit = RowMajor;

    fn packed_ld(extents: (u32, u32)) -> u32 {
        extents.1
    }

    fn offset_strided(coord: (u32, u32), ld: u32) -> u32 {
        coord.0 * ld + coord.1
    }
}

impl Layout for ColMajor {
    const INTERLEAVE: u32 = 1;
    const MAJOR: MatrixMajor = MatrixMajor::Col;
    type Unit = ColMajor;

    fn packed_ld(extents: (u32, u32)) -> u32 {
        extents.0
    }

    fn offset_strided(coord: (u32, u32), ld: u32) -> u32 {
        coord.1 * ld + coord.0
    }
}

impl<const I: u32> Layout for RowMajorInterleaved<I> {
    const INTERLEAVE: u32 = I;
    const MAJOR: MatrixMajor = MatrixMajor::Row;
    type Unit = RowMajor;

    fn packed_ld(extents: (u32, u32)) -> u32 {
        extents.1 * I
    }

    fn offset_strided(coord: (u32, u32), ld: u32) -> u32 {
        (coord.0 / I) * ld + coord.1 * I + coord.0 % I
    }
}

impl<const I: u32> Layout for ColMajorInterleaved<I> {
    const INTERLEAVE: u32 = I;
    const MAJOR: MatrixMajor = MatrixMajor::Col;
    type Unit = ColMajor;

    fn packed_ld(extents: (u32, u32)) -> u32 {
        extents.0 * I
    }

    fn offset_strided(coord: (u32, u32), ld: u32) -> u32 {
        (coord.1 / I) * ld + coord.0 * I + coord.1 % I
    }
}

/// Layouts the lane-parallel accumulator path supports.
///
/// The epilogue walks accumulators row by row, so only row-contiguous
/// addressing is accepted; choosing anything else refuses to build. The
/// trait is sealed: adding accumulator layouts requires widening the
/// epilogue itself.
pub trait AccumulatorLayout: Layout + private::Sealed {}

impl AccumulatorLayout for RowMajor {}

mod private {
    pub trait Sealed {}

    impl Sealed for super::RowMajor {}
}
