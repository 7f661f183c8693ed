use std::fmt::Debug;

use bytemuck::Pod;
use num_traits::{NumAssign, NumCast};
use serde::{Deserialize, Serialize};

/// Storage kind of a tile element.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElemKind {
    I8,
    I32,
    F16,
    F32,
    F64,
    /// Fired/not-fired signal. Valid as one operand, never as the accumulator.
    Spike,
}

impl ElemKind {
    /// Size of one element in bytes.
    pub const fn size(&self) -> usize {
        match self {
            ElemKind::I8 | ElemKind::Spike => 1,
            ElemKind::F16 => 2,
            ElemKind::I32 | ElemKind::F32 => 4,
            ElemKind::F64 => 8,
        }
    }
}

/// Element that can live in a fragment or a staging tile.
pub trait TileElement: Copy + Default + Debug + PartialEq + Pod + Send + Sync + 'static {
    const KIND: ElemKind;
}

/// Element the accumulate arithmetic runs on.
pub trait Numeric: TileElement + NumAssign + NumCast + PartialOrd {}

macro_rules! register_numeric {
    ($ty:ty, $kind:expr) => {
        impl TileElement for $ty {
            const KIND: ElemKind = $kind;
        }
        impl Numeric for $ty {}
    };
}

register_numeric!(i8, ElemKind::I8);
register_numeric!(i32, ElemKind::I32);
register_numeric!(half::f16, ElemKind::F16);
register_numeric!(f32, ElemKind::F32);
register_numeric!(f64, ElemKind::F64);
