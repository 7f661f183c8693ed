use std::fmt::Debug;

use bytemuck::{Pod, Zeroable};

use crate::components::{ElemKind, MatmulIdent, Numeric, TileElement};

/// A fired/not-fired activation from a spiking-neuron model.
///
/// Stored as a single byte so spike matrices stay dense and byte-addressable;
/// any non-zero payload counts as fired.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Spike(u8);

impl Spike {
    pub const FIRED: Spike = Spike(1);
    pub const QUIET: Spike = Spike(0);

    pub fn new(fired: bool) -> Spike {
        Spike(fired as u8)
    }

    /// Whether the neuron fired.
    pub fn fired(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for Spike {
    fn from(fired: bool) -> Self {
        Spike::new(fired)
    }
}

impl TileElement for Spike {
    const KIND: ElemKind = ElemKind::Spike;
}

/// What is left of a scalar multiply-accumulate once one factor is a spike:
/// the multiply collapses into an add predicated on the firing bit, and the
/// multiplier unit drops out of the hot path entirely.
#[inline]
pub fn predicated_add<E: Numeric>(spike: Spike, value: E, acc: E) -> E {
    if spike.fired() { acc + value } else { acc }
}

/// Which operand of the product carries the fired/not-fired signal.
///
/// Exactly one of the two multiplicands is binary per instantiation; the
/// accumulator never is. A pairing with both operands binary cannot be
/// expressed, since [`Spike`] does not implement [`Numeric`].
pub trait SpikeSide: Copy + Debug + Default + Send + Sync + 'static {
    /// Element stored in first-operand fragments.
    type Lhs<E: Numeric>: TileElement;
    /// Element stored in second-operand fragments.
    type Rhs<E: Numeric>: TileElement;

    /// The operand carrying the binary signal.
    const BINARY_OPERAND: MatmulIdent;

    /// One scalar multiply-accumulate step, with the multiply replaced by a
    /// predicated add.
    fn multiply_add<E: Numeric>(lhs: Self::Lhs<E>, rhs: Self::Rhs<E>, acc: E) -> E;
}

/// The first operand is the spike matrix.
#[derive(Copy, Clone, Debug, Default)]
pub struct SpikeLhs;

/// The second operand is the spike matrix.
#[derive(Copy, Clone, Debug, Default)]
pub struct SpikeRhs;

impl SpikeSide for SpikeLhs {
    type Lhs<E: Numeric> = Spike;
    type Rhs<E: Numeric> = E;

    const BINARY_OPERAND: MatmulIdent = MatmulIdent::Lhs;

    #[inline]
    fn multiply_add<E: Numeric>(lhs: Spike, rhs: E, acc: E) -> E {
        predicated_add(lhs, rhs, acc)
    }
}

impl SpikeSide for SpikeRhs {
    type Lhs<E: Numeric> = E;
    type Rhs<E: Numeric> = Spike;

    const BINARY_OPERAND: MatmulIdent = MatmulIdent::Rhs;

    #[inline]
    fn multiply_add<E: Numeric>(lhs: E, rhs: Spike, acc: E) -> E {
        predicated_add(rhs, lhs, acc)
    }
}
