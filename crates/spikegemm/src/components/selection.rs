use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::components::TilingScheme;

/// Class of compute primitive the mainloop is built around.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatorClass {
    /// Lane-parallel scalar math.
    Simt,
    /// Tensor-core style block operation.
    TensorOp,
}

/// Policy for clearing staging buffers around out-of-bounds loads.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum SharedMemoryClear {
    None,
    ZFill,
    ClearLastStage,
}

/// Optional element transform applied while operands are streamed to lanes.
///
/// Real and binary elements are self-conjugate, so both choices behave
/// identically on the spike path; the knob exists for interface parity with
/// complex-valued mainloops.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplexTransform {
    None,
    Conjugate,
}

/// Everything the mainloop assembler needs besides the problem itself.
#[derive(new, Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatmulSelection {
    pub tiling_scheme: TilingScheme,
    pub op_class: OperatorClass,
    /// Number of software pipeline stages over the reduction dimension.
    pub num_stages: u32,
    pub smem_clear: SharedMemoryClear,
    /// Access granularity of the first operand's leading dimension, in elements.
    pub alignment_lhs: u32,
    /// Access granularity of the second operand's leading dimension, in elements.
    pub alignment_rhs: u32,
    pub transform_lhs: ComplexTransform,
    pub transform_rhs: ComplexTransform,
}

impl MatmulSelection {
    /// The lane-parallel two-stage selection, the only tuple specialized by
    /// this engine.
    pub fn simt(tiling_scheme: TilingScheme) -> Self {
        Self {
            tiling_scheme,
            op_class: OperatorClass::Simt,
            num_stages: 2,
            smem_clear: SharedMemoryClear::None,
            alignment_lhs: 1,
            alignment_rhs: 1,
            transform_lhs: ComplexTransform::None,
            transform_rhs: ComplexTransform::None,
        }
    }
}
