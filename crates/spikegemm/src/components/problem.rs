use derive_new::new;
use serde::{Deserialize, Serialize};

/// Description of a matmul problem to solve, regardless of actual data
///
/// The first operand is `m x k`, the second `k x n`, the accumulator and
/// output `m x n`. Batching lives in the layer above this engine.
#[derive(new, Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatmulProblem {
    pub m: usize,
    pub n: usize,
    pub k: usize,
}
