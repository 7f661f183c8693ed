#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
/// Identifier for the three tensors in a matmul
///
/// Useful to specialize some functions depending on the tensor
pub enum MatmulIdent {
    Lhs,
    Rhs,
    Out,
}
