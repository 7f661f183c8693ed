//! Host-side driver assembling the spike mainloop and walking it over a
//! whole problem.
//!
//! Device memory management, batching and launch scheduling belong to the
//! framework above; this driver is the engine's reference execution path
//! and the entry point the tests exercise.

use crate::components::global::memory::{GlobalView, PredicatedTileIterator};
use crate::components::global::pipelined::{
    CubeAccumulators, PipelinedSpikeMatmul, PipelinedSpikeMatmulFamily,
};
use crate::components::global::{Barrier, GlobalWriter};
use crate::components::{
    AccumulatorLayout, FormattedConfigError, Layout, MatmulIdent, MatmulProblem, MatmulSelection,
    MatmulSetupError, Numeric, SpikeSide,
};

/// Index-gather addressing for the operands: `lhs` remaps rows of the first
/// operand, `rhs` columns of the second.
///
/// Index tables must have exactly `m` (resp. `n`) entries; entries pointing
/// outside the physical operand are masked to zero like any other
/// out-of-bounds access.
#[derive(Copy, Clone, Debug, Default)]
pub struct GatherIndices<'a> {
    pub lhs: Option<&'a [u32]>,
    pub rhs: Option<&'a [u32]>,
}

/// Computes `out = lhs (*) rhs + acc`, where `(*)` multiplies through the
/// predicated-add pairing selected by `S`.
///
/// Operands are packed in their layouts; `acc` is optional and zero when
/// absent. The problem is tiled over threadblock positions, each running
/// the two-stage pipelined mainloop to completion before its accumulators
/// are written out.
pub fn spike_matmul<S, E, LA, LB, LC>(
    problem: &MatmulProblem,
    selection: &MatmulSelection,
    lhs: &[S::Lhs<E>],
    rhs: &[S::Rhs<E>],
    acc: Option<&[E]>,
    out: &mut [E],
    gather: GatherIndices<'_>,
) -> Result<(), MatmulSetupError>
where
    S: SpikeSide,
    E: Numeric,
    LA: Layout,
    LB: Layout,
    LC: AccumulatorLayout,
{
    let config = PipelinedSpikeMatmulFamily::<S, E, LA, LB, LC>::setup(problem, selection)?;

    let (m, n, k) = check_extents(problem)?;
    let lhs_rows = operand_extent("lhs", lhs.len(), k, m, gather.lhs)?;
    let rhs_cols = operand_extent("rhs", rhs.len(), k, n, gather.rhs)?;
    check_len("out", out.len(), m as usize * n as usize)?;
    if let Some(acc) = acc {
        check_len("acc", acc.len(), m as usize * n as usize)?;
    }

    let lhs_view = GlobalView::<S::Lhs<E>, LA>::new(lhs, lhs_rows, k);
    let rhs_view = GlobalView::<S::Rhs<E>, LB>::new(rhs, k, rhs_cols);
    let acc_view = acc.map(|acc| GlobalView::<E, LC>::new(acc, m, n));
    let mut writer = GlobalWriter::<E, LC>::new(out, m, n);

    for cube_row in 0..m.div_ceil(config.cube_m()) {
        for cube_col in 0..n.div_ceil(config.cube_n()) {
            let origin = (cube_row * config.cube_m(), cube_col * config.cube_n());

            let mut lhs_iter = PredicatedTileIterator::<_, LA>::new(
                lhs_view,
                MatmulIdent::Lhs,
                (origin.0, 0),
                gather.lhs,
                config.lhs_memory_config(),
            );
            let mut rhs_iter = PredicatedTileIterator::<_, LB>::new(
                rhs_view,
                MatmulIdent::Rhs,
                (0, origin.1),
                gather.rhs,
                config.rhs_memory_config(),
            );

            let mut accumulators = CubeAccumulators::new(config);
            accumulators.init_from(acc_view.as_ref(), origin, config);

            let mut barrier = Barrier::new();
            PipelinedSpikeMatmul::<S, E, LA, LB, LC>::execute(
                &mut lhs_iter,
                &mut rhs_iter,
                &mut accumulators,
                &mut barrier,
                k,
                config,
            );

            writer.write_accumulators(&accumulators, origin, config);
        }
    }

    Ok(())
}

fn check_extents(problem: &MatmulProblem) -> Result<(u32, u32, u32), MatmulSetupError> {
    let MatmulProblem { m, n, k } = *problem;
    let limit = u32::MAX as usize;
    if m == 0 || n == 0 || k == 0 || m > limit || n > limit || k > limit {
        return Err(FormattedConfigError::new(move || {
            format!("Error: problem {m}x{n}x{k} is outside the supported extent range.")
        })
        .into());
    }
    Ok((m as u32, n as u32, k as u32))
}

/// Extent of the gathered axis: fixed by the problem without indices, read
/// off the physical operand with them.
fn operand_extent(
    ident: &'static str,
    len: usize,
    k: u32,
    logical: u32,
    gather: Option<&[u32]>,
) -> Result<u32, MatmulSetupError> {
    match gather {
        None => {
            check_len(ident, len, logical as usize * k as usize)?;
            Ok(logical)
        }
        Some(indices) => {
            if indices.len() != logical as usize {
                let found = indices.len();
                return Err(FormattedConfigError::new(move || {
                    format!(
                        "Error: {ident} gather table has {found} entries, the problem needs {logical}."
                    )
                })
                .into());
            }
            if len % k as usize != 0 {
                return Err(FormattedConfigError::new(move || {
                    format!(
                        "Error: {ident} storage of {len} elements is not a whole number of k={k} slices."
                    )
                })
                .into());
            }
            Ok((len / k as usize) as u32)
        }
    }
}

fn check_len(ident: &'static str, len: usize, expected: usize) -> Result<(), MatmulSetupError> {
    if len != expected {
        return Err(FormattedConfigError::new(move || {
            format!("Error: {ident} has {len} elements, the problem needs {expected}.")
        })
        .into());
    }
    Ok(())
}
