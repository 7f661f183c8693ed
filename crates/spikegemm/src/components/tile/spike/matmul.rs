use std::marker::PhantomData;

use crate::components::tile::spike::SpikeTileConfig;
use crate::components::tile::{Fragment, Tile, TileConfig, TileMatmul, TileMut};
use crate::components::{Layout, Numeric, SpikeSide};

/// Computes one lane's tile product directly in registers, one scalar step
/// at a time.
///
/// One operand carries the fired/not-fired signal, so every step is an add
/// predicated on the firing bit rather than a multiply. The side marker `S`
/// decides which operand that is; the loop body is shared by both pairings.
///
/// Layout parameters are the per-lane layouts, i.e. already stripped of any
/// interleaved grouping by the warp layer.
pub struct SpikeTileMatmul<S: SpikeSide, E: Numeric, LA: Layout, LB: Layout, LC: Layout> {
    _phantom: PhantomData<(S, E, LA, LB, LC)>,
}

impl<S, E, LA, LB, LC> TileMatmul<S::Lhs<E>, S::Rhs<E>, E> for SpikeTileMatmul<S, E, LA, LB, LC>
where
    S: SpikeSide,
    E: Numeric,
    LA: Layout,
    LB: Layout,
    LC: Layout,
{
    type Config = SpikeTileConfig;

    fn accumulate(
        d: &mut Fragment<E>,
        a: &Fragment<S::Lhs<E>>,
        b: &Fragment<S::Rhs<E>>,
        c: &Fragment<E>,
        config: SpikeTileConfig,
    ) {
        let size = config.tile_size();

        // Running-sum formulation: the output starts as the accumulator
        // input and every step writes one cell back before moving on.
        d.copy_from(c);

        let a = Tile::<_, LA>::new(a.as_slice(), (size.m, size.k));
        let b = Tile::<_, LB>::new(b.as_slice(), (size.k, size.n));
        let mut d = TileMut::<_, LC>::new(d.as_mut_slice(), (size.m, size.n));

        for k in 0..size.k {
            for n in 0..size.n {
                for m in 0..size.m {
                    // Odd columns walk m in reverse so consecutive writes
                    // land on neighboring accumulator cells. Per-cell sums
                    // are order-independent, so only locality changes.
                    let m = if n % 2 == 1 { size.m - 1 - m } else { m };

                    let acc = d.get((m, n));
                    let value = S::multiply_add::<E>(a.get((m, k)), b.get((k, n)), acc);
                    d.set((m, n), value);
                }
            }
        }
    }

    fn allocate_lhs(config: SpikeTileConfig) -> Fragment<S::Lhs<E>> {
        Fragment::new(config.tile_size().mk())
    }

    fn allocate_rhs(config: SpikeTileConfig) -> Fragment<S::Rhs<E>> {
        Fragment::new(config.tile_size().kn())
    }

    fn allocate_acc(config: SpikeTileConfig) -> Fragment<E> {
        Fragment::new(config.tile_size().mn())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::components::tile::TileMatmulFamily;
    use crate::components::tile::spike::SpikeTileMatmulFamily;
    use crate::components::{RowMajor, Spike, SpikeLhs, SpikeRhs, TileSize};

    type LhsSpikeMma = SpikeTileMatmul<SpikeLhs, f32, RowMajor, RowMajor, RowMajor>;
    type RhsSpikeMma = SpikeTileMatmul<SpikeRhs, f32, RowMajor, RowMajor, RowMajor>;

    fn spikes(bits: &[u8]) -> Fragment<Spike> {
        let mut fragment = Fragment::new(bits.len() as u32);
        for (i, &bit) in bits.iter().enumerate() {
            fragment[i] = Spike::new(bit != 0);
        }
        fragment
    }

    fn values(data: &[f32]) -> Fragment<f32> {
        let mut fragment = Fragment::new(data.len() as u32);
        for (i, &value) in data.iter().enumerate() {
            fragment[i] = value;
        }
        fragment
    }

    #[test]
    fn identity_spikes_pass_the_dense_operand_through() {
        let config = SpikeTileConfig::new(TileSize::new(2, 2, 2));

        let a = spikes(&[1, 0, 0, 1]);
        let b = values(&[2.0, 3.0, 4.0, 5.0]);
        let c = values(&[0.0; 4]);
        let mut d = LhsSpikeMma::allocate_acc(config);

        LhsSpikeMma::accumulate(&mut d, &a, &b, &c, config);

        assert_eq!(d.as_slice(), &[2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn accumulator_input_is_carried_and_left_untouched() {
        let config = SpikeTileConfig::new(TileSize::new(2, 2, 2));

        let a = spikes(&[1, 1, 1, 1]);
        let b = values(&[1.0, 2.0, 3.0, 4.0]);
        let c = values(&[10.0, 20.0, 30.0, 40.0]);
        let c_before = c.clone();
        let mut d = LhsSpikeMma::allocate_acc(config);

        LhsSpikeMma::accumulate(&mut d, &a, &b, &c, config);

        assert_eq!(d.as_slice(), &[14.0, 26.0, 34.0, 46.0]);
        assert_eq!(c, c_before);
    }

    #[test]
    fn binary_rhs_gates_the_dense_lhs() {
        let config = SpikeTileConfig::new(TileSize::new(2, 2, 2));

        // b[k][n]: column 0 accepts k=0 only, column 1 accepts both.
        let a = values(&[1.0, 2.0, 3.0, 4.0]);
        let b = spikes(&[1, 1, 0, 1]);
        let c = values(&[0.0; 4]);
        let mut d = RhsSpikeMma::allocate_acc(config);

        RhsSpikeMma::accumulate(&mut d, &a, &b, &c, config);

        assert_eq!(d.as_slice(), &[1.0, 3.0, 3.0, 7.0]);
    }

    #[test]
    fn serpentine_order_matches_natural_order() {
        let config = SpikeTileConfig::new(TileSize::new(4, 3, 5));
        let size = config.tile_size();

        let a = spikes(
            &(0..size.mk())
                .map(|i| (i % 3 != 1) as u8)
                .collect::<Vec<_>>(),
        );
        let b = values(
            &(0..size.kn())
                .map(|i| i as f32 * 0.5 - 3.0)
                .collect::<Vec<_>>(),
        );
        let c = values(&(0..size.mn()).map(|i| i as f32).collect::<Vec<_>>());

        let mut serpentine = LhsSpikeMma::allocate_acc(config);
        LhsSpikeMma::accumulate(&mut serpentine, &a, &b, &c, config);

        // Natural row-major accumulation over the same cells.
        let mut natural = c.clone();
        for k in 0..size.k {
            for n in 0..size.n {
                for m in 0..size.m {
                    let idx = (m * size.n + n) as usize;
                    if a[(m * size.k + k) as usize].fired() {
                        natural[idx] += b[(k * size.n + n) as usize];
                    }
                }
            }
        }

        assert_eq!(serpentine.as_slice(), natural.as_slice());
    }

    #[test]
    fn family_reports_invalid_tiles() {
        use crate::components::{LanePartition, PlanePartition, PlaneTileSize, TilingScheme};

        let scheme = TilingScheme::new(
            PlaneTileSize::new(8, 8),
            LanePartition::new(3, 2),
            2,
            PlanePartition::new(1, 1),
            4,
        );
        assert!(SpikeTileMatmulFamily::<SpikeLhs>::setup(&scheme).is_err());
    }
}
