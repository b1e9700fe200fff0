use std::sync::Arc;

use proptest::prelude::*;
use tessel_chunk::{Column, ColumnPos};
use tessel_grid::{Direction, Grid, JobSink};

struct Discard;

impl JobSink for Discard {
    fn pass_begin(&self) {}
    fn add(&self, _column: Arc<Column>, _run_with_noise: bool) {}
    fn pass_end(&self) {}
}

fn dir() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn slots_stay_a_bijection(dd in 1usize..4, walk in prop::collection::vec(dir(), 0..12)) {
        let g = Grid::new(dd, 0, 32, ColumnPos::new(0, 0));
        let mut cx = 0;
        let mut cz = 0;
        for d in &walk {
            g.shift(*d, &Discard);
            let (dx, dz) = d.step();
            cx += dx * 16;
            cz += dz * 16;
        }
        prop_assert_eq!(g.center(), ColumnPos::new(cx, cz));
        let dim = g.dimension() as i32;
        let origin = g.origin();
        let mut seen = std::collections::HashSet::new();
        for z in 0..dim {
            for x in 0..dim {
                let col = g.get_chunk_column(x, z).unwrap();
                prop_assert_eq!(col.slot(), (x, z));
                prop_assert_eq!(col.origin(), origin.offset_chunks(x, z));
                prop_assert!(seen.insert(col.origin()));
                prop_assert!(g.is_resident(&col));
            }
        }
    }

    #[test]
    fn reversed_walk_restores_window(dd in 1usize..3, walk in prop::collection::vec(dir(), 1..8)) {
        let g = Grid::new(dd, 0, 16, ColumnPos::new(-32, 64));
        let before: Vec<_> = g.columns().iter().map(|c| c.origin()).collect();
        for d in &walk {
            g.shift(*d, &Discard);
        }
        for d in walk.iter().rev() {
            g.shift(d.opposite(), &Discard);
        }
        let after: Vec<_> = g.columns().iter().map(|c| c.origin()).collect();
        prop_assert_eq!(before, after);
    }
}
