mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use tessel_chunk::WorldPos;
use tessel_runtime::Scheduler;

use common::{TIMEOUT, config, context};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn each_submitted_chunk_finishes_exactly_once(
        picks in prop::collection::vec(prop::option::of(any::<bool>()), 9),
    ) {
        let ctx = context(1, 0, 32);
        let sched = Scheduler::start(Arc::clone(&ctx), &config()).unwrap();
        let columns = ctx.grid.columns();

        let mut expected: HashMap<WorldPos, u32> = HashMap::new();
        sched.pass_begin();
        for (col, pick) in columns.iter().zip(&picks) {
            let Some(run_with_noise) = *pick else {
                continue;
            };
            sched.add(Arc::clone(col), run_with_noise);
            for chunk in col.chunks() {
                expected.insert(chunk.origin(), if run_with_noise { 4 } else { 3 });
            }
        }
        sched.pass_end();

        for _ in 0..expected.len() {
            let job = sched.wait_finished_job(TIMEOUT);
            prop_assert!(job.is_some());
            let job = job.unwrap();
            prop_assert!(job.is_completed());
            let passes = expected.remove(&job.chunk().origin());
            prop_assert_eq!(passes, Some(job.pass_count()));
        }
        prop_assert!(expected.is_empty());
        prop_assert!(sched.wait_finished_job(Duration::from_millis(50)).is_none());
        sched.shutdown();
    }
}
