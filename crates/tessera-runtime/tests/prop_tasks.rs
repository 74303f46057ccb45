use proptest::prelude::*;
use std::collections::HashSet;
use tessera_geom::CellPos;
use tessera_runtime::TaskQueue;
use tessera_structures::Mutation;

proptest! {
    // Every scheduled task comes out exactly once, never before its tick.
    #[test]
    fn tasks_run_exactly_once(delays in prop::collection::vec(0u64..6, 0..40)) {
        let mut q = TaskQueue::new();
        let mut ids = HashSet::new();
        for (i, d) in delays.iter().enumerate() {
            let at = CellPos::new(i as i32, 0, 0);
            ids.insert(q.schedule_after(*d, Mutation::PlaySound { sound: "dig.wood", at }));
        }
        prop_assert_eq!(q.len(), delays.len());

        let mut seen = HashSet::new();
        for _ in 0..8 {
            while let Some(task) = q.pop_ready() {
                prop_assert!(task.tick <= q.now);
                prop_assert!(seen.insert(task.id));
            }
            q.advance_tick();
        }
        prop_assert!(q.is_empty());
        prop_assert_eq!(seen, ids);
    }
}
