use std::collections::{BTreeMap, VecDeque};

use tessera_geom::CellPos;
use tessera_structures::Mutation;
use tessera_world::REGION_SIZE;

/// Region a task's effect lands in; `None` for effects with no grid position.
pub type OrderDomain = Option<(i32, i32, i32)>;

#[inline]
pub fn domain_of(pos: Option<CellPos>) -> OrderDomain {
    pos.map(|p| p.region_key(REGION_SIZE, REGION_SIZE, REGION_SIZE))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub tick: u64,
    pub domain: OrderDomain,
    pub mutation: Mutation,
}

/// Mutations waiting for a later tick. Tasks sharing a tick run in the
/// order they were scheduled.
pub struct TaskQueue {
    // map of tick -> FIFO queue of tasks
    by_tick: BTreeMap<u64, VecDeque<Task>>,
    pub now: u64,
    next_id: u64,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
        }
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn schedule_at(&mut self, tick: u64, mutation: Mutation) -> u64 {
        let id = self.alloc_id();
        let task = Task {
            id,
            tick,
            domain: domain_of(mutation.position()),
            mutation,
        };
        self.by_tick.entry(tick).or_default().push_back(task);
        id
    }

    pub fn schedule_after(&mut self, delta: u64, mutation: Mutation) -> u64 {
        self.schedule_at(self.now.saturating_add(delta), mutation)
    }

    /// Next task due at or before `now`, earliest tick first.
    pub fn pop_ready(&mut self) -> Option<Task> {
        let (&tick, q) = self.by_tick.range_mut(..=self.now).next()?;
        let task = q.pop_front();
        if q.is_empty() {
            self.by_tick.remove(&tick);
        }
        task
    }

    pub fn advance_tick(&mut self) {
        self.now = self.now.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.by_tick.values().map(|q| q.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tick.is_empty()
    }

    /// Tick of the latest pending task.
    pub fn last_tick(&self) -> Option<u64> {
        self.by_tick.keys().next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sound(at: CellPos) -> Mutation {
        Mutation::PlaySound {
            sound: "dig.wood",
            at,
        }
    }

    #[test]
    fn tasks_wait_for_their_tick() {
        let mut q = TaskQueue::new();
        q.schedule_after(1, sound(CellPos::ZERO));
        assert!(q.pop_ready().is_none());
        q.advance_tick();
        let task = q.pop_ready().expect("due");
        assert_eq!(task.tick, 1);
        assert_eq!(task.domain, Some((0, 0, 0)));
        assert!(q.pop_ready().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn same_tick_is_fifo_and_overdue_runs_first() {
        let mut q = TaskQueue::new();
        let a = q.schedule_at(2, sound(CellPos::new(1, 0, 0)));
        let b = q.schedule_at(2, sound(CellPos::new(2, 0, 0)));
        let c = q.schedule_at(1, Mutation::ConsumeHeldItem { actor: 3 });
        q.advance_tick();
        q.advance_tick();
        let order: Vec<u64> = std::iter::from_fn(|| q.pop_ready()).map(|t| t.id).collect();
        assert_eq!(order, vec![c, a, b]);
    }

    #[test]
    fn domains_follow_regions() {
        let mut q = TaskQueue::new();
        q.schedule_after(1, sound(CellPos::new(-1, 0, 0)));
        q.schedule_after(1, sound(CellPos::new(15, 15, 15)));
        q.schedule_after(1, Mutation::ConsumeHeldItem { actor: 1 });
        assert_eq!(q.len(), 3);
        assert_eq!(q.last_tick(), Some(1));
        q.advance_tick();
        let domains: Vec<OrderDomain> = std::iter::from_fn(|| q.pop_ready()).map(|t| t.domain).collect();
        assert_eq!(domains, vec![Some((-1, 0, 0)), Some((0, 0, 0)), None]);
    }
}
