use std::sync::Arc;

use tessera_blocks::{Block, BlockId, BlockRegistry};
use tessera_geom::CellPos;
use tessera_structures::behavior::merge_outcome;
use tessera_structures::{
    Actor, Behavior, BehaviorTable, BreakEvent, Effects, InteractEvent, Mutation, PlaceEvent,
    PlaceOutcome, StructureError,
};
use tessera_world::GridWorld;

use crate::host::Host;
use crate::tasks::TaskQueue;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub events: u64,
    pub tasks_run: u64,
    pub writes: u64,
    pub skipped_clears: u64,
    pub validation_failures: u64,
    pub resolution_failures: u64,
    pub partial_write_failures: u64,
    pub consistency_aborts: u64,
}

/// Routes host events to the behaviors a block type declares and applies
/// the mutations they return.
///
/// Each entry point first advances one tick and runs every task that came
/// due, so work deferred by an event always lands before the next event
/// is looked at.
pub struct Engine<W: GridWorld, H> {
    reg: Arc<BlockRegistry>,
    table: BehaviorTable,
    world: W,
    host: H,
    tasks: TaskQueue,
    stats: EngineStats,
}

impl<W: GridWorld, H: Host> Engine<W, H> {
    pub fn new(reg: Arc<BlockRegistry>, table: BehaviorTable, world: W, host: H) -> Self {
        Self {
            reg,
            table,
            world,
            host,
            tasks: TaskQueue::new(),
            stats: EngineStats::default(),
        }
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.reg
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn tick(&self) -> u64 {
        self.tasks.now
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    fn behaviors_for(&self, id: BlockId) -> Vec<Arc<dyn Behavior>> {
        match self.reg.get(id) {
            Some(ty) => self.table.behaviors_for(ty).cloned().collect(),
            None => Vec::new(),
        }
    }

    /// A placement attempt of `proposed` at `pos`. Returns what happened to
    /// the default single-cell placement.
    pub fn place(&mut self, pos: CellPos, proposed: Block, actor: Option<Actor>) -> PlaceOutcome {
        self.begin_event();
        let reg = Arc::clone(&self.reg);
        let mut ev = PlaceEvent {
            pos,
            proposed,
            actor,
        };
        let mut outcome = PlaceOutcome::Proceed;
        if ev.actor.is_some() {
            for behavior in self.behaviors_for(proposed.id) {
                let effects = behavior.on_place(&ev, &reg, &self.world);
                if let PlaceOutcome::Replace(b) = effects.outcome {
                    ev.proposed = b;
                }
                outcome = merge_outcome(outcome, effects.outcome);
                self.absorb(behavior.id(), effects);
            }
        }
        if outcome != PlaceOutcome::Cancel {
            match self.world.set_block(pos, ev.proposed) {
                Ok(()) => self.stats.writes += 1,
                Err(e) => log::debug!(target: "dispatch", "default placement skipped: {}", e),
            }
        }
        log::trace!(
            target: "dispatch",
            "[tick {}] place {} at {} -> {:?}",
            self.tasks.now,
            proposed.id,
            pos,
            outcome
        );
        outcome
    }

    pub fn interact(&mut self, pos: CellPos, actor: Actor) {
        self.begin_event();
        let Some(block) = self.world.block_at(pos) else {
            return;
        };
        let reg = Arc::clone(&self.reg);
        let ev = InteractEvent { pos, actor };
        for behavior in self.behaviors_for(block.id) {
            let effects = behavior.on_interact(&ev, &reg, &self.world);
            self.absorb(behavior.id(), effects);
        }
    }

    /// Removes the cell at `pos` and runs its break handlers. Returns the
    /// removed block, or `None` when nothing could be removed.
    pub fn break_block(&mut self, pos: CellPos) -> Option<Block> {
        self.begin_event();
        let broken = self.world.block_at(pos)?;
        if self.reg.is_air(broken) {
            return None;
        }
        if let Err(e) = self.world.set_block(pos, self.reg.air()) {
            log::debug!(target: "dispatch", "break refused: {}", e);
            return None;
        }
        self.stats.writes += 1;
        let reg = Arc::clone(&self.reg);
        let ev = BreakEvent { pos, broken };
        for behavior in self.behaviors_for(broken.id) {
            let effects = behavior.on_break(&ev, &reg, &self.world);
            self.absorb(behavior.id(), effects);
        }
        Some(broken)
    }

    /// Moves to the next tick and runs whatever is due.
    pub fn advance_tick(&mut self) {
        self.tasks.advance_tick();
        self.run_due();
    }

    /// Runs ticks until no deferred work remains.
    pub fn settle(&mut self) {
        while let Some(last) = self.tasks.last_tick() {
            while self.tasks.now < last {
                self.advance_tick();
            }
            self.run_due();
        }
    }

    fn begin_event(&mut self) {
        self.stats.events += 1;
        self.advance_tick();
    }

    fn run_due(&mut self) {
        while let Some(task) = self.tasks.pop_ready() {
            log::trace!(
                target: "tasks",
                "[tick {}] task {} domain={:?} {:?}",
                self.tasks.now,
                task.id,
                task.domain,
                task.mutation
            );
            self.stats.tasks_run += 1;
            self.apply(task.mutation);
        }
    }

    fn absorb(&mut self, source: &str, effects: Effects) {
        let Effects {
            immediate,
            deferred,
            diagnostics,
            ..
        } = effects;
        for err in diagnostics {
            self.record(source, err);
        }
        for m in immediate {
            self.apply(m);
        }
        for m in deferred {
            self.tasks.schedule_after(1, m);
        }
    }

    fn record(&mut self, source: &str, err: StructureError) {
        match err {
            StructureError::ValidationFailure { .. } => {
                self.stats.validation_failures += 1;
                log::debug!(target: "structures", "{}: {}", source, err);
            }
            StructureError::ResolutionFailure { .. } => {
                self.stats.resolution_failures += 1;
                log::debug!(target: "structures", "{}: {}", source, err);
            }
            StructureError::PartialWriteFailure { .. } => {
                self.stats.partial_write_failures += 1;
                log::error!(target: "structures", "{}: {}", source, err);
            }
            StructureError::ConsistencyAbort { .. } => {
                self.stats.consistency_aborts += 1;
                log::warn!(target: "structures", "{}: {}", source, err);
            }
        }
    }

    fn apply(&mut self, m: Mutation) {
        match m {
            Mutation::Set { pos, block } => self.write(pos, block),
            Mutation::SetIfType { pos, expect, block } => match self.world.block_at(pos) {
                Some(live) if live.id == expect => self.write(pos, block),
                _ => {
                    self.stats.skipped_clears += 1;
                    log::trace!(target: "tasks", "{} no longer holds type {}; left alone", pos, expect);
                }
            },
            Mutation::PlaySound { sound, at } => self.host.play_sound(sound, at),
            Mutation::ConsumeHeldItem { actor } => self.host.consume_held_item(actor),
        }
    }

    fn write(&mut self, pos: CellPos, block: Block) {
        match self.world.set_block(pos, block) {
            Ok(()) => self.stats.writes += 1,
            Err(e) => self.record(
                "dispatch",
                StructureError::PartialWriteFailure {
                    pos,
                    reason: e.to_string(),
                },
            ),
        }
    }
}
