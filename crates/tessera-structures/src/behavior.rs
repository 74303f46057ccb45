use std::collections::HashMap;
use std::sync::Arc;

use tessera_blocks::states::{self, FACE_UP, components};
use tessera_blocks::{Block, BlockRegistry, BlockState, BlockType};
use tessera_geom::CellPos;
use tessera_world::GridView;

use crate::cycle::{plan_dynamic_cycle, plan_switch_cycle};
use crate::effects::{Effects, PlaceOutcome};
use crate::error::StructureError;
use crate::erase::plan_erase;
use crate::footprint::placement_targets;
use crate::legacy::{plan_legacy_break, plan_legacy_place};
use crate::orientation::{Orientation, yaw_to_rotation};
use crate::placement::{MemberTransform, capture_states, validate_placement, write_structure};

pub type ActorId = u32;

/// The party triggering an event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Actor {
    pub id: ActorId,
    /// Horizontal look angle in degrees.
    pub yaw_deg: f32,
    pub sneaking: bool,
}

impl Actor {
    #[inline]
    pub fn rotation(&self) -> u8 {
        yaw_to_rotation(self.yaw_deg)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaceEvent {
    pub pos: CellPos,
    /// Block the host is about to write at `pos`.
    pub proposed: Block,
    pub actor: Option<Actor>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractEvent {
    pub pos: CellPos,
    pub actor: Actor,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreakEvent {
    pub pos: CellPos,
    /// Block that occupied `pos` before removal.
    pub broken: Block,
}

/// Event handlers attached to block types through their `components` list.
///
/// Handlers never touch the grid; they return the mutations they want.
pub trait Behavior: Send + Sync {
    fn id(&self) -> &'static str;

    fn on_place(&self, _ev: &PlaceEvent, _reg: &BlockRegistry, _world: &dyn GridView) -> Effects {
        Effects::none()
    }

    fn on_interact(
        &self,
        _ev: &InteractEvent,
        _reg: &BlockRegistry,
        _world: &dyn GridView,
    ) -> Effects {
        Effects::none()
    }

    fn on_break(&self, _ev: &BreakEvent, _reg: &BlockRegistry, _world: &dyn GridView) -> Effects {
        Effects::none()
    }
}

#[inline]
fn faces_up(ty: &BlockType, state: BlockState) -> bool {
    !ty.declares_state(states::BLOCK_FACE) || ty.state_prop_is_value(state, states::BLOCK_FACE, FACE_UP)
}

/// Stamps the actor's look rotation onto upward-facing single cells.
pub struct RotationBehavior;

impl Behavior for RotationBehavior {
    fn id(&self) -> &'static str {
        components::ROTATION
    }

    fn on_place(&self, ev: &PlaceEvent, reg: &BlockRegistry, _world: &dyn GridView) -> Effects {
        let Some(actor) = ev.actor else {
            return Effects::none();
        };
        let Some(ty) = reg.get(ev.proposed.id) else {
            return Effects::none();
        };
        if !ty.state_prop_is_value(ev.proposed.state, states::BLOCK_FACE, FACE_UP) {
            return Effects::none();
        }
        match ty.with_state_int(ev.proposed.state, states::ROTATION, actor.rotation() as i64) {
            Some(s) => Effects::replace(ev.proposed.with_state(s)),
            None => Effects::none(),
        }
    }
}

pub struct DynamicStateBehavior;

impl Behavior for DynamicStateBehavior {
    fn id(&self) -> &'static str {
        components::DYNAMIC_STATE
    }

    fn on_interact(&self, ev: &InteractEvent, reg: &BlockRegistry, world: &dyn GridView) -> Effects {
        if !ev.actor.sneaking {
            return Effects::none();
        }
        plan_dynamic_cycle(world, reg, ev.pos)
    }
}

pub struct SwitchBehavior;

impl Behavior for SwitchBehavior {
    fn id(&self) -> &'static str {
        components::SWITCH
    }

    fn on_interact(&self, ev: &InteractEvent, reg: &BlockRegistry, world: &dyn GridView) -> Effects {
        if ev.actor.sneaking {
            return Effects::none();
        }
        plan_switch_cycle(world, reg, ev.pos)
    }
}

/// Indexed multi-cell structures: atomic placement and whole-structure
/// teardown.
pub struct MultiblockBehavior;

impl Behavior for MultiblockBehavior {
    fn id(&self) -> &'static str {
        components::MULTIBLOCK
    }

    fn on_place(&self, ev: &PlaceEvent, reg: &BlockRegistry, world: &dyn GridView) -> Effects {
        let Some(actor) = ev.actor else {
            return Effects::none();
        };
        let Some(ty) = reg.get(ev.proposed.id) else {
            return Effects::none();
        };
        let Some(desc) = ty.multiblock.as_ref() else {
            return Effects::none();
        };
        let orientation = Orientation::of_cell(ty, ev.proposed.state);
        if desc.rotate && orientation.is_none() {
            log::debug!(
                target: "structures",
                "{} at {} has no facing; leaving placement to the grid",
                ty.name,
                ev.pos
            );
            return Effects::none();
        }
        let orientation = if desc.rotate { orientation } else { None };

        let Some(targets) = placement_targets(ev.pos, desc.size, orientation) else {
            let mut effects = Effects::cancel();
            effects
                .diagnostics
                .push(StructureError::ValidationFailure { pos: ev.pos, found: None });
            return effects;
        };
        if let Err(e) = validate_placement(world, reg, &targets) {
            let mut effects = Effects::cancel();
            effects.diagnostics.push(e);
            return effects;
        }

        let captured = capture_states(ty, ev.proposed.state);
        let rotation = actor.rotation() as i64;
        let dynamic = ty
            .state_int(ev.proposed.state, states::DYNAMIC_STATE)
            .unwrap_or(0);
        let face = ty.state_prop_value(ev.proposed.state, states::BLOCK_FACE);
        let transform: MemberTransform<'_> = &|ty, mut state, _| {
            if let Some(s) = ty.with_state_int(state, states::ROTATION, rotation) {
                state = s;
            }
            if let Some(s) = ty.with_state_int(state, states::DYNAMIC_STATE, dynamic) {
                state = s;
            }
            if let Some(s) = face.and_then(|f| ty.with_state_value(state, states::BLOCK_FACE, f)) {
                state = s;
            }
            state
        };
        write_structure(ty, desc, &captured, &targets, Some(transform))
    }

    fn on_break(&self, ev: &BreakEvent, reg: &BlockRegistry, world: &dyn GridView) -> Effects {
        let Some(ty) = reg.get(ev.broken.id) else {
            return Effects::none();
        };
        let Some(desc) = ty.multiblock.as_ref() else {
            return Effects::none();
        };
        if desc.rotate && Orientation::of_cell(ty, ev.broken.state).is_none() {
            return Effects::none();
        }
        plan_erase(world, reg, ev.pos, ev.broken).unwrap_or_else(Effects::diagnostic)
    }
}

/// Two-cell vertical pair placement.
pub struct LegacyMultiblockBehavior;

impl Behavior for LegacyMultiblockBehavior {
    fn id(&self) -> &'static str {
        components::LEGACY_MULTIBLOCK
    }

    fn on_place(&self, ev: &PlaceEvent, reg: &BlockRegistry, world: &dyn GridView) -> Effects {
        let Some(actor) = ev.actor else {
            return Effects::none();
        };
        let Some(ty) = reg.get(ev.proposed.id) else {
            return Effects::none();
        };
        if !faces_up(ty, ev.proposed.state) {
            return Effects::none();
        }
        plan_legacy_place(world, reg, ev.pos, ev.proposed, actor.id, actor.rotation())
    }
}

/// Two-cell vertical pair teardown.
pub struct MultidestroyBehavior;

impl Behavior for MultidestroyBehavior {
    fn id(&self) -> &'static str {
        components::MULTIDESTROY
    }

    fn on_break(&self, ev: &BreakEvent, reg: &BlockRegistry, world: &dyn GridView) -> Effects {
        plan_legacy_break(world, reg, ev.pos, ev.broken)
    }
}

/// Behaviors by identifier.
#[derive(Clone, Default)]
pub struct BehaviorTable {
    by_id: HashMap<&'static str, Arc<dyn Behavior>>,
}

impl BehaviorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding every behavior shipped with this crate.
    pub fn with_builtin() -> Self {
        let mut table = Self::new();
        table.register(Arc::new(RotationBehavior));
        table.register(Arc::new(DynamicStateBehavior));
        table.register(Arc::new(SwitchBehavior));
        table.register(Arc::new(MultiblockBehavior));
        table.register(Arc::new(LegacyMultiblockBehavior));
        table.register(Arc::new(MultidestroyBehavior));
        table
    }

    /// Registers `behavior`, replacing any previous one with the same id.
    pub fn register(&mut self, behavior: Arc<dyn Behavior>) {
        self.by_id.insert(behavior.id(), behavior);
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Behavior>> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// The behaviors a type declares, in declaration order. Unknown ids are
    /// skipped.
    pub fn behaviors_for<'a>(&'a self, ty: &'a BlockType) -> impl Iterator<Item = &'a Arc<dyn Behavior>> + 'a {
        ty.components.iter().filter_map(move |c| {
            let found = self.by_id.get(c.as_str());
            if found.is_none() {
                log::trace!(target: "dispatch", "{}: no behavior registered for `{}`", ty.name, c);
            }
            found
        })
    }
}

/// Folds one behavior's place outcome into the running outcome: a cancel
/// sticks, otherwise a replacement wins over proceeding.
pub fn merge_outcome(acc: PlaceOutcome, next: PlaceOutcome) -> PlaceOutcome {
    match (acc, next) {
        (PlaceOutcome::Cancel, _) | (_, PlaceOutcome::Cancel) => PlaceOutcome::Cancel,
        (_, PlaceOutcome::Replace(b)) => PlaceOutcome::Replace(b),
        (acc, PlaceOutcome::Proceed) => acc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_sticky() {
        let b = Block::new(3, 1);
        assert_eq!(merge_outcome(PlaceOutcome::Cancel, PlaceOutcome::Replace(b)), PlaceOutcome::Cancel);
        assert_eq!(merge_outcome(PlaceOutcome::Replace(b), PlaceOutcome::Cancel), PlaceOutcome::Cancel);
        assert_eq!(merge_outcome(PlaceOutcome::Proceed, PlaceOutcome::Replace(b)), PlaceOutcome::Replace(b));
        assert_eq!(merge_outcome(PlaceOutcome::Replace(b), PlaceOutcome::Proceed), PlaceOutcome::Replace(b));
        assert_eq!(merge_outcome(PlaceOutcome::Proceed, PlaceOutcome::Proceed), PlaceOutcome::Proceed);
    }

    #[test]
    fn builtin_table_has_every_component() {
        let table = BehaviorTable::with_builtin();
        assert_eq!(table.len(), 6);
        for id in [
            components::ROTATION,
            components::DYNAMIC_STATE,
            components::SWITCH,
            components::MULTIBLOCK,
            components::LEGACY_MULTIBLOCK,
            components::MULTIDESTROY,
        ] {
            assert_eq!(table.get(id).map(|b| b.id()), Some(id));
        }
    }
}
