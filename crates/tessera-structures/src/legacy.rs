//! Two-cell vertical pairs identified only by their `variant` slot
//! (1 = lower, 2 = upper). Kept for content placed before indexed
//! structures existed.

use tessera_blocks::states::{self, FACE_UP};
use tessera_blocks::{Block, BlockRegistry, BlockType};
use tessera_geom::CellPos;
use tessera_world::GridView;

use crate::behavior::ActorId;
use crate::effects::{Effects, Mutation, PlaceOutcome};

/// Lower half of a pair.
pub const VARIANT_BASE: i64 = 1;
/// Upper half of a pair.
pub const VARIANT_TOP: i64 = 2;

// Applies `value` to `slot` when the type declares it; otherwise leaves the state.
fn best_effort(ty: &BlockType, block: Block, slot: &str, value: &str) -> Block {
    match ty.with_state_value(block.state, slot, value) {
        Some(s) => block.with_state(s),
        None => block,
    }
}

/// A freshly created half: default state, then variant, a reset dynamic
/// state, rotation and face.
fn fresh_half(ty: &BlockType, variant: i64, rotation: u8, face: Option<&str>) -> Block {
    let mut b = Block::new(ty.id, 0);
    b = best_effort(ty, b, states::VARIANT, &variant.to_string());
    b = best_effort(ty, b, states::DYNAMIC_STATE, "0");
    b = best_effort(ty, b, states::ROTATION, &rotation.to_string());
    if let Some(face) = face {
        b = best_effort(ty, b, states::BLOCK_FACE, face);
    }
    b
}

#[inline]
fn is_empty(world: &dyn GridView, reg: &BlockRegistry, p: CellPos) -> Option<bool> {
    world.block_at(p).map(|b| reg.is_air(b))
}

/// Plans placement of a pair half at `pos`.
///
/// If the cell above is empty the placement becomes the lower half and the
/// upper half follows next tick; failing that, the same with the cell below.
/// Otherwise the first free column in the surrounding ring receives both
/// halves, the actor pays one held item for it, and the original placement
/// is cancelled regardless of whether a column was found.
pub fn plan_legacy_place(
    world: &dyn GridView,
    reg: &BlockRegistry,
    pos: CellPos,
    proposed: Block,
    actor: ActorId,
    rotation: u8,
) -> Effects {
    let Some(ty) = reg.get(proposed.id) else {
        return Effects::none();
    };
    let (Some(above), Some(below)) = (pos.above(), pos.below()) else {
        return Effects::none();
    };
    let (Some(above_empty), Some(below_empty)) = (
        is_empty(world, reg, above),
        is_empty(world, reg, below),
    ) else {
        return Effects::none();
    };
    let rotation_value = rotation.to_string();

    if above_empty {
        let face = ty.state_prop_value(proposed.state, states::BLOCK_FACE);
        let mut effects = Effects::none();
        effects.deferred.push(Mutation::Set {
            pos: above,
            block: fresh_half(ty, VARIANT_TOP, rotation, face),
        });
        let placed = best_effort(ty, proposed, states::ROTATION, &rotation_value);
        effects.outcome = PlaceOutcome::Replace(best_effort(
            ty,
            placed,
            states::VARIANT,
            &VARIANT_BASE.to_string(),
        ));
        return effects;
    }

    if below_empty {
        let mut effects = Effects::none();
        effects.deferred.push(Mutation::Set {
            pos: below,
            block: fresh_half(ty, VARIANT_BASE, rotation, Some(FACE_UP)),
        });
        let mut placed = best_effort(ty, proposed, states::ROTATION, &rotation_value);
        placed = best_effort(ty, placed, states::VARIANT, &VARIANT_TOP.to_string());
        placed = best_effort(ty, placed, states::BLOCK_FACE, FACE_UP);
        effects.outcome = PlaceOutcome::Replace(placed);
        return effects;
    }

    let mut effects = Effects::cancel();
    let free = pos.horizontal_ring().find_map(|p| {
        let top = p.above()?;
        let clear = is_empty(world, reg, p) == Some(true)
            && is_empty(world, reg, top) == Some(true);
        clear.then_some((p, top))
    });
    if let Some((base, top)) = free {
        effects.deferred.push(Mutation::Set {
            pos: top,
            block: fresh_half(ty, VARIANT_TOP, rotation, Some(FACE_UP)),
        });
        effects.deferred.push(Mutation::Set {
            pos: base,
            block: fresh_half(ty, VARIANT_BASE, rotation, Some(FACE_UP)),
        });
        effects.deferred.push(Mutation::ConsumeHeldItem { actor });
    }
    effects
}

/// Clears the other half of a broken pair right away, whatever it holds.
pub fn plan_legacy_break(
    world: &dyn GridView,
    reg: &BlockRegistry,
    pos: CellPos,
    broken: Block,
) -> Effects {
    let Some(ty) = reg.get(broken.id) else {
        return Effects::none();
    };
    let partner = match ty.state_int(broken.state, states::VARIANT) {
        Some(VARIANT_BASE) => pos.above(),
        Some(VARIANT_TOP) => pos.below(),
        _ => None,
    };
    let Some(partner) = partner else {
        return Effects::none();
    };
    let mut effects = Effects::none();
    if world.block_at(partner).is_some() {
        effects.immediate.push(Mutation::Set {
            pos: partner,
            block: reg.air(),
        });
    }
    effects
}
