use tessera_blocks::states::{self, tags};
use tessera_blocks::{Block, BlockRegistry, BlockType};
use tessera_geom::CellPos;
use tessera_world::GridView;

use crate::anchor::resolve_structure;
use crate::effects::{Effects, Mutation};

/// Cycle length of the dynamic state counter, from the type's tags.
pub fn max_states(ty: &BlockType) -> i64 {
    if ty.has_tag(tags::SIX_STATES) {
        6
    } else if ty.has_tag(tags::FIVE_STATES) {
        5
    } else if ty.has_tag(tags::FOUR_STATES) {
        4
    } else if ty.has_tag(tags::THREE_STATES) {
        3
    } else {
        2
    }
}

#[inline]
pub fn next_state(current: i64, max_states: i64) -> i64 {
    (current + 1).rem_euclid(max_states.max(1))
}

/// Cycle length of the switch counter, from the type's tags.
pub fn max_switch(ty: &BlockType) -> i64 {
    if ty.has_tag(tags::THREE_SWITCH) {
        3
    } else {
        // `two_switch` and untagged types share the default.
        2
    }
}

#[inline]
pub fn next_switch(current: i64, max_switch: i64) -> i64 {
    (current + 1).rem_euclid(max_switch.max(1))
}

// Writes `value` into `slot` of the live block at `pos` if its type supports it.
fn try_set_int(
    reg: &BlockRegistry,
    pos: CellPos,
    block: Block,
    slot: &str,
    value: i64,
) -> Option<Mutation> {
    let ty = reg.get(block.id)?;
    let state = ty.with_state_int(block.state, slot, value)?;
    Some(Mutation::Set {
        pos,
        block: block.with_state(state),
    })
}

/// Advances the dynamic state of the cell at `pos`, and of every cell that
/// shares it: all same-typed members of its structure, or both halves of a
/// legacy pair.
pub fn plan_dynamic_cycle(world: &dyn GridView, reg: &BlockRegistry, pos: CellPos) -> Effects {
    let Some(block) = world.block_at(pos) else {
        return Effects::none();
    };
    let Some(ty) = reg.get(block.id) else {
        return Effects::none();
    };
    let Some(current) = ty.state_int(block.state, states::DYNAMIC_STATE) else {
        return Effects::none();
    };
    let new_state = next_state(current, max_states(ty));
    let mut effects = Effects::none();

    if ty.multiblock.is_some() || ty.declares_state(states::MULTIBLOCK_INDEX) {
        match resolve_structure(world, reg, pos) {
            Ok(view) => {
                effects.immediate = view
                    .members
                    .iter()
                    .filter_map(|&p| {
                        let b = world.block_at(p)?;
                        if b.id != block.id {
                            return None;
                        }
                        try_set_int(reg, p, b, states::DYNAMIC_STATE, new_state)
                    })
                    .collect();
            }
            Err(e) => effects.diagnostics.push(e),
        }
        return effects;
    }

    match ty.state_int(block.state, states::VARIANT) {
        Some(variant @ (1 | 2)) => {
            let base_pos = if variant == 1 { Some(pos) } else { pos.below() };
            let Some(base_pos) = base_pos else {
                return effects;
            };
            let Some(base) = world.block_at(base_pos) else {
                return effects;
            };
            let Some(base_ty) = reg.get(base.id) else {
                return effects;
            };
            let base_current = base_ty
                .state_int(base.state, states::DYNAMIC_STATE)
                .unwrap_or(0);
            let base_new = next_state(base_current, max_states(base_ty));
            effects
                .immediate
                .extend(try_set_int(reg, base_pos, base, states::DYNAMIC_STATE, base_new));
            if let Some((top_pos, top)) = base_pos
                .above()
                .and_then(|p| world.block_at(p).map(|b| (p, b)))
            {
                effects
                    .immediate
                    .extend(try_set_int(reg, top_pos, top, states::DYNAMIC_STATE, base_new));
            }
        }
        _ => {
            effects
                .immediate
                .extend(try_set_int(reg, pos, block, states::DYNAMIC_STATE, new_state));
        }
    }
    effects
}

/// Advances the switch counter of the single cell at `pos`.
pub fn plan_switch_cycle(world: &dyn GridView, reg: &BlockRegistry, pos: CellPos) -> Effects {
    let Some(block) = world.block_at(pos) else {
        return Effects::none();
    };
    let Some(ty) = reg.get(block.id) else {
        return Effects::none();
    };
    let Some(current) = ty.state_int(block.state, states::SWITCH) else {
        return Effects::none();
    };
    let mut effects = Effects::none();
    effects.immediate.extend(try_set_int(
        reg,
        pos,
        block,
        states::SWITCH,
        next_switch(current, max_switch(ty)),
    ));
    effects
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_state_wraps_at_bound() {
        assert_eq!(next_state(3, 4), 0);
        assert_eq!(next_state(1, 4), 2);
        assert_eq!(next_state(0, 2), 1);
        assert_eq!(next_state(5, 6), 0);
    }

    #[test]
    fn switch_wraps_at_bound() {
        assert_eq!(next_switch(1, 2), 0);
        assert_eq!(next_switch(1, 3), 2);
        assert_eq!(next_switch(2, 3), 0);
    }

    #[test]
    fn degenerate_bound_does_not_panic() {
        assert_eq!(next_state(4, 0), 0);
    }
}
