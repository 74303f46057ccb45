use tessera_blocks::{Block, BlockRegistry, BlockState, BlockType, MultiblockDescriptor};
use tessera_geom::CellPos;
use tessera_world::GridView;

use crate::effects::{Effects, Mutation};
use crate::error::StructureError;

/// Audio cue threshold: structures with at least this many cells sound heavier.
pub const HEAVY_STRUCTURE_CELLS: usize = 8;

/// Checks every target is loaded and holds a replaceable type. The first
/// offending cell rejects the whole structure.
pub fn validate_placement(
    world: &dyn GridView,
    reg: &BlockRegistry,
    targets: &[CellPos],
) -> Result<(), StructureError> {
    for &pos in targets {
        match world.block_at(pos) {
            Some(b) if reg.is_replaceable(b.id) => {}
            Some(b) => {
                return Err(StructureError::ValidationFailure {
                    pos,
                    found: Some(b.id),
                });
            }
            None => return Err(StructureError::ValidationFailure { pos, found: None }),
        }
    }
    Ok(())
}

/// Snapshot of a proposed cell's state slots, keyed by slot name.
pub type CapturedStates = Vec<(String, String)>;

pub fn capture_states(ty: &BlockType, state: BlockState) -> CapturedStates {
    ty.state_pairs(state)
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Caller hook run on each member's state before it is committed.
pub type MemberTransform<'a> = &'a dyn Fn(&BlockType, BlockState, usize) -> BlockState;

/// Produces the writes for every member of a validated structure.
///
/// Member `i` gets the index slot set to `i`, then every captured slot the
/// type declares, then `transform`. A member whose index cannot be stored is
/// skipped and reported; the rest are still written. The default placement
/// is cancelled since every cell, anchor included, is written here.
pub fn write_structure(
    ty: &BlockType,
    desc: &MultiblockDescriptor,
    captured: &[(String, String)],
    targets: &[CellPos],
    transform: Option<MemberTransform<'_>>,
) -> Effects {
    let mut effects = Effects::cancel();
    for (i, &pos) in targets.iter().enumerate() {
        let Some(mut state) = ty.with_state_int(0, &desc.index, i as i64) else {
            effects.diagnostics.push(StructureError::PartialWriteFailure {
                pos,
                reason: format!("`{}` cannot hold index {}", desc.index, i),
            });
            continue;
        };
        for (key, value) in captured {
            if key == &desc.index || !ty.declares_state(key) {
                continue;
            }
            if let Some(s) = ty.with_state_value(state, key, value) {
                state = s;
            }
        }
        if let Some(f) = transform {
            state = f(ty, state, i);
        }
        effects.immediate.push(Mutation::Set {
            pos,
            block: Block::new(ty.id, state),
        });
    }
    if let Some(&anchor) = targets.first() {
        let sound = if targets.len() >= HEAVY_STRUCTURE_CELLS {
            "dig.stone"
        } else {
            "dig.wood"
        };
        effects.deferred.push(Mutation::PlaySound { sound, at: anchor });
    }
    effects
}
