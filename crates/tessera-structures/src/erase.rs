use tessera_blocks::{Block, BlockRegistry};
use tessera_geom::CellPos;
use tessera_world::GridView;

use crate::anchor::anchor_of_member;
use crate::effects::{Effects, Mutation};
use crate::error::StructureError;
use crate::footprint::footprint;

/// Plans the teardown of the structure `broken` (already removed from `pos`)
/// belonged to.
///
/// The clears are deferred and conditional: each remaining member is only
/// cleared if it still holds the broken type when the clear runs. If any
/// footprint cell is unloaded nothing is cleared.
pub fn plan_erase(
    world: &dyn GridView,
    reg: &BlockRegistry,
    pos: CellPos,
    broken: Block,
) -> Result<Effects, StructureError> {
    let (anchor, orientation, desc) = anchor_of_member(reg, pos, broken)?;
    // Members past the coordinate range count as unloaded.
    let targets: Vec<CellPos> = footprint(desc.size, orientation)
        .into_iter()
        .filter_map(|off| anchor.checked_add(off))
        .collect();
    let expected = desc.cell_count();
    let found = targets
        .iter()
        .filter(|&&p| world.block_at(p).is_some())
        .count();
    if found != expected {
        return Err(StructureError::ConsistencyAbort {
            anchor,
            expected,
            found,
        });
    }

    let air = reg.air();
    let mut effects = Effects::none();
    effects.deferred = targets
        .into_iter()
        .filter(|&p| p != pos)
        .map(|p| Mutation::SetIfType {
            pos: p,
            expect: broken.id,
            block: air,
        })
        .collect();
    Ok(effects)
}
