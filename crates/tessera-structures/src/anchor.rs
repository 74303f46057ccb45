use tessera_blocks::{Block, BlockId, BlockRegistry, BlockState, BlockType, MultiblockDescriptor};
use tessera_geom::CellPos;
use tessera_world::GridView;

use crate::error::StructureError;
use crate::footprint::{footprint_offset, placement_targets};
use crate::orientation::Orientation;

/// Orientation a structure member was laid out under. Rotating structures
/// need a stored cardinal direction; non-rotating ones are always unrotated.
pub fn structure_orientation(
    ty: &BlockType,
    state: BlockState,
    desc: &MultiblockDescriptor,
    pos: CellPos,
) -> Result<Option<Orientation>, StructureError> {
    if !desc.rotate {
        return Ok(None);
    }
    match Orientation::of_cell(ty, state) {
        Some(o) => Ok(Some(o)),
        None => Err(StructureError::ResolutionFailure { pos }),
    }
}

/// Anchor coordinate of the member at `pos` holding linear `index`.
pub fn resolve_anchor(
    pos: CellPos,
    index: Option<i64>,
    desc: &MultiblockDescriptor,
    orientation: Option<Orientation>,
) -> Option<CellPos> {
    let index = usize::try_from(index?).ok()?;
    if index == 0 {
        return Some(pos);
    }
    let off = footprint_offset(desc.size, orientation, index)?;
    pos.checked_sub(off)
}

/// Anchor coordinate for a member cell described by `block`, read from its
/// own stored index and direction.
pub fn anchor_of_member(
    reg: &BlockRegistry,
    pos: CellPos,
    block: Block,
) -> Result<(CellPos, Option<Orientation>, &MultiblockDescriptor), StructureError> {
    let unresolved = StructureError::ResolutionFailure { pos };
    let ty = reg.get(block.id).ok_or_else(|| unresolved.clone())?;
    let desc = ty.multiblock.as_ref().ok_or_else(|| unresolved.clone())?;
    let orientation = structure_orientation(ty, block.state, desc, pos)?;
    let index = ty.state_int(block.state, &desc.index);
    let anchor = resolve_anchor(pos, index, desc, orientation).ok_or(unresolved)?;
    Ok((anchor, orientation, desc))
}

/// A structure instance reconstructed from one of its member cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureView {
    pub block_id: BlockId,
    pub anchor: CellPos,
    pub orientation: Option<Orientation>,
    /// Member coordinates in linear index order.
    pub members: Vec<CellPos>,
}

/// Derives the structure the live cell at `pos` belongs to.
///
/// Fails closed: the anchor must be loaded, of the same type, and store
/// index 0, otherwise there is no structure to operate on.
pub fn resolve_structure(
    world: &dyn GridView,
    reg: &BlockRegistry,
    pos: CellPos,
) -> Result<StructureView, StructureError> {
    let unresolved = StructureError::ResolutionFailure { pos };
    let block = world.block_at(pos).ok_or_else(|| unresolved.clone())?;
    let (anchor, orientation, desc) = anchor_of_member(reg, pos, block)?;

    let anchor_block = world.block_at(anchor).ok_or_else(|| unresolved.clone())?;
    if anchor_block.id != block.id {
        return Err(unresolved);
    }
    let anchor_index = reg
        .get(anchor_block.id)
        .and_then(|ty| ty.state_int(anchor_block.state, &desc.index));
    if anchor_index != Some(0) {
        return Err(unresolved);
    }

    let members = placement_targets(anchor, desc.size, orientation).ok_or(unresolved)?;
    Ok(StructureView {
        block_id: block.id,
        anchor,
        orientation,
        members,
    })
}
