use tessera_blocks::{Block, BlockId};
use tessera_geom::CellPos;

use crate::behavior::ActorId;
use crate::error::StructureError;

/// A single grid or host side effect produced by a handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Set { pos: CellPos, block: Block },
    /// Write `block` only if the cell still holds type `expect` when applied.
    SetIfType {
        pos: CellPos,
        expect: BlockId,
        block: Block,
    },
    PlaySound { sound: &'static str, at: CellPos },
    ConsumeHeldItem { actor: ActorId },
}

impl Mutation {
    /// Grid coordinate this mutation is ordered by.
    pub fn position(&self) -> Option<CellPos> {
        match self {
            Mutation::Set { pos, .. } | Mutation::SetIfType { pos, .. } => Some(*pos),
            Mutation::PlaySound { at, .. } => Some(*at),
            Mutation::ConsumeHeldItem { .. } => None,
        }
    }
}

/// What happens to the grid's own single-cell placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaceOutcome {
    #[default]
    Proceed,
    /// Proceed, but place this block instead of the proposed one.
    Replace(Block),
    /// Suppress the default placement.
    Cancel,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effects {
    pub outcome: PlaceOutcome,
    /// Applied inline, before the handler returns control to the host.
    pub immediate: Vec<Mutation>,
    /// Applied after the triggering event, before the next one.
    pub deferred: Vec<Mutation>,
    pub diagnostics: Vec<StructureError>,
}

impl Effects {
    #[inline]
    pub fn none() -> Self {
        Self::default()
    }

    pub fn cancel() -> Self {
        Self {
            outcome: PlaceOutcome::Cancel,
            ..Self::default()
        }
    }

    pub fn replace(block: Block) -> Self {
        Self {
            outcome: PlaceOutcome::Replace(block),
            ..Self::default()
        }
    }

    pub fn diagnostic(err: StructureError) -> Self {
        Self {
            diagnostics: vec![err],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outcome == PlaceOutcome::Proceed
            && self.immediate.is_empty()
            && self.deferred.is_empty()
            && self.diagnostics.is_empty()
    }
}
