use std::fmt;

use tessera_blocks::BlockId;
use tessera_geom::CellPos;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructureError {
    /// A target cell is unloaded (`found == None`) or holds a type outside
    /// the replaceable set.
    ValidationFailure { pos: CellPos, found: Option<BlockId> },
    /// One member cell could not be written; the others still were.
    PartialWriteFailure { pos: CellPos, reason: String },
    /// No structure could be derived from the cell at `pos`.
    ResolutionFailure { pos: CellPos },
    /// The regenerated footprint did not resolve to the full cell count.
    ConsistencyAbort {
        anchor: CellPos,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::ValidationFailure { pos, found: None } => {
                write!(f, "target {} is not loaded", pos)
            }
            StructureError::ValidationFailure {
                pos,
                found: Some(id),
            } => write!(f, "target {} holds non-replaceable type {}", pos, id),
            StructureError::PartialWriteFailure { pos, reason } => {
                write!(f, "member write at {} failed: {}", pos, reason)
            }
            StructureError::ResolutionFailure { pos } => {
                write!(f, "no structure resolvable from {}", pos)
            }
            StructureError::ConsistencyAbort {
                anchor,
                expected,
                found,
            } => write!(
                f,
                "structure anchored at {} resolved {} of {} cells; teardown skipped",
                anchor, found, expected
            ),
        }
    }
}

impl std::error::Error for StructureError {}
