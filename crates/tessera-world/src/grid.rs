use std::fmt;

use tessera_blocks::Block;
use tessera_geom::CellPos;

/// Read access to the host grid.
pub trait GridView {
    /// The cell at `p`, or `None` when `p` is outside the loaded world.
    fn block_at(&self, p: CellPos) -> Option<Block>;
}

/// Write access to the host grid.
pub trait GridWorld: GridView {
    fn set_block(&mut self, p: CellPos, b: Block) -> Result<(), WorldError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldError {
    Unloaded(CellPos),
    Rejected(CellPos),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::Unloaded(p) => write!(f, "cell {} is not loaded", p),
            WorldError::Rejected(p) => write!(f, "write to cell {} was rejected", p),
        }
    }
}

impl std::error::Error for WorldError {}

impl<T: GridView + ?Sized> GridView for &T {
    fn block_at(&self, p: CellPos) -> Option<Block> {
        (**self).block_at(p)
    }
}

impl<T: GridView + ?Sized> GridView for &mut T {
    fn block_at(&self, p: CellPos) -> Option<Block> {
        (**self).block_at(p)
    }
}
