use serde::{Deserialize, Serialize};

// Compact cell representation: type id plus packed state values
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub state: BlockState,
}

pub type BlockId = u16;
pub type BlockState = u32;

impl Block {
    pub const AIR: Block = Block { id: 0, state: 0 };

    #[inline]
    pub const fn new(id: BlockId, state: BlockState) -> Self {
        Self { id, state }
    }

    #[inline]
    pub fn with_state(self, state: BlockState) -> Self {
        Self { id: self.id, state }
    }
}

/// Static layout of a multi-cell structure, shared by every placed instance
/// of one block type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiblockDescriptor {
    /// Width, height, depth in cells.
    pub size: [u32; 3],
    /// State slot holding each member's linear index.
    pub index: String,
    pub rotate: bool,
}

impl MultiblockDescriptor {
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.size.iter().map(|&s| s as usize).product()
    }
}
