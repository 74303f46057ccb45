use hashbrown::{HashMap, HashSet};
use tessera_blocks::Block;
use tessera_geom::CellPos;

use crate::grid::{GridView, GridWorld, WorldError};

pub const REGION_SIZE: i32 = 16;

/// Inclusive cell bounds of the loaded world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridBounds {
    pub min: CellPos,
    pub max: CellPos,
}

impl GridBounds {
    pub const fn new(min: CellPos, max: CellPos) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, p: CellPos) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

#[derive(Default, Debug, Clone, Copy)]
pub struct SparseWorldStats {
    pub region_entries: usize,
    pub cell_entries: usize,
    pub protected_cells: usize,
    pub writes: u64,
}

/// Region-keyed sparse grid. Cells never written read back as `fill`;
/// cells outside `bounds` are unloaded.
pub struct SparseWorld {
    bounds: GridBounds,
    fill: Block,
    // Map per-region: key=(rx,ry,rz) -> map of world coords -> Block
    inner: HashMap<(i32, i32, i32), HashMap<CellPos, Block>>,
    protected: HashSet<CellPos>,
    writes: u64,
}

impl SparseWorld {
    pub fn new(bounds: GridBounds, fill: Block) -> Self {
        Self {
            bounds,
            fill,
            inner: HashMap::new(),
            protected: HashSet::new(),
            writes: 0,
        }
    }

    #[inline]
    pub fn region_key(p: CellPos) -> (i32, i32, i32) {
        p.region_key(REGION_SIZE, REGION_SIZE, REGION_SIZE)
    }

    /// Marks a cell as immutable: later writes to it are rejected.
    pub fn protect(&mut self, p: CellPos) {
        self.protected.insert(p);
    }

    pub fn stats(&self) -> SparseWorldStats {
        SparseWorldStats {
            region_entries: self.inner.len(),
            cell_entries: self.inner.values().map(|m| m.len()).sum(),
            protected_cells: self.protected.len(),
            writes: self.writes,
        }
    }

    /// Every stored cell that differs from `fill`, sorted by position.
    pub fn snapshot(&self) -> Vec<(CellPos, Block)> {
        let mut out: Vec<(CellPos, Block)> = self
            .inner
            .values()
            .flat_map(|m| m.iter().map(|(k, v)| (*k, *v)))
            .filter(|(_, b)| *b != self.fill)
            .collect();
        out.sort_by_key(|(p, _)| *p);
        out
    }
}

impl GridView for SparseWorld {
    fn block_at(&self, p: CellPos) -> Option<Block> {
        if !self.bounds.contains(p) {
            return None;
        }
        let k = Self::region_key(p);
        Some(
            self.inner
                .get(&k)
                .and_then(|m| m.get(&p).copied())
                .unwrap_or(self.fill),
        )
    }
}

impl GridWorld for SparseWorld {
    fn set_block(&mut self, p: CellPos, b: Block) -> Result<(), WorldError> {
        if !self.bounds.contains(p) {
            return Err(WorldError::Unloaded(p));
        }
        if self.protected.contains(&p) {
            return Err(WorldError::Rejected(p));
        }
        let k = Self::region_key(p);
        self.inner.entry(k).or_default().insert(p, b);
        self.writes += 1;
        Ok(())
    }
}
