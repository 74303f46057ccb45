//! Integer grid coordinates shared by the engine crates.
#![forbid(unsafe_code)]

use core::fmt;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A cell coordinate (or a cell offset) in the voxel grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellPos {
    pub const ZERO: CellPos = CellPos { x: 0, y: 0, z: 0 };
    pub const UP: CellPos = CellPos { x: 0, y: 1, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise sum, or `None` if any axis leaves the `i32` range.
    #[inline]
    pub fn checked_add(self, rhs: CellPos) -> Option<CellPos> {
        Some(CellPos::new(
            self.x.checked_add(rhs.x)?,
            self.y.checked_add(rhs.y)?,
            self.z.checked_add(rhs.z)?,
        ))
    }

    #[inline]
    pub fn checked_sub(self, rhs: CellPos) -> Option<CellPos> {
        Some(CellPos::new(
            self.x.checked_sub(rhs.x)?,
            self.y.checked_sub(rhs.y)?,
            self.z.checked_sub(rhs.z)?,
        ))
    }

    /// The cell directly above; `None` at the top of the coordinate range.
    #[inline]
    pub fn above(self) -> Option<CellPos> {
        self.checked_add(Self::UP)
    }

    #[inline]
    pub fn below(self) -> Option<CellPos> {
        self.checked_sub(Self::UP)
    }

    /// Region key of this coordinate for a given region edge length.
    #[inline]
    pub fn region_key(self, sx: i32, sy: i32, sz: i32) -> (i32, i32, i32) {
        (
            self.x.div_euclid(sx),
            self.y.div_euclid(sy),
            self.z.div_euclid(sz),
        )
    }

    /// The eight horizontal neighbors at the same height, x outer and z inner,
    /// skipping the center. Neighbors outside the `i32` range are left out.
    pub fn horizontal_ring(self) -> impl Iterator<Item = CellPos> {
        (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dz| (dx, dz)))
            .filter(|&(dx, dz)| dx != 0 || dz != 0)
            .filter_map(move |(dx, dz)| self.checked_add(CellPos::new(dx, 0, dz)))
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for CellPos {
    #[inline]
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[i32; 3]> for CellPos {
    #[inline]
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Add for CellPos {
    type Output = CellPos;
    #[inline]
    fn add(self, rhs: CellPos) -> CellPos {
        CellPos::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for CellPos {
    #[inline]
    fn add_assign(&mut self, rhs: CellPos) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for CellPos {
    type Output = CellPos;
    #[inline]
    fn sub(self, rhs: CellPos) -> CellPos {
        CellPos::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for CellPos {
    #[inline]
    fn sub_assign(&mut self, rhs: CellPos) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Neg for CellPos {
    type Output = CellPos;
    #[inline]
    fn neg(self) -> CellPos {
        CellPos::new(-self.x, -self.y, -self.z)
    }
}
