use tessera_geom::CellPos;

use crate::orientation::{Orientation, rotate_local};

/// Ordered offsets of a structure of `size = [w, h, d]` relative to its
/// anchor. Height is the outer loop, then depth, then width; the position
/// in the returned list is the member's linear index.
pub fn footprint(size: [u32; 3], orientation: Option<Orientation>) -> Vec<CellPos> {
    let [w, h, d] = size.map(|s| s as i32);
    let mut out = Vec::with_capacity((w * h * d).max(0) as usize);
    for y in 0..h {
        for z in 0..d {
            for x in 0..w {
                out.push(rotate_local(orientation, x, y, z));
            }
        }
    }
    out
}

/// Offset of the member at linear `index`, or `None` when out of range.
pub fn footprint_offset(
    size: [u32; 3],
    orientation: Option<Orientation>,
    index: usize,
) -> Option<CellPos> {
    let [w, h, d] = size.map(|s| s as usize);
    if index >= w * h * d {
        return None;
    }
    let x = index % w;
    let z = (index / w) % d;
    let y = index / (w * d);
    Some(rotate_local(orientation, x as i32, y as i32, z as i32))
}

/// Absolute coordinates covered by a structure anchored at `anchor`, or
/// `None` if any member falls outside the coordinate range.
pub fn placement_targets(
    anchor: CellPos,
    size: [u32; 3],
    orientation: Option<Orientation>,
) -> Option<Vec<CellPos>> {
    footprint(size, orientation)
        .into_iter()
        .map(|off| anchor.checked_add(off))
        .collect()
}
