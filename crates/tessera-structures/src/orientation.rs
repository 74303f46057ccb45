use tessera_blocks::states::CARDINAL_DIRECTION;
use tessera_blocks::{BlockState, BlockType};
use tessera_geom::CellPos;

/// Horizontal rotation class of a structure. `None` at use sites means
/// unrotated.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    #[inline]
    pub fn from_cardinal(s: &str) -> Option<Orientation> {
        match s {
            "north" => Some(Orientation::North),
            "east" => Some(Orientation::East),
            "south" => Some(Orientation::South),
            "west" => Some(Orientation::West),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::North => "north",
            Orientation::East => "east",
            Orientation::South => "south",
            Orientation::West => "west",
        }
    }

    /// Orientation stored in a cell's cardinal direction slot, if any.
    pub fn of_cell(ty: &BlockType, state: BlockState) -> Option<Orientation> {
        ty.state_prop_value(state, CARDINAL_DIRECTION)
            .and_then(Orientation::from_cardinal)
    }
}

/// Maps a local structure coordinate into grid offsets under `orientation`.
///
/// These four formulas are used for both generation and inversion; they are
/// not derived from one another.
#[inline]
pub fn rotate_local(orientation: Option<Orientation>, x: i32, y: i32, z: i32) -> CellPos {
    match orientation {
        Some(Orientation::South) => CellPos::new(-x, y, z),
        Some(Orientation::West) => CellPos::new(-z, y, -x),
        Some(Orientation::North) => CellPos::new(x, y, -z),
        Some(Orientation::East) => CellPos::new(z, y, x),
        None => CellPos::new(x, y, z),
    }
}

/// Converts a horizontal look angle in degrees to a 16-step rotation value.
pub fn yaw_to_rotation(yaw_deg: f32) -> u8 {
    let yaw = yaw_deg.rem_euclid(360.0);
    let step = (yaw / 22.5).round() as u8;
    if step >= 16 { 0 } else { step }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_parsing() {
        assert_eq!(Orientation::from_cardinal("east"), Some(Orientation::East));
        assert_eq!(Orientation::from_cardinal("up"), None);
        assert_eq!(Orientation::from_cardinal("North"), None);
        for o in [
            Orientation::North,
            Orientation::East,
            Orientation::South,
            Orientation::West,
        ] {
            assert_eq!(Orientation::from_cardinal(o.as_str()), Some(o));
        }
    }

    #[test]
    fn yaw_wraps_and_rounds() {
        assert_eq!(yaw_to_rotation(-10.0), 0);
        assert_eq!(yaw_to_rotation(11.0), 0);
        assert_eq!(yaw_to_rotation(12.0), 1);
        assert_eq!(yaw_to_rotation(90.0), 4);
        assert_eq!(yaw_to_rotation(-90.0), 12);
        assert_eq!(yaw_to_rotation(180.0), 8);
        assert_eq!(yaw_to_rotation(359.0), 0);
        assert_eq!(yaw_to_rotation(337.5), 15);
    }

    #[test]
    fn rotations_fix_the_vertical_axis() {
        for o in [
            None,
            Some(Orientation::North),
            Some(Orientation::East),
            Some(Orientation::South),
            Some(Orientation::West),
        ] {
            assert_eq!(rotate_local(o, 0, 5, 0), CellPos::new(0, 5, 0));
        }
        assert_eq!(rotate_local(Some(Orientation::West), 1, 0, 2), CellPos::new(-2, 0, -1));
        assert_eq!(rotate_local(Some(Orientation::East), 1, 0, 2), CellPos::new(2, 0, 1));
    }
}
