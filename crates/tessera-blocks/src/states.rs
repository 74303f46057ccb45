//! Well-known state slot, tag and behavior names.

pub const MULTIBLOCK_INDEX: &str = "tessera:multiblock_index";
pub const DYNAMIC_STATE: &str = "tessera:dynamic_state";
pub const SWITCH: &str = "tessera:switch";
pub const ROTATION: &str = "tessera:rotation";
pub const VARIANT: &str = "tessera:variant";
pub const CARDINAL_DIRECTION: &str = "cardinal_direction";
pub const BLOCK_FACE: &str = "block_face";

pub const FACE_UP: &str = "up";

pub mod tags {
    pub const SIX_STATES: &str = "six_states";
    pub const FIVE_STATES: &str = "five_states";
    pub const FOUR_STATES: &str = "four_states";
    pub const THREE_STATES: &str = "three_states";
    pub const THREE_SWITCH: &str = "three_switch";
}

pub mod components {
    pub const ROTATION: &str = "tessera:rotation";
    pub const DYNAMIC_STATE: &str = "tessera:dynamic_state";
    pub const SWITCH: &str = "tessera:switch";
    pub const MULTIBLOCK: &str = "tessera:multiblock";
    pub const LEGACY_MULTIBLOCK: &str = "tessera:legacy_multiblock";
    pub const MULTIDESTROY: &str = "tessera:multidestroy";
}
