#![allow(dead_code)]

use std::collections::HashMap;

use tessera_blocks::{Block, BlockRegistry};
use tessera_geom::CellPos;
use tessera_structures::Actor;
use tessera_world::{GridBounds, GridWorld, SparseWorld};

pub const BLOCKS_TOML: &str = include_str!("../../../../assets/blocks.toml");

pub fn registry() -> BlockRegistry {
    BlockRegistry::from_toml_str(BLOCKS_TOML).expect("demo registry")
}

/// 16 x 16 x 16 world from (-8, 0, -8) filled with air.
pub fn world(reg: &BlockRegistry) -> SparseWorld {
    SparseWorld::new(
        GridBounds::new(CellPos::new(-8, 0, -8), CellPos::new(7, 15, 7)),
        reg.air(),
    )
}

pub fn block(reg: &BlockRegistry, name: &str, props: &[(&str, &str)]) -> Block {
    let props: HashMap<String, String> = props
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    reg.make_block_by_name(name, Some(&props))
        .unwrap_or_else(|e| panic!("{e}"))
}

pub fn put(world: &mut SparseWorld, p: CellPos, b: Block) {
    world.set_block(p, b).expect("in bounds");
}

pub fn int(reg: &BlockRegistry, b: Block, slot: &str) -> Option<i64> {
    reg.get(b.id)?.state_int(b.state, slot)
}

pub fn player(yaw_deg: f32, sneaking: bool) -> Actor {
    Actor {
        id: 7,
        yaw_deg,
        sneaking,
    }
}
