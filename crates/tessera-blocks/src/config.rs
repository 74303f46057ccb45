use serde::Deserialize;
use std::collections::HashMap;

// Cell types an incoming structure may overwrite when no list is configured.
pub const DEFAULT_REPLACEABLE: &[&str] = &[
    "air",
    "water",
    "flowing_water",
    "lava",
    "flowing_lava",
    "snow_layer",
    "tall_grass",
    "short_grass",
    "fern",
];

// Top-level blocks config file
#[derive(Deserialize, Debug)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
    // Types a structure placement may overwrite; defaults to DEFAULT_REPLACEABLE.
    #[serde(default)]
    pub replaceable: Option<Vec<String>>,
    // Name of the empty type used when clearing cells. Defaults to `air`.
    #[serde(default)]
    pub air_block: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub tags: Vec<String>,
    // Behavior identifiers wired to this type, run in declaration order
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub multiblock: Option<MultiblockDef>,
    #[serde(default)]
    pub state_schema: Option<HashMap<String, StateValues>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MultiblockDef {
    pub size: [u32; 3],
    pub index: String,
    #[serde(default = "default_rotate")]
    pub rotate: bool,
}

// State domains may be written as integers, booleans or strings
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum StateValues {
    Ints(Vec<i64>),
    Bools(Vec<bool>),
    Strings(Vec<String>),
}

impl StateValues {
    pub fn into_strings(self) -> Vec<String> {
        match self {
            StateValues::Ints(v) => v.into_iter().map(|i| i.to_string()).collect(),
            StateValues::Bools(v) => v.into_iter().map(|b| b.to_string()).collect(),
            StateValues::Strings(v) => v,
        }
    }
}

impl From<Vec<&str>> for StateValues {
    fn from(v: Vec<&str>) -> Self {
        StateValues::Strings(v.into_iter().map(String::from).collect())
    }
}

impl From<std::ops::Range<i64>> for StateValues {
    fn from(r: std::ops::Range<i64>) -> Self {
        StateValues::Ints(r.collect())
    }
}

fn default_rotate() -> bool {
    true
}
