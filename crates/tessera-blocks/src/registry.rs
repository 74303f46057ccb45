use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use super::config::{BlockDef, BlocksConfig, DEFAULT_REPLACEABLE, StateValues};
use super::types::{Block, BlockId, BlockState, MultiblockDescriptor};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateName(String),
    DuplicateId {
        id: BlockId,
        first: String,
        second: String,
    },
    StateTooWide {
        block: String,
        bits: u32,
    },
    MissingIndexState {
        block: String,
        index: String,
    },
    IndexDomainMismatch {
        block: String,
        index: String,
        expected: usize,
        found: usize,
    },
    EmptyStructure(String),
    MissingBlock(String),
    UnknownStateValue {
        block: String,
        slot: String,
        value: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateName(name) => write!(f, "block `{}` defined twice", name),
            RegistryError::DuplicateId { id, first, second } => {
                write!(f, "blocks `{}` and `{}` both claim id {}", first, second, id)
            }
            RegistryError::StateTooWide { block, bits } => {
                write!(f, "block `{}` needs {} state bits (max 32)", block, bits)
            }
            RegistryError::MissingIndexState { block, index } => write!(
                f,
                "block `{}` uses index state `{}` which is not in its state_schema",
                block, index
            ),
            RegistryError::IndexDomainMismatch {
                block,
                index,
                expected,
                found,
            } => write!(
                f,
                "block `{}`: index state `{}` declares {} values but the structure has {} cells",
                block, index, found, expected
            ),
            RegistryError::EmptyStructure(block) => {
                write!(f, "block `{}` declares a structure with a zero-sized axis", block)
            }
            RegistryError::MissingBlock(name) => write!(f, "required block `{}` is not defined", name),
            RegistryError::UnknownStateValue { block, slot, value } => write!(
                f,
                "block `{}` has no state `{}` = `{}`",
                block, slot, value
            ),
        }
    }
}

impl Error for RegistryError {}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
    pub air_id: BlockId,
    replaceable: HashSet<BlockId>,
}

impl BlockRegistry {
    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn air(&self) -> Block {
        Block::new(self.air_id, 0)
    }

    #[inline]
    pub fn is_air(&self, b: Block) -> bool {
        b.id == self.air_id
    }

    #[inline]
    pub fn is_replaceable(&self, id: BlockId) -> bool {
        self.replaceable.contains(&id)
    }

    pub fn load_from_path(blocks_path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let blocks_toml = fs::read_to_string(blocks_path)?;
        Self::from_toml_str(&blocks_toml)
    }

    pub fn from_toml_str(blocks_toml: &str) -> Result<Self, Box<dyn Error>> {
        let blocks_cfg: BlocksConfig = toml::from_str(blocks_toml)?;
        Ok(Self::from_configs(blocks_cfg)?)
    }

    pub fn from_configs(cfg: BlocksConfig) -> Result<Self, RegistryError> {
        let mut reg = BlockRegistry::default();
        let mut seen: HashSet<String> = HashSet::new();
        for def in cfg.blocks.into_iter() {
            if !seen.insert(def.name.clone()) {
                return Err(RegistryError::DuplicateName(def.name));
            }
            let id = def.id.unwrap_or(reg.blocks.len() as u16);
            if let Some(taken) = reg.blocks.get(id as usize).filter(|t| !t.name.is_empty()) {
                return Err(RegistryError::DuplicateId {
                    id,
                    first: taken.name.clone(),
                    second: def.name,
                });
            }
            let ty = compile_block(id, def)?;
            if reg.blocks.len() <= id as usize {
                reg.blocks
                    .resize(id as usize + 1, BlockType::placeholder(id));
            }
            reg.blocks[id as usize] = ty;
        }
        reg.by_name = reg
            .blocks
            .iter()
            .filter(|t| !t.name.is_empty())
            .map(|t| (t.name.clone(), t.id))
            .collect();

        let air_name = cfg.air_block.unwrap_or_else(|| "air".to_string());
        reg.air_id = reg
            .id_by_name(&air_name)
            .ok_or(RegistryError::MissingBlock(air_name))?;

        // Replaceable names missing from this registry are simply not placeable-over.
        reg.replaceable = match cfg.replaceable {
            Some(names) => names.iter().filter_map(|n| reg.id_by_name(n)).collect(),
            None => DEFAULT_REPLACEABLE
                .iter()
                .filter_map(|n| reg.id_by_name(n))
                .collect(),
        };
        Ok(reg)
    }

    /// Builds a cell of the named type with the given slot values; slots
    /// left out keep their first value.
    pub fn make_block_by_name(
        &self,
        name: &str,
        props: Option<&HashMap<String, String>>,
    ) -> Result<Block, RegistryError> {
        let ty = self
            .id_by_name(name)
            .and_then(|id| self.get(id))
            .ok_or_else(|| RegistryError::MissingBlock(name.to_string()))?;
        let state = match props {
            Some(p) => ty.pack_state(p)?,
            None => 0,
        };
        Ok(Block { id: ty.id, state })
    }
}

fn compile_block(id: BlockId, def: BlockDef) -> Result<BlockType, RegistryError> {
    let state_schema: HashMap<String, Vec<String>> = def
        .state_schema
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v): (String, StateValues)| (k, v.into_strings()))
        .collect();
    let (state_fields, prop_index) = compute_state_layout(&state_schema);
    let bits: u32 = state_fields.iter().map(|f| f.bits).sum();
    if bits > 32 {
        return Err(RegistryError::StateTooWide {
            block: def.name,
            bits,
        });
    }

    let multiblock = match def.multiblock {
        Some(mb) => {
            let desc = MultiblockDescriptor {
                size: mb.size,
                index: mb.index,
                rotate: mb.rotate,
            };
            if desc.cell_count() == 0 {
                return Err(RegistryError::EmptyStructure(def.name));
            }
            let Some(values) = state_schema.get(&desc.index) else {
                return Err(RegistryError::MissingIndexState {
                    block: def.name,
                    index: desc.index,
                });
            };
            if values.len() != desc.cell_count() {
                return Err(RegistryError::IndexDomainMismatch {
                    block: def.name,
                    expected: desc.cell_count(),
                    found: values.len(),
                    index: desc.index,
                });
            }
            Some(desc)
        }
        None => None,
    };

    Ok(BlockType {
        id,
        name: def.name,
        tags: def.tags.into_iter().collect(),
        components: def.components,
        multiblock,
        state_schema,
        state_fields,
        prop_index,
    })
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub tags: HashSet<String>,
    pub components: Vec<String>,
    pub multiblock: Option<MultiblockDescriptor>,
    pub state_schema: HashMap<String, Vec<String>>, // property name -> allowed values
    // Precomputed, sorted layout for fast state packing/unpacking
    pub state_fields: Vec<StateField>,
    pub prop_index: HashMap<String, usize>,
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            tags: HashSet::new(),
            components: Vec::new(),
            multiblock: None,
            state_schema: HashMap::new(),
            state_fields: Vec::new(),
            prop_index: HashMap::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StateField {
    pub name: String,
    pub values: Vec<String>,
    pub bits: u32,
    pub offset: u32,
}

impl StateField {
    #[inline]
    fn mask(&self) -> u32 {
        if self.bits >= 32 {
            u32::MAX
        } else {
            (1u32 << self.bits) - 1
        }
    }
}

fn compute_state_layout(
    schema: &HashMap<String, Vec<String>>,
) -> (Vec<StateField>, HashMap<String, usize>) {
    let mut keys: Vec<&String> = schema.keys().collect();
    keys.sort();
    let mut offset: u32 = 0;
    let mut fields: Vec<StateField> = Vec::with_capacity(keys.len());
    for k in keys.into_iter() {
        let vals = schema.get(k).cloned().unwrap_or_default();
        let vlen = vals.len() as u32;
        let bits: u32 = if vlen <= 1 {
            0
        } else {
            32 - (vlen - 1).leading_zeros()
        };
        fields.push(StateField {
            name: k.to_string(),
            values: vals,
            bits,
            offset,
        });
        offset = offset.saturating_add(bits);
    }
    let mut index: HashMap<String, usize> = HashMap::with_capacity(fields.len());
    for (i, f) in fields.iter().enumerate() {
        index.insert(f.name.clone(), i);
    }
    (fields, index)
}

impl BlockType {
    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Capability query: does this type declare the state slot `prop`?
    #[inline]
    pub fn declares_state(&self, prop: &str) -> bool {
        self.prop_index.contains_key(prop)
    }

    pub fn state_prop_value<'a>(&'a self, state: BlockState, prop: &str) -> Option<&'a str> {
        let &i = self.prop_index.get(prop)?;
        let f = &self.state_fields[i];
        if f.bits == 0 {
            return f.values.first().map(|s| s.as_str());
        }
        let idx: usize = ((state >> f.offset) & f.mask()) as usize;
        f.values.get(idx).map(|s| s.as_str())
    }

    pub fn state_prop_is_value(&self, state: BlockState, prop: &str, expect: &str) -> bool {
        self.state_prop_value(state, prop) == Some(expect)
    }

    /// Returns `state` with `prop` set to `value`, or `None` when the slot is
    /// not declared or the value is outside its domain.
    pub fn with_state_value(&self, state: BlockState, prop: &str, value: &str) -> Option<BlockState> {
        let &i = self.prop_index.get(prop)?;
        let f = &self.state_fields[i];
        let sel = f.values.iter().position(|v| v == value)? as u32;
        if f.bits == 0 {
            return Some(state);
        }
        let mask = f.mask() << f.offset;
        Some((state & !mask) | ((sel << f.offset) & mask))
    }

    pub fn state_int(&self, state: BlockState, prop: &str) -> Option<i64> {
        self.state_prop_value(state, prop)?.parse().ok()
    }

    pub fn with_state_int(&self, state: BlockState, prop: &str, value: i64) -> Option<BlockState> {
        self.with_state_value(state, prop, &value.to_string())
    }

    /// All (slot, value) pairs held by `state`, in layout order.
    pub fn state_pairs(&self, state: BlockState) -> Vec<(&str, &str)> {
        self.state_fields
            .iter()
            .filter_map(|f| {
                self.state_prop_value(state, &f.name)
                    .map(|v| (f.name.as_str(), v))
            })
            .collect()
    }

    /// Packs `props` over the default state. An undeclared slot or a value
    /// outside its domain is an error rather than a silent default.
    pub fn pack_state(&self, props: &HashMap<String, String>) -> Result<BlockState, RegistryError> {
        let mut names: Vec<&String> = props.keys().collect();
        names.sort();
        names.into_iter().try_fold(0, |acc, slot| {
            let value = &props[slot];
            self.with_state_value(acc, slot, value)
                .ok_or_else(|| RegistryError::UnknownStateValue {
                    block: self.name.clone(),
                    slot: slot.clone(),
                    value: value.clone(),
                })
        })
    }
}
