//! Block types, packed cell state, structure descriptors and the registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod states;
pub mod types;

pub use registry::{BlockRegistry, BlockType, RegistryError};
pub use types::{Block, BlockId, BlockState, MultiblockDescriptor};
