//! Grid collaborator traits and an in-memory sparse grid.
#![forbid(unsafe_code)]

mod grid;
mod sparse;

pub use grid::{GridView, GridWorld, WorldError};
pub use sparse::{GridBounds, REGION_SIZE, SparseWorld, SparseWorldStats};
