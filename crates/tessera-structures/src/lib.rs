//! Multi-cell structure placement, identification and teardown on top of a
//! per-cell grid, plus per-cell state cycling.
//!
//! Every handler here is a pure function from an event, the block registry
//! and a read-only grid view to an [`Effects`] value. Nothing in this crate
//! mutates the grid; `tessera-runtime` applies the returned mutations.
#![forbid(unsafe_code)]

pub mod anchor;
pub mod behavior;
pub mod cycle;
pub mod effects;
pub mod erase;
pub mod error;
pub mod footprint;
pub mod legacy;
pub mod orientation;
pub mod placement;

pub use anchor::{StructureView, resolve_anchor, resolve_structure};
pub use behavior::{Actor, ActorId, Behavior, BehaviorTable, BreakEvent, InteractEvent, PlaceEvent};
pub use effects::{Effects, Mutation, PlaceOutcome};
pub use error::StructureError;
pub use footprint::{footprint, footprint_offset, placement_targets};
pub use orientation::{Orientation, yaw_to_rotation};
