//! Event dispatch for the structure engine: runs the behaviors a block type
//! declares, applies their mutations to the grid and defers the rest onto a
//! tick-keyed task queue.
#![forbid(unsafe_code)]

mod engine;
mod host;
mod tasks;

pub use engine::{Engine, EngineStats};
pub use host::{Host, HostEvent, RecordingHost};
pub use tasks::{OrderDomain, Task, TaskQueue, domain_of};
