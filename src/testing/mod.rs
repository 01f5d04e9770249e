//! Headless testing framework: Pilot, recording surface, snapshot helpers.
//!
//! Use the [`Pilot`] to drive an [`App`](crate::app::App) with simulated
//! pointer and keyboard input. [`RecordingSurface`] stands in for a host
//! drawing context and [`ops_to_string`] renders what it recorded as text
//! for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;
pub mod surface;

pub use pilot::Pilot;
pub use snapshot::ops_to_string;
pub use surface::{DrawOp, RecordingSurface};
