//! Plank torque-balance engine
//!
//! All simulation logic lives here. This module must be pure and deterministic:
//! - One `step(dt)` call per tick, driven externally
//! - Attach/detach calls arrive synchronously between ticks from the input
//!   collaborator (the same logical thread as `step`)
//! - Stable iteration order (insertion order of attached masses)
//! - No rendering or platform dependencies

pub mod mass;
pub mod plank;
pub mod shape;
pub mod snap;

pub use mass::{Mass, MassForceVector, MassId};
pub use plank::{AttachError, ColumnState, Plank, PlankError, RejectedMass};
pub use shape::PlankShape;
pub use snap::{resolve_slot, slot_distances};
