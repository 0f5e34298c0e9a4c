//! The plane-sweep implementation.
//!
//! The main entry point is [`overlay_plane_sweep`], which merges two
//! sorted halfsegment sequences into their overlay. [`EventQueue`] holds
//! the halfsegments discovered mid-sweep and [`ActiveList`] the vertical
//! order of segments currently crossed by the sweep line; both are created
//! fresh for every sweep.

mod active;
mod overlay;
mod queue;

pub use active::{ActiveList, Inserted};
pub use overlay::overlay_plane_sweep;
pub use queue::EventQueue;
