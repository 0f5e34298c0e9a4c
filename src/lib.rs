#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

mod geom;
mod num;
mod parallel;
mod strips;

pub mod hex;
pub mod region;
pub mod sweep;

pub use geom::{left_hand_turn, FaceId, Halfsegment, Point, RegionId};
pub use parallel::parallel_overlay;
pub use strips::{create_strips, find_iso_boundaries, StripPlan, Strips};
pub use sweep::overlay_plane_sweep;

/// The input points were faulty.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// At least one of the inputs was infinite.
    Infinity,
    /// At least one of the inputs was not a number.
    NaN,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Infinity => write!(f, "input contained an infinite coordinate"),
            Error::NaN => write!(f, "input contained a NaN coordinate"),
        }
    }
}

impl std::error::Error for Error {}
