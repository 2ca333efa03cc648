//! Common types and utilities shared by the blending components
pub mod errors;
pub mod types;

pub use errors::BlendError;
pub use types::{Trajectory, Waypoint};

/// Tolerance used when comparing timestamps at the splice boundaries
pub const TIME_EPSILON: f64 = 1e-9;
