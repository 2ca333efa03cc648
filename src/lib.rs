//! Trajectory blending core for the Prometheus robot
//!
//! Joins two point-to-point trajectories that meet at a via-point into one continuous motion
//! which passes near the via-point without stopping, staying inside a configured blend radius.
pub mod blending;
pub mod common;
pub mod sequence;

pub use crate::blending::config::{BlendConfig, TimeShift};
pub use crate::blending::window::{BlendPlan, BlendWindow, BlendWindowSolver};
pub use crate::blending::{BlendRequest, BlendingStack, DefaultBlender, TrajectoryBlender};
pub use crate::common::{BlendError, Trajectory, Waypoint};
pub use crate::sequence::{SequenceBlender, SequenceItem};
