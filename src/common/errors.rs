//! Error kinds surfaced by the blending core

use thiserror::Error;

/// Errors reported before any blended sample is produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlendError {
    /// No radius crossing exists on one of the trajectories
    #[error("Invalid blend radius {radius}: {reason}")]
    InvalidBlendRadius { radius: f64, reason: String },

    /// The solved window is empty or inverted
    #[error("Unreachable blend window [{start_time}, {end_time}]: segments too short for the blend radius")]
    UnreachableBlendWindow { start_time: f64, end_time: f64 },

    /// The time shift would bring the robot to a stop at the via-point
    #[error("Blend would stall: time shift {time_shift} must be shorter than the first trajectory ({duration})")]
    BlendWouldStall { time_shift: f64, duration: f64 },

    /// Input violates the generator contract
    #[error("Malformed trajectory: {0}")]
    MalformedTrajectory(String),

    /// A fixed time shift starts the second trajectory before the blend window opens
    #[error("Invalid time shift {time_shift}: the blend window opens at {start_time}")]
    InvalidTimeShift { time_shift: f64, start_time: f64 },

    /// A configuration parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A motion sequence cannot be blended as a whole
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),

    /// The blend spheres around two consecutive via-points intersect
    #[error("Blend radii of sequence items {index} and {} overlap", .index + 1)]
    OverlappingBlendRadii { index: usize },
}
