//! Trajectory blending with multiple blender implementations
pub mod config;
pub mod orientation;
pub mod position;
pub mod stitcher;
pub mod transition_window;
pub mod weight;
pub mod window;

use self::config::BlendConfig;
use crate::common::{BlendError, Trajectory};
use crate::sequence::{SequenceBlender, SequenceItem};
use log::debug;
use std::collections::HashMap;
use std::fmt::Debug;

// Default implementation
pub use transition_window::TransitionWindowBlender as DefaultBlender;

/// Two trajectories meeting at a via-point and the radius to blend them with
#[derive(Debug, Clone, Copy)]
pub struct BlendRequest<'a> {
    pub first: &'a Trajectory,
    pub second: &'a Trajectory,
    pub blend_radius: f64,
}

impl<'a> BlendRequest<'a> {
    pub fn new(first: &'a Trajectory, second: &'a Trajectory, blend_radius: f64) -> Self {
        BlendRequest {
            first,
            second,
            blend_radius,
        }
    }
}

/// Trait for trajectory blending algorithms
pub trait TrajectoryBlender: Debug + Send + Sync {
    /// Create a new instance with default parameters
    fn new() -> Self
    where
        Self: Sized;

    /// Blend the two trajectories of a request into one
    fn blend(&self, request: &BlendRequest) -> Result<Trajectory, BlendError>;

    /// Get the name of this blender
    fn name(&self) -> &str;

    /// Current configuration
    fn config(&self) -> &BlendConfig;

    /// Configure the blender with parameters
    fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), BlendError>;
}

/// Blending stack owning the active blender
#[derive(Debug)]
pub struct BlendingStack {
    blender: Box<dyn TrajectoryBlender>,
}

impl Default for BlendingStack {
    fn default() -> Self {
        Self::new()
    }
}

impl BlendingStack {
    /// Create a new blending stack with the default blender
    pub fn new() -> Self {
        BlendingStack {
            blender: Box::new(DefaultBlender::new()),
        }
    }

    /// Create a new blending stack with a specific blender
    pub fn with_blender<T: TrajectoryBlender + 'static>(blender: T) -> Self {
        BlendingStack {
            blender: Box::new(blender),
        }
    }

    /// Set the blender
    pub fn set_blender<T: TrajectoryBlender + 'static>(&mut self, blender: T) {
        self.blender = Box::new(blender);
    }

    /// Configure the blender
    pub fn configure_blender(&mut self, params: &HashMap<String, f64>) -> Result<(), BlendError> {
        self.blender.configure(params)
    }

    /// Get the name of the current blender
    pub fn blender_name(&self) -> &str {
        self.blender.name()
    }

    /// Blend two trajectories with the configured default radius
    pub fn blend(&self, first: &Trajectory, second: &Trajectory) -> Result<Trajectory, BlendError> {
        let radius = self.blender.config().blend_radius;
        self.blend_request(&BlendRequest::new(first, second, radius))
    }

    /// Blend two trajectories with the radius carried by the request
    pub fn blend_request(&self, request: &BlendRequest) -> Result<Trajectory, BlendError> {
        debug!(
            "Blending {} + {} samples with {}",
            request.first.len(),
            request.second.len(),
            self.blender.name()
        );
        self.blender.blend(request)
    }

    /// Blend a whole motion sequence into one trajectory
    pub fn blend_sequence(&self, items: &[SequenceItem]) -> Result<Trajectory, BlendError> {
        SequenceBlender::new(self.blender.as_ref()).blend(items)
    }
}
