//! Transition-window blender: the default blending strategy

use super::config::BlendConfig;
use super::stitcher::TrajectoryStitcher;
use super::window::{BlendPlan, BlendWindowSolver};
use super::{BlendRequest, TrajectoryBlender};
use crate::common::{BlendError, Trajectory};
use log::{info, warn};
use std::collections::HashMap;

/// Blends two trajectories over the window in which they pass through the blend sphere
#[derive(Debug, Clone, Default)]
pub struct TransitionWindowBlender {
    config: BlendConfig,
}

impl TransitionWindowBlender {
    /// Create a blender with an explicit configuration
    pub fn with_config(config: BlendConfig) -> Self {
        TransitionWindowBlender { config }
    }

    /// Reject requests that break the generator contract
    fn validate(&self, request: &BlendRequest) -> Result<(), BlendError> {
        request.first.check_boundaries(self.config.boundary_tolerance)?;
        request.second.check_boundaries(self.config.boundary_tolerance)?;

        let gap = (request.first.last().position - request.second.first().position).norm();
        if gap > self.config.via_point_tolerance {
            return Err(BlendError::MalformedTrajectory(format!(
                "trajectories do not meet at a via-point (gap {})",
                gap
            )));
        }
        Ok(())
    }

    fn sampling_period(&self, request: &BlendRequest) -> f64 {
        self.config
            .sampling_period
            .unwrap_or_else(|| request.first.sampling_period())
    }

    fn try_blend(&self, request: &BlendRequest) -> Result<Trajectory, BlendError> {
        self.validate(request)?;

        let solver = BlendWindowSolver::new(request.blend_radius, self.config.time_shift);
        let plan = solver.solve(request.first, request.second)?;

        let stitcher =
            TrajectoryStitcher::new(request.first, request.second, self.sampling_period(request));
        let output = stitcher.stitch(&plan)?;

        match plan {
            BlendPlan::HardSwitch => info!(
                "Switched trajectories without blending ({} samples)",
                output.len()
            ),
            BlendPlan::Window(window) => info!(
                "Blended trajectories with radius {} over [{:.3}, {:.3}] ({} samples)",
                request.blend_radius,
                window.start_time,
                window.end_time,
                output.len()
            ),
        }
        Ok(output)
    }
}

impl TrajectoryBlender for TransitionWindowBlender {
    fn new() -> Self {
        TransitionWindowBlender::default()
    }

    fn blend(&self, request: &BlendRequest) -> Result<Trajectory, BlendError> {
        self.try_blend(request).map_err(|e| {
            warn!("Rejected blend with radius {}: {}", request.blend_radius, e);
            e
        })
    }

    fn name(&self) -> &str {
        "TransitionWindowBlender"
    }

    fn config(&self) -> &BlendConfig {
        &self.config
    }

    fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), BlendError> {
        self.config.configure(params)
    }
}
