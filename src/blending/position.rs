//! Cartesian position blending
//!
//! `x_b(t) = x1(t) + α(s)·(x2(t − T_s) − x1(t))`, with velocity and acceleration obtained from
//! the same expression by the product rule so the output stays kinematically consistent.

use super::weight::BlendWeight;
use super::window::BlendWindow;
use crate::common::Waypoint;
use nalgebra::Vector3;

/// Blended translational state at one sample time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub acceleration: Vector3<f64>,
}

/// Blends the translational channel of two trajectories inside a blend window
#[derive(Debug, Clone, Copy)]
pub struct PositionBlender {
    window: BlendWindow,
}

impl PositionBlender {
    pub fn new(window: BlendWindow) -> Self {
        PositionBlender { window }
    }

    /// Blend the samples of both trajectories taken at the shared-clock `time`.
    ///
    /// `first` is sampled at `time`, `second` at `time - T_s` on its own clock.
    pub fn blend(&self, time: f64, first: &Waypoint, second: &Waypoint) -> LinearState {
        let duration = self.window.duration;
        let weight = BlendWeight::at(self.window.normalized_time(time));
        let rate = weight.first / duration;
        let curvature = weight.second / (duration * duration);

        let dx = second.position - first.position;
        let dv = second.linear_velocity - first.linear_velocity;
        let da = second.linear_acceleration - first.linear_acceleration;

        LinearState {
            position: first.position + dx * weight.value,
            velocity: first.linear_velocity + dv * weight.value + dx * rate,
            acceleration: first.linear_acceleration
                + da * weight.value
                + dv * (2.0 * rate)
                + dx * curvature,
        }
    }
}
