//! Orientation blending
//!
//! Interpolates between the instantaneous orientations of both trajectories with the same quintic
//! weight as the position channel. Both inputs already accelerate and decelerate smoothly in
//! rotation, so only the single weighted slerp term is evaluated.
//!
//! The blended orientation is `exp(α·r)·q1` with `r` the rotation vector of `±q2·q1⁻¹`. The sign
//! is chosen once per blend so the relative rotation starts on the short arc. If the relative
//! rotation passes half a turn inside the window, the path keeps following the same arc past π
//! instead of jumping to the other one.

use super::weight::BlendWeight;
use super::window::BlendWindow;
use crate::common::Waypoint;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Below this angle the Jacobians use their series expansion
const SMALL_ANGLE: f64 = 1e-6;

/// Blended rotational state at one sample time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularState {
    pub orientation: UnitQuaternion<f64>,
    pub angular_velocity: Vector3<f64>,
}

/// Blends the rotational channel of two trajectories inside a blend window
#[derive(Debug, Clone, Copy)]
pub struct OrientationBlender {
    window: BlendWindow,
    /// Sign applied to the second trajectory's quaternions, fixed once per blend
    hemisphere: f64,
}

impl OrientationBlender {
    /// Create a blender, resolving the antipodal ambiguity from the orientations at the window
    /// start
    pub fn new(
        window: BlendWindow,
        first_at_start: &UnitQuaternion<f64>,
        second_at_start: &UnitQuaternion<f64>,
    ) -> Self {
        let hemisphere = if first_at_start.coords.dot(&second_at_start.coords) < 0.0 {
            -1.0
        } else {
            1.0
        };
        OrientationBlender { window, hemisphere }
    }

    /// Blend the samples of both trajectories taken at the shared-clock `time`.
    ///
    /// Angular velocity is the exact derivative of the blended path (world frame):
    /// `J(α·r)·(α̇·r + α·ṙ) + exp(α·r)·ω1`, where `J` is the left Jacobian of SO(3) and
    /// `ṙ = J(r)⁻¹·(ω2 − rel·ω1)`. It reduces to the input rates at both window boundaries.
    pub fn blend(&self, time: f64, first: &Waypoint, second: &Waypoint) -> AngularState {
        let weight = BlendWeight::at(self.window.normalized_time(time));
        let rate = weight.first / self.window.duration;

        let relative = second.orientation.into_inner() * self.hemisphere
            * first.orientation.inverse().into_inner();
        let r = rotation_vector(&relative);

        let partial = UnitQuaternion::from_scaled_axis(r * weight.value);
        let orientation = partial * first.orientation;

        let relative_rate = second.angular_velocity
            - UnitQuaternion::new_normalize(relative).transform_vector(&first.angular_velocity);
        let r_dot = left_jacobian_inverse(&r, &relative_rate);

        let angular_velocity =
            left_jacobian(&(r * weight.value), &(r * rate + r_dot * weight.value))
                + partial.transform_vector(&first.angular_velocity);

        AngularState {
            orientation,
            angular_velocity,
        }
    }
}

/// Rotation vector of a unit quaternion, keeping its sign: angles run over `[0, 2π)` so the
/// result is continuous as long as the quaternion is
fn rotation_vector(q: &Quaternion<f64>) -> Vector3<f64> {
    let axis = q.imag();
    let sine = axis.norm();
    if sine <= SMALL_ANGLE {
        return axis * 2.0;
    }
    axis * (2.0 * sine.atan2(q.w) / sine)
}

/// `J(φ)·v`, mapping the rate of a rotation vector to the angular velocity of `exp(φ)`
fn left_jacobian(phi: &Vector3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    let angle = phi.norm();
    let cross = phi.cross(v);
    let double = phi.cross(&cross);
    if angle <= SMALL_ANGLE {
        return v + cross * 0.5 + double / 6.0;
    }
    let angle2 = angle * angle;
    v + cross * ((1.0 - angle.cos()) / angle2) + double * ((angle - angle.sin()) / (angle2 * angle))
}

/// `J(φ)⁻¹·v`, finite for angles below 2π
fn left_jacobian_inverse(phi: &Vector3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    let angle = phi.norm();
    let cross = phi.cross(v);
    let double = phi.cross(&cross);
    if angle <= SMALL_ANGLE {
        return v - cross * 0.5 + double / 12.0;
    }
    let half = 0.5 * angle;
    let coefficient = 1.0 / (angle * angle) - half.cos() / (2.0 * angle * half.sin());
    v - cross * 0.5 + double * coefficient
}
