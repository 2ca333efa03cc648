//! Shared fixtures: straight-line rest-to-rest moves like the ones the external generator emits
#![allow(dead_code)]

use nalgebra::{UnitQuaternion, Vector3};
use prometheus_blend::{Trajectory, Waypoint};

pub const PERIOD: f64 = 0.01;

/// Rest-to-rest time scaling `σ(u) = 6u⁵ − 15u⁴ + 10u³` and its first two derivatives
pub fn smoothstep(u: f64) -> (f64, f64, f64) {
    let u = u.clamp(0.0, 1.0);
    (
        u * u * u * (10.0 + u * (6.0 * u - 15.0)),
        30.0 * u * u * (u - 1.0) * (u - 1.0),
        60.0 * u * (u - 1.0) * (2.0 * u - 1.0),
    )
}

/// Sample a straight move from `from` to `to`, rotating about a fixed axis, starting at t = 0
pub fn linear_move(
    from: Vector3<f64>,
    to: Vector3<f64>,
    q_from: UnitQuaternion<f64>,
    q_to: UnitQuaternion<f64>,
    duration: f64,
) -> Trajectory {
    let samples = (duration / PERIOD).round() as usize;
    let rotation = (q_to * q_from.inverse()).scaled_axis();
    let delta = to - from;

    let waypoints = (0..=samples)
        .map(|i| {
            let time = duration * i as f64 / samples as f64;
            let (s, ds, dds) = smoothstep(time / duration);
            Waypoint {
                time,
                position: from + delta * s,
                orientation: UnitQuaternion::from_scaled_axis(rotation * s) * q_from,
                linear_velocity: delta * (ds / duration),
                angular_velocity: rotation * (ds / duration),
                linear_acceleration: delta * (dds / (duration * duration)),
            }
        })
        .collect();
    Trajectory::new(waypoints).expect("fixture trajectory is well formed")
}

pub fn yaw(angle: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle)
}

/// The documented 6 s example: the first move is 3 m from the via-point at 3.5 s, the second
/// one 3 m away at 2 s. Returns (first, second, via-point).
pub fn corner_scenario() -> (Trajectory, Trajectory, Vector3<f64>) {
    corner_with_orientations(yaw(0.0), yaw(0.5), yaw(1.2))
}

/// The documented corner with caller-chosen orientations at start, via-point and goal
pub fn corner_with_orientations(
    start: UnitQuaternion<f64>,
    via_orientation: UnitQuaternion<f64>,
    goal: UnitQuaternion<f64>,
) -> (Trajectory, Trajectory, Vector3<f64>) {
    let via = Vector3::new(1.0, 2.0, 0.5);
    let first_length = 3.0 / (1.0 - smoothstep(3.5 / 6.0).0);
    let second_length = 3.0 / smoothstep(2.0 / 6.0).0;

    let first = linear_move(
        via - Vector3::new(first_length, 0.0, 0.0),
        via,
        start,
        via_orientation,
        6.0,
    );
    let second = linear_move(
        via,
        via + Vector3::new(0.0, second_length, 0.0),
        via_orientation,
        goal,
        6.0,
    );
    (first, second, via)
}

/// Copy of a trajectory with every quaternion replaced by its antipode
pub fn antipodal(trajectory: &Trajectory) -> Trajectory {
    let waypoints = trajectory
        .waypoints()
        .iter()
        .map(|w| Waypoint {
            orientation: UnitQuaternion::new_unchecked(-w.orientation.into_inner()),
            ..*w
        })
        .collect();
    Trajectory::new(waypoints).expect("fixture trajectory is well formed")
}
