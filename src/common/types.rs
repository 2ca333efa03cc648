//! Sampled trajectory data model

use super::errors::BlendError;
use nalgebra::{UnitQuaternion, Vector3};

/// Below this half-angle sine, slerp falls back to normalized lerp
const SLERP_EPSILON: f64 = 1e-9;

/// A single sample of a Cartesian trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub time: f64,
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub linear_velocity: Vector3<f64>,
    pub angular_velocity: Vector3<f64>,
    pub linear_acceleration: Vector3<f64>,
}

impl Waypoint {
    /// Create a waypoint with zero velocity and acceleration
    pub fn at_rest(time: f64, position: Vector3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Waypoint {
            time,
            position,
            orientation,
            linear_velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            linear_acceleration: Vector3::zeros(),
        }
    }

    /// The same sample stamped with another time
    pub fn with_time(&self, time: f64) -> Self {
        Waypoint { time, ..*self }
    }

    fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.position.iter().all(|v| v.is_finite())
            && self.orientation.coords.iter().all(|v| v.is_finite())
            && self.linear_velocity.iter().all(|v| v.is_finite())
            && self.angular_velocity.iter().all(|v| v.is_finite())
            && self.linear_acceleration.iter().all(|v| v.is_finite())
    }

    fn is_at_rest(&self, tolerance: f64) -> bool {
        self.linear_velocity.norm() <= tolerance
            && self.angular_velocity.norm() <= tolerance
            && self.linear_acceleration.norm() <= tolerance
    }
}

/// An ordered sequence of waypoints with strictly increasing time
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    waypoints: Vec<Waypoint>,
}

impl Trajectory {
    /// Create a trajectory, rejecting non-finite samples and non-monotonic timestamps
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, BlendError> {
        if waypoints.len() < 2 {
            return Err(BlendError::MalformedTrajectory(format!(
                "a trajectory needs at least 2 waypoints, got {}",
                waypoints.len()
            )));
        }

        if let Some(index) = waypoints.iter().position(|w| !w.is_finite()) {
            return Err(BlendError::MalformedTrajectory(format!(
                "waypoint {} contains non-finite values",
                index
            )));
        }

        if let Some(index) = waypoints.windows(2).position(|pair| pair[1].time <= pair[0].time) {
            return Err(BlendError::MalformedTrajectory(format!(
                "timestamps must be strictly increasing (waypoint {} at {} follows {})",
                index + 1,
                waypoints[index + 1].time,
                waypoints[index].time
            )));
        }

        Ok(Trajectory { waypoints })
    }

    /// Check the rest-to-rest boundary condition guaranteed by the generator
    pub fn check_boundaries(&self, tolerance: f64) -> Result<(), BlendError> {
        for (label, waypoint) in [("first", self.first()), ("last", self.last())] {
            if !waypoint.is_at_rest(tolerance) {
                return Err(BlendError::MalformedTrajectory(format!(
                    "{} waypoint at t={} is not at rest (|v|={}, |w|={}, |a|={})",
                    label,
                    waypoint.time,
                    waypoint.linear_velocity.norm(),
                    waypoint.angular_velocity.norm(),
                    waypoint.linear_acceleration.norm()
                )));
            }
        }
        Ok(())
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false, a trajectory holds at least two waypoints
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn first(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    pub fn last(&self) -> &Waypoint {
        &self.waypoints[self.waypoints.len() - 1]
    }

    pub fn start_time(&self) -> f64 {
        self.first().time
    }

    pub fn end_time(&self) -> f64 {
        self.last().time
    }

    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    /// Mean interval between consecutive samples
    pub fn sampling_period(&self) -> f64 {
        self.duration() / (self.waypoints.len() - 1) as f64
    }

    /// Sample the trajectory at an arbitrary time.
    ///
    /// Between samples, position and the stored derivatives are interpolated linearly and
    /// orientation along the shortest arc. Outside the covered range the boundary sample is
    /// held, which is valid because the trajectory is at rest at both ends.
    pub fn sample_at(&self, time: f64) -> Waypoint {
        let n = self.waypoints.len();
        if time <= self.start_time() {
            return self.first().with_time(time);
        }
        if time >= self.end_time() {
            return self.last().with_time(time);
        }

        // Largest index whose time is <= the requested time
        let idx = self
            .waypoints
            .partition_point(|w| w.time <= time)
            .saturating_sub(1)
            .min(n - 2);

        let a = &self.waypoints[idx];
        let b = &self.waypoints[idx + 1];
        let fraction = (time - a.time) / (b.time - a.time);
        if fraction <= 0.0 {
            return a.with_time(time);
        }

        Waypoint {
            time,
            position: a.position.lerp(&b.position, fraction),
            orientation: slerp_shortest(&a.orientation, &b.orientation, fraction),
            linear_velocity: a.linear_velocity.lerp(&b.linear_velocity, fraction),
            angular_velocity: a.angular_velocity.lerp(&b.angular_velocity, fraction),
            linear_acceleration: a.linear_acceleration.lerp(&b.linear_acceleration, fraction),
        }
    }
}

/// Flip `q` into the hemisphere of `reference` (q and -q encode the same rotation)
pub fn align_hemisphere(
    reference: &UnitQuaternion<f64>,
    q: &UnitQuaternion<f64>,
) -> UnitQuaternion<f64> {
    if reference.coords.dot(&q.coords) < 0.0 {
        UnitQuaternion::new_unchecked(-q.into_inner())
    } else {
        *q
    }
}

/// Spherical interpolation along the shorter great-circle arc
pub fn slerp_shortest(
    from: &UnitQuaternion<f64>,
    to: &UnitQuaternion<f64>,
    t: f64,
) -> UnitQuaternion<f64> {
    let to = align_hemisphere(from, to);
    from.try_slerp(&to, t, SLERP_EPSILON)
        .unwrap_or_else(|| from.nlerp(&to, t))
}
