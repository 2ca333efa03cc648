//! Blend window solver
//!
//! Finds where the first trajectory enters the blend sphere around the via-point and where the
//! second one leaves it, then places the second trajectory's clock so the two in-sphere portions
//! overlap without the robot stopping at the via-point.

use super::config::TimeShift;
use crate::common::{BlendError, Trajectory, TIME_EPSILON};
use log::debug;
use nalgebra::Vector3;

/// Time interval of a blend, expressed in the first trajectory's clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWindow {
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    /// Offset of the second trajectory's start from the first trajectory's start
    pub time_shift: f64,
    /// Added to the second trajectory's own timestamps to express them in the shared clock
    pub second_clock_offset: f64,
}

impl BlendWindow {
    /// Normalized window time `s = (t - start) / duration`
    pub fn normalized_time(&self, time: f64) -> f64 {
        (time - self.start_time) / self.duration
    }

    /// Map a shared-clock time onto the second trajectory's own clock
    pub fn second_time(&self, time: f64) -> f64 {
        time - self.second_clock_offset
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }
}

/// Outcome of solving a blend request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlendPlan {
    /// Zero radius: trajectory one runs to the via-point, trajectory two follows it
    HardSwitch,
    Window(BlendWindow),
}

/// Determines the blend window for a pair of trajectories meeting at a via-point
#[derive(Debug, Clone, Copy)]
pub struct BlendWindowSolver {
    blend_radius: f64,
    time_shift: TimeShift,
}

impl BlendWindowSolver {
    pub fn new(blend_radius: f64, time_shift: TimeShift) -> Self {
        BlendWindowSolver {
            blend_radius,
            time_shift,
        }
    }

    /// Solve the blend window between `first` (ending at the via-point) and `second`
    /// (starting there)
    pub fn solve(&self, first: &Trajectory, second: &Trajectory) -> Result<BlendPlan, BlendError> {
        let radius = self.blend_radius;
        if !radius.is_finite() || radius < 0.0 {
            return Err(BlendError::InvalidBlendRadius {
                radius,
                reason: "radius must be a non-negative finite distance".to_string(),
            });
        }
        if radius == 0.0 {
            debug!("Zero blend radius, switching trajectories at the via-point");
            return Ok(BlendPlan::HardSwitch);
        }

        let via = first.last().position;
        let start_time = self.entry_time(first, &via)?;
        let end_time_raw = self.exit_time(second, &via)?;

        let duration_first = first.duration();
        let start_relative = start_time - first.start_time();
        let time_shift = match self.time_shift {
            TimeShift::Aligned => start_relative.max(duration_first - end_time_raw),
            TimeShift::Fixed(shift) => shift,
        };

        // Strict: a shift equal to the first duration means the robot halts at the via-point
        if time_shift >= duration_first {
            return Err(BlendError::BlendWouldStall {
                time_shift,
                duration: duration_first,
            });
        }
        if time_shift < start_relative - TIME_EPSILON {
            return Err(BlendError::InvalidTimeShift {
                time_shift,
                start_time,
            });
        }

        let end_time = first.start_time() + time_shift + end_time_raw;
        if end_time - start_time <= TIME_EPSILON {
            return Err(BlendError::UnreachableBlendWindow {
                start_time,
                end_time,
            });
        }

        let window = BlendWindow {
            start_time,
            end_time,
            duration: end_time - start_time,
            time_shift,
            second_clock_offset: first.start_time() + time_shift - second.start_time(),
        };
        debug!(
            "Solved blend window [{:.6}, {:.6}] with time shift {:.6} for radius {}",
            window.start_time, window.end_time, window.time_shift, radius
        );
        Ok(BlendPlan::Window(window))
    }

    /// Time at which `first` enters the sphere for the last time.
    ///
    /// Scans backward for the latest sample still at or outside the radius and refines the
    /// crossing on the segment to the next (inside) sample.
    fn entry_time(&self, first: &Trajectory, via: &Vector3<f64>) -> Result<f64, BlendError> {
        let waypoints = first.waypoints();
        let outside = waypoints
            .iter()
            .rposition(|w| (w.position - via).norm() >= self.blend_radius)
            .ok_or_else(|| BlendError::InvalidBlendRadius {
                radius: self.blend_radius,
                reason: "first trajectory lies entirely inside the blend sphere".to_string(),
            })?;

        // The via-point itself sits inside any positive radius
        if outside + 1 >= waypoints.len() {
            return Ok(waypoints[outside].time);
        }

        let a = &waypoints[outside];
        let b = &waypoints[outside + 1];
        let fraction = sphere_crossing(&a.position, &b.position, via, self.blend_radius, true);
        Ok(a.time + fraction * (b.time - a.time))
    }

    /// Time, relative to the start of `second`, at which it first exceeds the radius
    fn exit_time(&self, second: &Trajectory, via: &Vector3<f64>) -> Result<f64, BlendError> {
        let waypoints = second.waypoints();
        let outside = waypoints
            .iter()
            .position(|w| (w.position - via).norm() > self.blend_radius)
            .ok_or_else(|| BlendError::InvalidBlendRadius {
                radius: self.blend_radius,
                reason: "second trajectory never leaves the blend sphere".to_string(),
            })?;

        if outside == 0 {
            return Ok(0.0);
        }

        let a = &waypoints[outside - 1];
        let b = &waypoints[outside];
        let fraction = sphere_crossing(&a.position, &b.position, via, self.blend_radius, false);
        Ok(a.time + fraction * (b.time - a.time) - second.start_time())
    }
}

/// Fraction along the segment `a -> b` where it crosses the sphere around `center`.
///
/// `entering` selects the inward crossing (smaller root), otherwise the outward one.
fn sphere_crossing(
    a: &Vector3<f64>,
    b: &Vector3<f64>,
    center: &Vector3<f64>,
    radius: f64,
    entering: bool,
) -> f64 {
    let direction = b - a;
    let offset = a - center;
    let qa = direction.dot(&direction);
    if qa <= 0.0 {
        return 0.0;
    }
    let qb = 2.0 * offset.dot(&direction);
    let qc = offset.dot(&offset) - radius * radius;
    let root = (qb * qb - 4.0 * qa * qc).max(0.0).sqrt();

    let fraction = if entering {
        (-qb - root) / (2.0 * qa)
    } else {
        (-qb + root) / (2.0 * qa)
    };
    fraction.clamp(0.0, 1.0)
}
