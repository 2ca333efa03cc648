//! Assembly of the blended output trajectory
//!
//! The output is the pre-blend part of trajectory one, the blended region sampled at the input
//! cadence, and the time-shifted post-blend part of trajectory two. Samples on a splice boundary
//! belong to the blended region, and an input sample closer than a small fraction of a period to
//! either splice is dropped in its favour.

use super::orientation::OrientationBlender;
use super::position::PositionBlender;
use super::window::{BlendPlan, BlendWindow};
use crate::common::{BlendError, Trajectory, Waypoint, TIME_EPSILON};
use log::debug;

/// Samples closer than this fraction of a period to a splice time are merged into it
pub const SPLICE_MERGE_FRACTION: f64 = 0.01;

/// Upper bound on the number of samples in one blended region
pub const MAX_BLEND_SAMPLES: usize = 1_000_000;

/// Composes two trajectories and their blend into one trajectory
pub struct TrajectoryStitcher<'a> {
    first: &'a Trajectory,
    second: &'a Trajectory,
    sampling_period: f64,
}

impl<'a> TrajectoryStitcher<'a> {
    pub fn new(first: &'a Trajectory, second: &'a Trajectory, sampling_period: f64) -> Self {
        TrajectoryStitcher {
            first,
            second,
            sampling_period,
        }
    }

    /// Build the output trajectory for a solved plan
    pub fn stitch(&self, plan: &BlendPlan) -> Result<Trajectory, BlendError> {
        match plan {
            BlendPlan::HardSwitch => self.switch(),
            BlendPlan::Window(window) => self.blend(window),
        }
    }

    /// Trajectory one to its end, then trajectory two starting at the via-point instant
    fn switch(&self) -> Result<Trajectory, BlendError> {
        let offset = self.first.end_time() - self.second.start_time();
        let switch_time = self.first.end_time();

        let mut waypoints = self.first.waypoints().to_vec();
        waypoints.extend(
            self.second
                .waypoints()
                .iter()
                .map(|w| w.with_time(w.time + offset))
                .filter(|w| w.time > switch_time + TIME_EPSILON),
        );
        debug!("Hard switch at t={:.6} ({} samples)", switch_time, waypoints.len());
        Trajectory::new(waypoints)
    }

    fn blend(&self, window: &BlendWindow) -> Result<Trajectory, BlendError> {
        let position = PositionBlender::new(*window);
        let orientation = OrientationBlender::new(
            *window,
            &self.first.sample_at(window.start_time).orientation,
            &self.second.sample_at(window.second_time(window.start_time)).orientation,
        );

        let merge = SPLICE_MERGE_FRACTION * self.sampling_period;
        let times = self.blend_times(window)?;

        let pre = self
            .first
            .waypoints()
            .iter()
            .filter(|w| w.time < window.start_time - merge)
            .copied();

        let blended = times.into_iter().map(|time| {
            let a = self.first.sample_at(time);
            let b = self.second.sample_at(window.second_time(time));
            let linear = position.blend(time, &a, &b);
            let angular = orientation.blend(time, &a, &b);
            Waypoint {
                time,
                position: linear.position,
                orientation: angular.orientation,
                linear_velocity: linear.velocity,
                angular_velocity: angular.angular_velocity,
                linear_acceleration: linear.acceleration,
            }
        });

        let post = self
            .second
            .waypoints()
            .iter()
            .map(|w| w.with_time(w.time + window.second_clock_offset))
            .filter(|w| w.time > window.end_time + merge);

        let waypoints: Vec<Waypoint> = pre.chain(blended).chain(post).collect();
        debug!(
            "Stitched {} samples, blended region [{:.6}, {:.6}] at period {}",
            waypoints.len(),
            window.start_time,
            window.end_time,
            self.sampling_period
        );
        Trajectory::new(waypoints)
    }

    /// Sample times of the blended region: the window start, every period after it, and the
    /// window end
    fn blend_times(&self, window: &BlendWindow) -> Result<Vec<f64>, BlendError> {
        let count = (window.duration / self.sampling_period).ceil();
        if !count.is_finite() || count > MAX_BLEND_SAMPLES as f64 {
            return Err(BlendError::InvalidParameter(format!(
                "sampling period {} would need more than {} samples over a {} s blend",
                self.sampling_period, MAX_BLEND_SAMPLES, window.duration
            )));
        }

        let last_cadence = window.end_time - SPLICE_MERGE_FRACTION * self.sampling_period;
        let mut times: Vec<f64> = (0..)
            .map(|k| window.start_time + k as f64 * self.sampling_period)
            .take_while(|&t| t < last_cadence)
            .collect();
        times.push(window.end_time);
        Ok(times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};

    fn along_x(offset: f64, samples: usize) -> Trajectory {
        let waypoints = (0..samples)
            .map(|i| {
                let t = i as f64 * 0.5;
                Waypoint::at_rest(t, Vector3::new(t + offset, 0.0, 0.0), UnitQuaternion::identity())
            })
            .collect();
        Trajectory::new(waypoints).unwrap()
    }

    #[test]
    fn hard_switch_drops_duplicate_via_point() {
        let first = along_x(-2.0, 5);
        let second = along_x(0.0, 5);
        let stitcher = TrajectoryStitcher::new(&first, &second, 0.5);

        let output = stitcher.stitch(&BlendPlan::HardSwitch).unwrap();

        assert_eq!(output.len(), 9);
        assert_eq!(output.waypoints()[4], *first.last());
        assert_eq!(output.end_time(), 4.0);
    }

    #[test]
    fn blended_region_spans_the_window_at_input_cadence() {
        let first = along_x(-2.0, 5);
        let second = along_x(0.0, 5);
        let window = BlendWindow {
            start_time: 1.25,
            end_time: 2.75,
            duration: 1.5,
            time_shift: 1.25,
            second_clock_offset: 1.25,
        };
        let stitcher = TrajectoryStitcher::new(&first, &second, 0.5);

        let times = stitcher.blend_times(&window).unwrap();
        assert_eq!(times, vec![1.25, 1.75, 2.25, 2.75]);

        let output = stitcher.stitch(&BlendPlan::Window(window)).unwrap();
        let stamps: Vec<f64> = output.waypoints().iter().map(|w| w.time).collect();
        assert_eq!(stamps, vec![0.0, 0.5, 1.0, 1.25, 1.75, 2.25, 2.75, 3.25]);
    }

    #[test]
    fn input_samples_next_to_a_splice_are_merged() {
        let first = along_x(-2.0, 5);
        let second = along_x(0.0, 5);
        // Both splices land a few nanoseconds after an input sample
        let window = BlendWindow {
            start_time: 1.0 + 5e-9,
            end_time: 2.75,
            duration: 1.75 - 5e-9,
            time_shift: 1.25 + 5e-9,
            second_clock_offset: 1.25 + 5e-9,
        };
        let stitcher = TrajectoryStitcher::new(&first, &second, 0.5);

        let output = stitcher.stitch(&BlendPlan::Window(window)).unwrap();

        let stamps: Vec<f64> = output.waypoints().iter().map(|w| w.time).collect();
        assert!(stamps.contains(&window.start_time));
        assert!(stamps.contains(&window.end_time));
        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= SPLICE_MERGE_FRACTION * 0.5);
        }
    }

    #[test]
    fn tiny_period_is_rejected() {
        let first = along_x(-2.0, 5);
        let second = along_x(0.0, 5);
        let window = BlendWindow {
            start_time: 1.25,
            end_time: 2.75,
            duration: 1.5,
            time_shift: 1.25,
            second_clock_offset: 1.25,
        };
        let stitcher = TrajectoryStitcher::new(&first, &second, 1e-12);

        let err = stitcher.stitch(&BlendPlan::Window(window)).unwrap_err();
        assert!(matches!(err, BlendError::InvalidParameter(_)));
    }
}
