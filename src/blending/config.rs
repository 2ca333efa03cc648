//! Blend configuration

use crate::common::BlendError;
use std::collections::HashMap;

/// How the second trajectory's clock is placed relative to the first
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeShift {
    /// Shift so the window spans the longer of the two in-sphere portions
    Aligned,
    /// Caller-chosen shift, measured from the first trajectory's start. Only meaningful for a
    /// single pair, sequences reject it
    Fixed(f64),
}

/// Parameters recognised by the blenders
#[derive(Debug, Clone, PartialEq)]
pub struct BlendConfig {
    /// Default radius used when a blend is requested without one (meters)
    pub blend_radius: f64,
    /// Cadence of the blended region, inherited from the first trajectory when unset
    pub sampling_period: Option<f64>,
    pub time_shift: TimeShift,
    /// Max velocity/acceleration norm accepted as "at rest" at trajectory boundaries
    pub boundary_tolerance: f64,
    /// Max gap between the end of the first and the start of the second trajectory
    pub via_point_tolerance: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        BlendConfig {
            blend_radius: 0.0,
            sampling_period: None,
            time_shift: TimeShift::Aligned,
            boundary_tolerance: 1e-6,
            via_point_tolerance: 1e-6,
        }
    }
}

impl BlendConfig {
    /// Update the configuration from a parameter map.
    ///
    /// All values are validated before any is applied, so a rejected map leaves the
    /// configuration untouched. A negative `time_shift` selects the aligned policy.
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), BlendError> {
        let mut updated = self.clone();

        if let Some(&radius) = params.get("blend_radius") {
            if !radius.is_finite() || radius < 0.0 {
                return Err(BlendError::InvalidParameter(
                    "Blend radius must be non-negative".to_string(),
                ));
            }
            updated.blend_radius = radius;
        }

        if let Some(&period) = params.get("sampling_period") {
            if !period.is_finite() || period <= 0.0 {
                return Err(BlendError::InvalidParameter(
                    "Sampling period must be positive".to_string(),
                ));
            }
            updated.sampling_period = Some(period);
        }

        if let Some(&shift) = params.get("time_shift") {
            if !shift.is_finite() {
                return Err(BlendError::InvalidParameter(
                    "Time shift must be finite".to_string(),
                ));
            }
            updated.time_shift = if shift < 0.0 {
                TimeShift::Aligned
            } else {
                TimeShift::Fixed(shift)
            };
        }

        if let Some(&tolerance) = params.get("boundary_tolerance") {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(BlendError::InvalidParameter(
                    "Boundary tolerance must be non-negative".to_string(),
                ));
            }
            updated.boundary_tolerance = tolerance;
        }

        if let Some(&tolerance) = params.get("via_point_tolerance") {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(BlendError::InvalidParameter(
                    "Via-point tolerance must be non-negative".to_string(),
                ));
            }
            updated.via_point_tolerance = tolerance;
        }

        *self = updated;
        Ok(())
    }
}
