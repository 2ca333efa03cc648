//! Blending of motion sequences
//!
//! A sequence is a list of trajectories, each ending where the next one starts, and the radius
//! used to blend every trajectory into its successor. The last radius must be zero because the
//! motion ends at rest on the final goal.

use crate::blending::config::TimeShift;
use crate::blending::{BlendRequest, TrajectoryBlender};
use crate::common::{BlendError, Trajectory};
use log::debug;

/// One trajectory of a sequence and the radius blending it into the next
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceItem {
    pub trajectory: Trajectory,
    pub blend_radius: f64,
}

impl SequenceItem {
    pub fn new(trajectory: Trajectory, blend_radius: f64) -> Self {
        SequenceItem {
            trajectory,
            blend_radius,
        }
    }
}

/// Folds a sequence into one trajectory through a blender
pub struct SequenceBlender<'a> {
    blender: &'a dyn TrajectoryBlender,
}

impl<'a> SequenceBlender<'a> {
    pub fn new(blender: &'a dyn TrajectoryBlender) -> Self {
        SequenceBlender { blender }
    }

    /// Blend all items left to right.
    ///
    /// A fixed time shift is measured from the start of the accumulated trajectory, so it only
    /// fits one pair; sequences of more than two items need the aligned policy.
    pub fn blend(&self, items: &[SequenceItem]) -> Result<Trajectory, BlendError> {
        Self::validate(items)?;

        if let TimeShift::Fixed(shift) = self.blender.config().time_shift {
            if items.len() > 2 {
                return Err(BlendError::InvalidSequence(format!(
                    "fixed time shift {} applies to a single pair, not {} items",
                    shift,
                    items.len()
                )));
            }
        }

        let (head, tail) = items
            .split_first()
            .ok_or_else(|| BlendError::InvalidSequence("sequence is empty".to_string()))?;

        let mut blended = head.trajectory.clone();
        let mut radius = head.blend_radius;
        for (index, item) in tail.iter().enumerate() {
            debug!("Blending sequence item {} into {} with radius {}", index, index + 1, radius);
            blended = self
                .blender
                .blend(&BlendRequest::new(&blended, &item.trajectory, radius))?;
            radius = item.blend_radius;
        }
        Ok(blended)
    }

    /// Check radii before any blending happens
    pub fn validate(items: &[SequenceItem]) -> Result<(), BlendError> {
        let last = items
            .last()
            .ok_or_else(|| BlendError::InvalidSequence("sequence is empty".to_string()))?;

        if let Some(item) = items
            .iter()
            .find(|item| !item.blend_radius.is_finite() || item.blend_radius < 0.0)
        {
            return Err(BlendError::InvalidBlendRadius {
                radius: item.blend_radius,
                reason: "radius must be a non-negative finite distance".to_string(),
            });
        }

        if last.blend_radius != 0.0 {
            return Err(BlendError::InvalidSequence(format!(
                "the last item must have a zero blend radius, got {}",
                last.blend_radius
            )));
        }

        // Via-point i is the end of item i; its sphere must stay clear of the next one
        for (index, pair) in items.windows(2).enumerate() {
            if index + 2 >= items.len() {
                break;
            }
            let separation =
                (pair[1].trajectory.last().position - pair[0].trajectory.last().position).norm();
            if pair[0].blend_radius + pair[1].blend_radius > separation {
                return Err(BlendError::OverlappingBlendRadii { index });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Waypoint;
    use nalgebra::{UnitQuaternion, Vector3};

    fn segment(from: f64, to: f64) -> Trajectory {
        let waypoints = (0..=10)
            .map(|i| {
                let x = from + (to - from) * i as f64 / 10.0;
                Waypoint::at_rest(i as f64 * 0.1, Vector3::new(x, 0.0, 0.0), UnitQuaternion::identity())
            })
            .collect();
        Trajectory::new(waypoints).unwrap()
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert!(matches!(
            SequenceBlender::validate(&[]),
            Err(BlendError::InvalidSequence(_))
        ));
    }

    #[test]
    fn last_radius_must_be_zero() {
        let items = vec![
            SequenceItem::new(segment(0.0, 1.0), 0.2),
            SequenceItem::new(segment(1.0, 2.0), 0.2),
        ];
        assert!(matches!(
            SequenceBlender::validate(&items),
            Err(BlendError::InvalidSequence(_))
        ));
    }

    #[test]
    fn overlapping_spheres_are_rejected() {
        let items = vec![
            SequenceItem::new(segment(0.0, 1.0), 0.3),
            SequenceItem::new(segment(1.0, 1.5), 0.3),
            SequenceItem::new(segment(1.5, 3.0), 0.0),
        ];
        assert_eq!(
            SequenceBlender::validate(&items),
            Err(BlendError::OverlappingBlendRadii { index: 0 })
        );
    }

    #[test]
    fn separated_spheres_pass() {
        let items = vec![
            SequenceItem::new(segment(0.0, 1.0), 0.3),
            SequenceItem::new(segment(1.0, 2.0), 0.3),
            SequenceItem::new(segment(2.0, 3.0), 0.0),
        ];
        assert!(SequenceBlender::validate(&items).is_ok());
    }

    #[test]
    fn negative_radius_is_rejected() {
        let items = vec![
            SequenceItem::new(segment(0.0, 1.0), -0.1),
            SequenceItem::new(segment(1.0, 2.0), 0.0),
        ];
        assert!(matches!(
            SequenceBlender::validate(&items),
            Err(BlendError::InvalidBlendRadius { .. })
        ));
    }
}
