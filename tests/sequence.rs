mod common;

use approx::assert_relative_eq;
use common::{linear_move, yaw};
use nalgebra::Vector3;
use prometheus_blend::{BlendError, BlendingStack, SequenceItem, Trajectory};
use std::collections::HashMap;

fn zigzag(radii: [f64; 3]) -> (Vec<SequenceItem>, [Vector3<f64>; 4]) {
    let points = [
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(2.0, 0.0, 0.0),
        Vector3::new(2.0, 2.0, 0.0),
        Vector3::new(4.0, 2.0, 0.3),
    ];
    let angles = [0.0, 0.4, -0.2, 0.6];
    let items = (0..3)
        .map(|i| {
            SequenceItem::new(
                linear_move(points[i], points[i + 1], yaw(angles[i]), yaw(angles[i + 1]), 3.0),
                radii[i],
            )
        })
        .collect();
    (items, points)
}

fn closest_approach(trajectory: &Trajectory, point: &Vector3<f64>) -> f64 {
    trajectory
        .waypoints()
        .iter()
        .map(|w| (w.position - point).norm())
        .fold(f64::INFINITY, f64::min)
}

#[test]
fn blends_every_via_point_of_a_sequence() {
    let (items, points) = zigzag([0.5, 0.5, 0.0]);
    let output = BlendingStack::new().blend_sequence(&items).unwrap();

    assert_relative_eq!(output.first().position, points[0], epsilon = 1e-9);
    assert_relative_eq!(output.last().position, points[3], epsilon = 1e-9);
    assert!(output.check_boundaries(1e-6).is_ok());

    for via in &points[1..3] {
        let distance = closest_approach(&output, via);
        assert!(distance > 0.0 && distance <= 0.5 + 1e-9);
    }

    // Passing the via-points without stopping shortens the motion
    assert!(output.duration() < 9.0);

    for triple in output.waypoints().windows(3) {
        let dt = triple[2].time - triple[0].time;
        let fd = (triple[2].position - triple[0].position) / dt;
        assert!((fd - triple[1].linear_velocity).norm() < 0.05);
    }
}

#[test]
fn zero_radii_concatenate_the_moves() {
    let (items, points) = zigzag([0.0, 0.0, 0.0]);
    let output = BlendingStack::new().blend_sequence(&items).unwrap();

    assert_relative_eq!(output.duration(), 9.0, epsilon = 1e-9);
    for via in &points[1..3] {
        assert!(closest_approach(&output, via) < 1e-9);
    }
}

#[test]
fn single_item_is_returned_unchanged() {
    let (items, _) = zigzag([0.0, 0.0, 0.0]);
    let single = vec![items[0].clone()];
    let output = BlendingStack::new().blend_sequence(&single).unwrap();
    assert_eq!(output, items[0].trajectory);
}

#[test]
fn overlapping_radii_are_rejected_before_blending() {
    let (items, _) = zigzag([1.5, 1.5, 0.0]);
    let err = BlendingStack::new().blend_sequence(&items).unwrap_err();
    assert_eq!(err, BlendError::OverlappingBlendRadii { index: 0 });
}

#[test]
fn nonzero_final_radius_is_rejected() {
    let (items, _) = zigzag([0.5, 0.5, 0.5]);
    let err = BlendingStack::new().blend_sequence(&items).unwrap_err();
    assert!(matches!(err, BlendError::InvalidSequence(_)));
}

#[test]
fn fixed_time_shift_is_rejected_for_longer_sequences() {
    let (items, _) = zigzag([0.5, 0.5, 0.0]);
    let mut stack = BlendingStack::new();
    let params = HashMap::from([("time_shift".to_string(), 2.5)]);
    stack.configure_blender(&params).unwrap();

    let err = stack.blend_sequence(&items).unwrap_err();
    assert!(matches!(err, BlendError::InvalidSequence(_)));

    // A single pair still honours the fixed shift
    let pair = vec![items[0].clone(), SequenceItem::new(items[1].trajectory.clone(), 0.0)];
    let output = stack.blend_sequence(&pair).unwrap();
    assert!(output.duration() < 6.0);
}
