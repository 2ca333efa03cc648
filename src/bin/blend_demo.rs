use anyhow::{Context, Result};
use log::{error, info};
use nalgebra::{UnitQuaternion, Vector3};
use prometheus_blend::{
    BlendError, BlendRequest, BlendingStack, DefaultBlender, SequenceItem, Trajectory,
    TrajectoryBlender, Waypoint,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;

const SAMPLING_PERIOD: f64 = 0.01;

/// Straight rest-to-rest move with a quintic time scaling, standing in for the planner
fn linear_move(
    from: Vector3<f64>,
    to: Vector3<f64>,
    yaw_from: f64,
    yaw_to: f64,
    duration: f64,
) -> Result<Trajectory, BlendError> {
    let samples = (duration / SAMPLING_PERIOD).round() as usize;
    let delta = to - from;
    let spin = Vector3::new(0.0, 0.0, yaw_to - yaw_from);

    let waypoints = (0..=samples)
        .map(|i| {
            let time = duration * i as f64 / samples as f64;
            let u = time / duration;
            let s = u * u * u * (10.0 + u * (6.0 * u - 15.0));
            let ds = 30.0 * u * u * (u - 1.0) * (u - 1.0) / duration;
            let dds = 60.0 * u * (u - 1.0) * (2.0 * u - 1.0) / (duration * duration);
            Waypoint {
                time,
                position: from + delta * s,
                orientation: UnitQuaternion::from_euler_angles(0.0, 0.0, yaw_from + spin.z * s),
                linear_velocity: delta * ds,
                angular_velocity: spin * ds,
                linear_acceleration: delta * dds,
            }
        })
        .collect();
    Trajectory::new(waypoints)
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    info!("Initializing blending demo...");

    let mut params = HashMap::new();
    params.insert("blend_radius".to_string(), 0.2);

    let mut blender = DefaultBlender::new();
    blender.configure(&params)?;
    let blender = Arc::new(blender);

    // Independent via-points; the last corner is too short for the radius
    let corners = [
        (Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 0.0)),
        (Vector3::new(0.0, 0.0, 0.5), Vector3::new(0.6, 0.6, 0.5), Vector3::new(1.2, 0.0, 0.5)),
        (Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.1, 0.0, 0.0), Vector3::new(0.1, 0.5, 0.0)),
    ];

    // One blocking task per via-point, no coordination needed between them
    let mut tasks = JoinSet::new();
    for (index, (start, via, goal)) in corners.into_iter().enumerate() {
        let blender = Arc::clone(&blender);
        tasks.spawn_blocking(move || -> Result<(usize, Trajectory)> {
            let first = linear_move(start, via, 0.0, 0.3, 2.0)?;
            let second = linear_move(via, goal, 0.3, 0.8, 2.0)?;
            let radius = blender.config().blend_radius;
            let blended = blender
                .blend(&BlendRequest::new(&first, &second, radius))
                .with_context(|| format!("corner {} could not be blended", index))?;
            Ok((index, blended))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok((index, trajectory)) => info!(
                "Corner {}: {} samples over {:.2} s",
                index,
                trajectory.len(),
                trajectory.duration()
            ),
            Err(e) => error!("{:#}", e),
        }
    }

    // A whole program through the blending stack
    let mut stack = BlendingStack::new();
    stack.configure_blender(&params)?;
    info!("Using blender: {}", stack.blender_name());

    let points = [
        Vector3::new(0.0, 0.0, 0.3),
        Vector3::new(0.8, 0.0, 0.3),
        Vector3::new(0.8, 0.8, 0.3),
        Vector3::new(0.0, 0.8, 0.6),
    ];
    let radii = [0.15, 0.15, 0.0];
    let items = (0..3)
        .map(|i| {
            let trajectory = linear_move(points[i], points[i + 1], 0.2 * i as f64, 0.2 * (i + 1) as f64, 1.5)?;
            Ok(SequenceItem::new(trajectory, radii[i]))
        })
        .collect::<Result<Vec<_>, BlendError>>()?;

    let program = stack
        .blend_sequence(&items)
        .context("blending the demo sequence failed")?;
    info!(
        "Sequence blended: {} samples over {:.2} s (unblended {:.2} s)",
        program.len(),
        program.duration(),
        items.iter().map(|item| item.trajectory.duration()).sum::<f64>()
    );

    Ok(())
}
