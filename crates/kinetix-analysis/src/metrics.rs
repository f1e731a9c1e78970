//! Scalar summary of a whole motion.

use kinetix_core::{Frame, Side};
use serde::{Deserialize, Serialize};

use crate::measures::{arm_extension, center_of_mass, shoulder_width, torso_angle, Joint};
use crate::timeline::{AnglePoint, VelocityPoint};

/// Shoulder-to-wrist distance span over the motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtensionRange {
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

/// Frames bracketing the measured jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpFrames {
    /// Lowest center of mass at or before the peak
    pub takeoff: u32,
    pub peak: u32,
}

/// Summary metrics.
///
/// Velocity fields default to `0`; every other field is `None` when no frame
/// produced a valid measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub peak_velocity: f64,
    pub peak_velocity_frame: Option<u32>,
    pub avg_velocity: f64,
    pub max_elbow_angle: Option<f64>,
    pub min_elbow_angle: Option<f64>,
    pub max_shoulder_angle: Option<f64>,
    pub arm_extension: Option<ExtensionRange>,
    pub jump_height: Option<f64>,
    pub jump_frames: Option<JumpFrames>,
    pub avg_torso_angle: Option<f64>,
    pub avg_shoulder_width: Option<f64>,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

fn joint_angles(angles: &[AnglePoint], label: &str) -> Vec<f64> {
    angles
        .iter()
        .filter(|p| p.joint == label)
        .filter_map(|p| p.angle)
        .collect()
}

fn jump(frames: &[Frame]) -> Option<(f64, JumpFrames)> {
    let heights: Vec<(u32, f64)> = frames
        .iter()
        .filter_map(|f| center_of_mass(f).map(|c| (f.frame_number, c.y)))
        .collect();

    // Smaller y is higher in the image; first minimum wins
    let (peak_index, &(peak_frame, peak_y)) = heights
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, &(u32, f64))>, (i, h)| match best {
            Some((_, b)) if h.1 >= b.1 => best,
            _ => Some((i, h)),
        })?;

    let &(takeoff_frame, takeoff_y) = heights[..=peak_index]
        .iter()
        .fold(None, |best: Option<&(u32, f64)>, h| match best {
            Some(b) if h.1 <= b.1 => best,
            _ => Some(h),
        })?;

    Some((
        takeoff_y - peak_y,
        JumpFrames {
            takeoff: takeoff_frame,
            peak: peak_frame,
        },
    ))
}

impl KeyMetrics {
    /// Reduce frames and timelines into the summary
    pub fn compute(
        frames: &[Frame],
        velocity: &[VelocityPoint],
        angles: &[AnglePoint],
        side: Side,
    ) -> Self {
        let mut metrics = KeyMetrics::default();

        for point in velocity {
            if metrics.peak_velocity_frame.is_none() || point.velocity > metrics.peak_velocity {
                metrics.peak_velocity = point.velocity;
                metrics.peak_velocity_frame = Some(point.frame);
            }
        }
        let speeds: Vec<f64> = velocity.iter().map(|p| p.velocity).collect();
        metrics.avg_velocity = mean(&speeds).unwrap_or(0.0);

        let elbow = joint_angles(angles, Joint::Elbow.label(side));
        if let Some((lo, hi)) = min_max(&elbow) {
            metrics.min_elbow_angle = Some(lo);
            metrics.max_elbow_angle = Some(hi);
        }
        let shoulder = joint_angles(angles, Joint::Shoulder.label(side));
        metrics.max_shoulder_angle = min_max(&shoulder).map(|(_, hi)| hi);

        let extensions: Vec<f64> = frames
            .iter()
            .filter_map(|f| arm_extension(f, side))
            .collect();
        metrics.arm_extension = min_max(&extensions).map(|(min, max)| ExtensionRange {
            min,
            max,
            range: max - min,
        });

        if let Some((height, jump_frames)) = jump(frames) {
            metrics.jump_height = Some(height);
            metrics.jump_frames = Some(jump_frames);
        }

        let torso: Vec<f64> = frames.iter().filter_map(torso_angle).collect();
        metrics.avg_torso_angle = mean(&torso);
        let widths: Vec<f64> = frames.iter().filter_map(shoulder_width).collect();
        metrics.avg_shoulder_width = mean(&widths);

        metrics
    }
}
