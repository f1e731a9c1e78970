//! Frame-indexed measurement series.

use kinetix_core::{velocity, Frame, PoseLandmark, Side};
use serde::{Deserialize, Serialize};

use crate::measures::Joint;

/// Joints tracked by the angle timeline, in per-frame emission order
pub const TRACKED_JOINTS: [Joint; 2] = [Joint::Elbow, Joint::Shoulder];

/// Speed of the tracked landmark between two consecutive frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityPoint {
    /// Frame number of the later frame of the pair
    pub frame: u32,
    pub timestamp: f64,
    pub velocity: f64,
    pub body_part: String,
}

/// Joint angle at one frame; `angle` is `None` when landmarks are not confident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnglePoint {
    pub frame: u32,
    pub timestamp: f64,
    pub angle: Option<f64>,
    pub joint: String,
}

/// Dominant-wrist velocity over consecutive frame pairs.
///
/// A pair is skipped when the wrist is below `min_visibility` in either
/// frame, so the series may have gaps; nothing is interpolated.
pub fn velocity_timeline(frames: &[Frame], side: Side, min_visibility: f64) -> Vec<VelocityPoint> {
    let wrist = PoseLandmark::wrist(side);

    frames
        .windows(2)
        .filter_map(|pair| {
            let (prev, next) = (&pair[0], &pair[1]);
            let a = prev.visible(wrist, min_visibility)?;
            let b = next.visible(wrist, min_visibility)?;
            let dt = next.timestamp - prev.timestamp;

            Some(VelocityPoint {
                frame: next.frame_number,
                timestamp: next.timestamp,
                velocity: velocity(&a.position(), &b.position(), dt),
                body_part: wrist.name().to_string(),
            })
        })
        .collect()
}

/// One entry per frame per tracked joint, elbow before shoulder
pub fn angle_timeline(frames: &[Frame], side: Side, min_visibility: f64) -> Vec<AnglePoint> {
    let mut points = Vec::with_capacity(frames.len() * TRACKED_JOINTS.len());

    for frame in frames {
        for joint in TRACKED_JOINTS {
            points.push(AnglePoint {
                frame: frame.frame_number,
                timestamp: frame.timestamp,
                angle: joint.angle_with_threshold(frame, side, min_visibility),
                joint: joint.label(side).to_string(),
            });
        }
    }

    points
}
