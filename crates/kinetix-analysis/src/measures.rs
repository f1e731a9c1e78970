//! Biomechanical measures built on the geometry primitives.
//!
//! Every measure is gated on landmark visibility and returns `None` when a
//! required landmark is missing or not confident enough.

use kinetix_core::{
    angle, centroid, distance_2d, distance_3d, lean_from_vertical, midpoint, Frame, PoseLandmark,
    Position3D, Side,
};
use serde::{Deserialize, Serialize};

/// Fixed visibility gate of the canonical joint helpers.
/// Independent of the configurable timeline threshold.
pub const JOINT_VISIBILITY_THRESHOLD: f64 = 0.5;

/// Minimum confident torso landmarks for a center of mass
const MIN_TORSO_LANDMARKS: usize = 2;

/// Joints with a three-landmark angle definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Joint {
    Elbow,
    Shoulder,
    Knee,
    Hip,
}

impl Joint {
    /// (first, vertex, second) landmarks of the joint angle
    pub fn landmarks(&self, side: Side) -> (PoseLandmark, PoseLandmark, PoseLandmark) {
        match self {
            Joint::Elbow => (
                PoseLandmark::shoulder(side),
                PoseLandmark::elbow(side),
                PoseLandmark::wrist(side),
            ),
            Joint::Shoulder => (
                PoseLandmark::hip(side),
                PoseLandmark::shoulder(side),
                PoseLandmark::elbow(side),
            ),
            Joint::Knee => (
                PoseLandmark::hip(side),
                PoseLandmark::knee(side),
                PoseLandmark::ankle(side),
            ),
            Joint::Hip => (
                PoseLandmark::shoulder(side),
                PoseLandmark::hip(side),
                PoseLandmark::knee(side),
            ),
        }
    }

    /// Timeline label, e.g. `right_elbow`
    pub fn label(&self, side: Side) -> &'static str {
        self.landmarks(side).1.name()
    }

    /// Joint angle in degrees with an explicit visibility gate
    pub fn angle_with_threshold(&self, frame: &Frame, side: Side, threshold: f64) -> Option<f64> {
        let (a, vertex, b) = self.landmarks(side);
        let a = frame.visible(a, threshold)?;
        let vertex = frame.visible(vertex, threshold)?;
        let b = frame.visible(b, threshold)?;
        angle(&a.position(), &vertex.position(), &b.position())
    }

    /// Joint angle in degrees using the fixed 0.5 gate
    pub fn angle(&self, frame: &Frame, side: Side) -> Option<f64> {
        self.angle_with_threshold(frame, side, JOINT_VISIBILITY_THRESHOLD)
    }
}

pub fn elbow_angle(frame: &Frame, side: Side) -> Option<f64> {
    Joint::Elbow.angle(frame, side)
}

/// Angle between torso (hip) and upper arm (elbow) at the shoulder
pub fn shoulder_angle(frame: &Frame, side: Side) -> Option<f64> {
    Joint::Shoulder.angle(frame, side)
}

pub fn knee_angle(frame: &Frame, side: Side) -> Option<f64> {
    Joint::Knee.angle(frame, side)
}

pub fn hip_angle(frame: &Frame, side: Side) -> Option<f64> {
    Joint::Hip.angle(frame, side)
}

fn confident(frame: &Frame, kind: PoseLandmark) -> Option<Position3D> {
    frame
        .visible(kind, JOINT_VISIBILITY_THRESHOLD)
        .map(|l| l.position())
}

fn pair_midpoint(frame: &Frame, left: PoseLandmark, right: PoseLandmark) -> Option<Position3D> {
    Some(midpoint(&confident(frame, left)?, &confident(frame, right)?))
}

/// Torso lean from vertical in degrees [0, 90], hip midpoint → shoulder midpoint
pub fn torso_angle(frame: &Frame) -> Option<f64> {
    let shoulders = pair_midpoint(
        frame,
        PoseLandmark::LeftShoulder,
        PoseLandmark::RightShoulder,
    )?;
    let hips = pair_midpoint(frame, PoseLandmark::LeftHip, PoseLandmark::RightHip)?;
    Some(lean_from_vertical(&hips, &shoulders))
}

/// Image-plane shoulder width (depth is unreliable across the body)
pub fn shoulder_width(frame: &Frame) -> Option<f64> {
    let left = confident(frame, PoseLandmark::LeftShoulder)?;
    let right = confident(frame, PoseLandmark::RightShoulder)?;
    Some(distance_2d(&left, &right))
}

pub fn hip_width(frame: &Frame) -> Option<f64> {
    let left = confident(frame, PoseLandmark::LeftHip)?;
    let right = confident(frame, PoseLandmark::RightHip)?;
    Some(distance_2d(&left, &right))
}

/// Shoulder-to-wrist distance of one arm
pub fn arm_extension(frame: &Frame, side: Side) -> Option<f64> {
    let shoulder = confident(frame, PoseLandmark::shoulder(side))?;
    let wrist = confident(frame, PoseLandmark::wrist(side))?;
    Some(distance_3d(&shoulder, &wrist))
}

/// Mean of the confident shoulders and hips; needs at least two of the four
pub fn center_of_mass(frame: &Frame) -> Option<Position3D> {
    let points: Vec<Position3D> = [
        PoseLandmark::LeftShoulder,
        PoseLandmark::RightShoulder,
        PoseLandmark::LeftHip,
        PoseLandmark::RightHip,
    ]
    .into_iter()
    .filter_map(|kind| confident(frame, kind))
    .collect();

    if points.len() < MIN_TORSO_LANDMARKS {
        return None;
    }
    centroid(&points)
}
