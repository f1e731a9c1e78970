//! Key-moment detection over completed timelines.
//!
//! Each moment is an arg-max/arg-min with strict comparison, so the earliest
//! frame wins on exact ties. A moment whose source population is empty is
//! omitted.

use std::collections::BTreeMap;

use kinetix_core::{Frame, PoseLandmark, Side};
use serde::{Deserialize, Serialize};

use crate::measures::{arm_extension, center_of_mass, elbow_angle, JOINT_VISIBILITY_THRESHOLD};
use crate::timeline::VelocityPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MomentKind {
    #[serde(rename = "Peak Velocity")]
    PeakVelocity,
    #[serde(rename = "Maximum Extension")]
    MaximumExtension,
    #[serde(rename = "Peak Height")]
    PeakHeight,
}

impl MomentKind {
    pub fn label(&self) -> &'static str {
        match self {
            MomentKind::PeakVelocity => "Peak Velocity",
            MomentKind::MaximumExtension => "Maximum Extension",
            MomentKind::PeakHeight => "Peak Height",
        }
    }
}

/// A salient instant flagged by an extremal measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMoment {
    pub frame: u32,
    pub timestamp: f64,
    #[serde(rename = "label")]
    pub kind: MomentKind,
    pub description: String,
    /// Named measurements at this frame; ordered for stable output
    pub metrics: BTreeMap<String, f64>,
}

impl KeyMoment {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

/// Detected moments, sorted ascending by frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyMoments {
    pub moments: Vec<KeyMoment>,
}

impl KeyMoments {
    pub fn get(&self, kind: MomentKind) -> Option<&KeyMoment> {
        self.moments.iter().find(|m| m.kind == kind)
    }

    /// The contact instant is the peak-velocity moment
    pub fn contact(&self) -> Option<&KeyMoment> {
        self.get(MomentKind::PeakVelocity)
    }

    pub fn into_vec(self) -> Vec<KeyMoment> {
        self.moments
    }
}

/// Index and value of the first strict maximum
fn arg_max<I>(values: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    values.into_iter().fold(None, |best, (i, v)| match best {
        Some((_, b)) if v <= b => best,
        _ => Some((i, v)),
    })
}

/// Index and value of the first strict minimum
fn arg_min<I>(values: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    values.into_iter().fold(None, |best, (i, v)| match best {
        Some((_, b)) if v >= b => best,
        _ => Some((i, v)),
    })
}

fn frame_by_number(frames: &[Frame], frame_number: u32) -> Option<&Frame> {
    frames
        .binary_search_by_key(&frame_number, |f| f.frame_number)
        .ok()
        .map(|i| &frames[i])
}

fn insert_opt(metrics: &mut BTreeMap<String, f64>, name: &str, value: Option<f64>) {
    if let Some(value) = value {
        metrics.insert(name.to_string(), value);
    }
}

fn peak_velocity(frames: &[Frame], timeline: &[VelocityPoint], side: Side) -> Option<KeyMoment> {
    let (index, peak) = arg_max(timeline.iter().map(|p| p.velocity).enumerate())?;
    let point = &timeline[index];

    let mut metrics = BTreeMap::new();
    metrics.insert("velocity".to_string(), peak);

    if let Some(frame) = frame_by_number(frames, point.frame) {
        insert_opt(&mut metrics, "elbow_angle", elbow_angle(frame, side));
        insert_opt(
            &mut metrics,
            "body_height",
            center_of_mass(frame).map(|c| c.y),
        );
        insert_opt(
            &mut metrics,
            "wrist_height",
            frame
                .visible(PoseLandmark::wrist(side), JOINT_VISIBILITY_THRESHOLD)
                .map(|l| l.y),
        );
    }

    Some(KeyMoment {
        frame: point.frame,
        timestamp: point.timestamp,
        kind: MomentKind::PeakVelocity,
        description: format!("Fastest hand speed ({peak:.2} units/s), taken as the contact point"),
        metrics,
    })
}

fn maximum_extension(frames: &[Frame], side: Side) -> Option<KeyMoment> {
    let (index, extension) = arg_max(
        frames
            .iter()
            .enumerate()
            .filter_map(|(i, f)| arm_extension(f, side).map(|e| (i, e))),
    )?;
    let frame = &frames[index];

    let mut metrics = BTreeMap::new();
    metrics.insert("arm_extension".to_string(), extension);
    insert_opt(&mut metrics, "elbow_angle", elbow_angle(frame, side));

    Some(KeyMoment {
        frame: frame.frame_number,
        timestamp: frame.timestamp,
        kind: MomentKind::MaximumExtension,
        description: format!("Arm reaches furthest from the shoulder ({extension:.2})"),
        metrics,
    })
}

fn peak_height(frames: &[Frame]) -> Option<KeyMoment> {
    let (index, height) = arg_min(
        frames
            .iter()
            .enumerate()
            .filter_map(|(i, f)| center_of_mass(f).map(|c| (i, c.y))),
    )?;
    let frame = &frames[index];

    let mut metrics = BTreeMap::new();
    metrics.insert("body_height".to_string(), height);

    Some(KeyMoment {
        frame: frame.frame_number,
        timestamp: frame.timestamp,
        kind: MomentKind::PeakHeight,
        description: format!("Body reaches its highest point (y = {height:.2})"),
        metrics,
    })
}

/// Detect all key moments from the frames and the velocity timeline
pub fn detect_key_moments(frames: &[Frame], velocity: &[VelocityPoint], side: Side) -> KeyMoments {
    let mut moments: Vec<KeyMoment> = [
        peak_velocity(frames, velocity, side),
        maximum_extension(frames, side),
        peak_height(frames),
    ]
    .into_iter()
    .flatten()
    .collect();

    // Stable: moments sharing a frame keep detection order
    moments.sort_by_key(|m| m.frame);

    tracing::debug!(count = moments.len(), "key moments detected");

    KeyMoments { moments }
}
