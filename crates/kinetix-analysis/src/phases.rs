//! Phase segmentation anchored on the peak-velocity frame.
//!
//! ```text
//! start ─── prepEnd │ prepEnd+1 ─── peak │ peak+1 ─── contactEnd │ contactEnd+1 ─── end
//!   Preparation          Acceleration          Contact               Follow-through
//! ```
//!
//! `prepEnd = floor(peak − 0.30 · (peak − start))` and
//! `contactEnd = min(floor(peak + 0.40 · (end − peak)), end)`. Emitted phases
//! partition `[start, end]` with no gap or overlap; empty ranges are dropped.

use kinetix_core::Frame;
use serde::{Deserialize, Serialize};

use crate::insights::phase_insights;
use crate::moments::KeyMoments;
use crate::timeline::VelocityPoint;

/// Share of the start→peak span given to preparation
pub const PREPARATION_FRACTION: f64 = 0.30;

/// Share of the peak→end span given to contact
pub const CONTACT_FRACTION: f64 = 0.40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseName {
    Preparation,
    Acceleration,
    Contact,
    #[serde(rename = "Follow-through")]
    FollowThrough,
}

impl PhaseName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseName::Preparation => "Preparation",
            PhaseName::Acceleration => "Acceleration",
            PhaseName::Contact => "Contact",
            PhaseName::FollowThrough => "Follow-through",
        }
    }
}

/// A named, contiguous frame range of the motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementPhase {
    pub name: PhaseName,
    pub start_frame: u32,
    pub end_frame: u32,
    /// Seconds between the first and last input frame inside the range
    pub duration: f64,
    pub avg_velocity: f64,
    pub max_velocity: f64,
    pub insights: Vec<String>,
}

/// Inclusive frame ranges of the four phases; ranges may be empty (`start > end`)
pub fn phase_ranges(start: u32, end: u32, peak: u32) -> [(PhaseName, i64, i64); 4] {
    let start = i64::from(start);
    let end = i64::from(end);
    let peak = i64::from(peak).clamp(start, end);

    let prep_span = PREPARATION_FRACTION * (peak - start) as f64;
    let prep_end = (peak as f64 - prep_span).floor() as i64;
    let contact_span = CONTACT_FRACTION * (end - peak) as f64;
    let contact_end = ((peak as f64 + contact_span).floor() as i64).min(end);

    [
        (PhaseName::Preparation, start, prep_end),
        (PhaseName::Acceleration, prep_end + 1, peak),
        (PhaseName::Contact, peak + 1, contact_end),
        (PhaseName::FollowThrough, contact_end + 1, end),
    ]
}

/// Peak-velocity frame, else the median velocity sample, else the range midpoint
fn anchor_frame(start: u32, end: u32, velocity: &[VelocityPoint], moments: &KeyMoments) -> u32 {
    if let Some(contact) = moments.contact() {
        return contact.frame;
    }
    if let Some(median) = velocity.get(velocity.len() / 2) {
        return median.frame;
    }
    start + (end - start) / 2
}

fn span_duration(frames: &[Frame], from: i64, to: i64) -> f64 {
    let mut inside = frames.iter().filter(|f| {
        let n = i64::from(f.frame_number);
        n >= from && n <= to
    });
    match (inside.next(), inside.last()) {
        (Some(first), Some(last)) => last.timestamp - first.timestamp,
        _ => 0.0,
    }
}

fn velocity_stats(velocity: &[VelocityPoint], from: i64, to: i64) -> (f64, f64) {
    let samples: Vec<f64> = velocity
        .iter()
        .filter(|p| {
            let n = i64::from(p.frame);
            n >= from && n <= to
        })
        .map(|p| p.velocity)
        .collect();

    if samples.is_empty() {
        return (0.0, 0.0);
    }
    let avg = samples.iter().sum::<f64>() / samples.len() as f64;
    let max = samples.iter().copied().fold(0.0, f64::max);
    (avg, max)
}

/// Split the frame range into the four motion phases
pub fn segment_phases(
    frames: &[Frame],
    velocity: &[VelocityPoint],
    moments: &KeyMoments,
) -> Vec<MovementPhase> {
    if frames.len() < 2 {
        return Vec::new();
    }
    let (start, end) = match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => (first.frame_number, last.frame_number),
        _ => return Vec::new(),
    };

    let peak = anchor_frame(start, end, velocity, moments);

    let phases: Vec<MovementPhase> = phase_ranges(start, end, peak)
        .into_iter()
        .filter(|(_, from, to)| from <= to)
        .map(|(name, from, to)| {
            let (avg_velocity, max_velocity) = velocity_stats(velocity, from, to);
            let mut phase = MovementPhase {
                name,
                start_frame: from as u32,
                end_frame: to as u32,
                duration: span_duration(frames, from, to),
                avg_velocity,
                max_velocity,
                insights: Vec::new(),
            };
            phase.insights = phase_insights(&phase);
            phase
        })
        .collect();

    tracing::debug!(anchor = peak, count = phases.len(), "phases segmented");

    phases
}

pub fn find_phase(phases: &[MovementPhase], name: PhaseName) -> Option<&MovementPhase> {
    phases.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frames(count: u32) -> Vec<Frame> {
        (0..count)
            .map(|n| Frame::new(n, n as f64 / 30.0, vec![]))
            .collect()
    }

    fn point(frame: u32, velocity: f64) -> VelocityPoint {
        VelocityPoint {
            frame,
            timestamp: frame as f64 / 30.0,
            velocity,
            body_part: "right_wrist".to_string(),
        }
    }

    #[test]
    fn test_boundary_arithmetic() {
        let ranges = phase_ranges(0, 100, 50);
        assert_eq!(ranges[0], (PhaseName::Preparation, 0, 35));
        assert_eq!(ranges[1], (PhaseName::Acceleration, 36, 50));
        assert_eq!(ranges[2], (PhaseName::Contact, 51, 70));
        assert_eq!(ranges[3], (PhaseName::FollowThrough, 71, 100));
    }

    #[test]
    fn test_phases_partition_range() {
        let frames = frames(10);
        let velocity: Vec<VelocityPoint> = (1..10).map(|n| point(n, n as f64 * 0.1)).collect();
        let phases = segment_phases(&frames, &velocity, &KeyMoments::default());

        assert_eq!(phases.first().unwrap().start_frame, 0);
        assert_eq!(phases.last().unwrap().end_frame, 9);
        for pair in phases.windows(2) {
            assert_eq!(pair[0].end_frame + 1, pair[1].start_frame);
        }
        assert!(phases
            .iter()
            .all(|p| !p.insights.is_empty() && p.insights.len() <= 2));
    }

    #[test]
    fn test_velocity_stats_and_duration() {
        let frames = frames(10);
        let velocity = vec![point(3, 1.0), point(4, 3.0)];
        let phases = segment_phases(&frames, &velocity, &KeyMoments::default());

        // Median anchor is frame 4: prep [0, 2], accel [3, 4]
        let accel = find_phase(&phases, PhaseName::Acceleration).unwrap();
        assert_eq!((accel.start_frame, accel.end_frame), (3, 4));
        assert_relative_eq!(accel.avg_velocity, 2.0);
        assert_relative_eq!(accel.max_velocity, 3.0);
        assert_relative_eq!(accel.duration, 1.0 / 30.0, epsilon = 1e-12);

        let prep = find_phase(&phases, PhaseName::Preparation).unwrap();
        assert_eq!(prep.avg_velocity, 0.0);
        assert_eq!(prep.max_velocity, 0.0);
    }

    #[test]
    fn test_midpoint_anchor_without_velocity() {
        let phases = segment_phases(&frames(5), &[], &KeyMoments::default());
        // Anchor 2: prep [0, 1], accel [2, 2], contact none, follow [3, 4]
        let names: Vec<PhaseName> = phases.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                PhaseName::Preparation,
                PhaseName::Acceleration,
                PhaseName::FollowThrough,
            ]
        );
    }

    #[test]
    fn test_too_few_frames() {
        assert!(segment_phases(&[], &[], &KeyMoments::default()).is_empty());
        let single = segment_phases(&frames(1), &[], &KeyMoments::default());
        assert!(single.is_empty());
    }

    #[test]
    fn test_follow_through_label() {
        let json = serde_json::to_string(&PhaseName::FollowThrough).unwrap();
        assert_eq!(json, "\"Follow-through\"");
    }
}
