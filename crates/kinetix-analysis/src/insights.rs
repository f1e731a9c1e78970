//! Human-readable insight sentences.
//!
//! All numbers are printed with two decimals so the text is stable for a
//! given input.

use kinetix_core::Weakness;

use crate::metrics::KeyMetrics;
use crate::phases::{MovementPhase, PhaseName};

/// Acceleration-phase mean speed considered strong
const STRONG_ACCELERATION: f64 = 1.0;

/// One or two observations about a single phase
pub fn phase_insights(phase: &MovementPhase) -> Vec<String> {
    let mut insights = vec![format!(
        "{} spans frames {}-{} ({:.2}s)",
        phase.name.as_str(),
        phase.start_frame,
        phase.end_frame,
        phase.duration
    )];

    match phase.name {
        PhaseName::Preparation if phase.duration > 1.2 => {
            insights.push("Long wind-up, the approach may be losing rhythm".to_string());
        }
        PhaseName::Acceleration if phase.avg_velocity >= STRONG_ACCELERATION => {
            insights.push(format!(
                "Strong acceleration - hand averages {:.2} units/s",
                phase.avg_velocity
            ));
        }
        PhaseName::Acceleration if phase.max_velocity > 0.0 => {
            insights.push(format!(
                "Hand builds to {:.2} units/s before contact",
                phase.max_velocity
            ));
        }
        PhaseName::Contact if phase.max_velocity > 0.0 => {
            insights.push(format!(
                "Hand speed through contact peaks at {:.2} units/s",
                phase.max_velocity
            ));
        }
        PhaseName::FollowThrough if phase.avg_velocity > 0.0 => {
            insights.push(format!(
                "Arm decelerates at {:.2} units/s on average",
                phase.avg_velocity
            ));
        }
        _ => {}
    }

    insights
}

/// Report-level observations, in a fixed order
pub fn generate_insights(
    metrics: &KeyMetrics,
    phases: &[MovementPhase],
    weaknesses: &[Weakness],
) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some(frame) = metrics.peak_velocity_frame {
        insights.push(format!(
            "Peak hand speed of {:.2} units/s at frame {}",
            metrics.peak_velocity, frame
        ));
    }

    if let Some(extension) = metrics.arm_extension {
        insights.push(format!(
            "Arm extension ranges from {:.2} to {:.2} (range {:.2})",
            extension.min, extension.max, extension.range
        ));
    }

    if let Some(height) = metrics.jump_height {
        insights.push(format!("Center of mass rises {height:.2} during the jump"));
    }

    if let Some(lean) = metrics.avg_torso_angle {
        insights.push(format!("Average torso lean of {lean:.2} degrees"));
    }

    if !phases.is_empty() {
        insights.push(format!("{} movement phases identified", phases.len()));
    }

    match weaknesses.first() {
        Some(top) => {
            insights.push(format!("{} areas for improvement detected", weaknesses.len()));
            insights.push(format!(
                "Top priority: {} ({} severity)",
                top.issue.title(),
                top.severity.as_str()
            ));
        }
        None if metrics.peak_velocity_frame.is_some() => {
            insights.push("No technique weaknesses detected".to_string());
        }
        None => {}
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetix_core::{OptimalRange, Severity, WeaknessIssue};

    fn phase(name: PhaseName, duration: f64, avg: f64, max: f64) -> MovementPhase {
        MovementPhase {
            name,
            start_frame: 0,
            end_frame: 10,
            duration,
            avg_velocity: avg,
            max_velocity: max,
            insights: Vec::new(),
        }
    }

    #[test]
    fn test_phase_insights_bounded() {
        for name in [
            PhaseName::Preparation,
            PhaseName::Acceleration,
            PhaseName::Contact,
            PhaseName::FollowThrough,
        ] {
            for (duration, avg, max) in [(0.0, 0.0, 0.0), (2.0, 1.5, 3.0), (0.3, 0.5, 0.9)] {
                let insights = phase_insights(&phase(name, duration, avg, max));
                assert!((1..=2).contains(&insights.len()));
            }
        }
    }

    #[test]
    fn test_two_decimal_formatting() {
        let insights = phase_insights(&phase(PhaseName::Acceleration, 0.3333, 1.23456, 2.0));
        assert_eq!(insights[0], "Acceleration spans frames 0-10 (0.33s)");
        assert_eq!(
            insights[1],
            "Strong acceleration - hand averages 1.23 units/s"
        );
    }

    #[test]
    fn test_empty_report_has_no_insights() {
        assert!(generate_insights(&KeyMetrics::default(), &[], &[]).is_empty());
    }

    #[test]
    fn test_top_priority_named() {
        let weaknesses = vec![Weakness::new(
            WeaknessIssue::LowHandSpeed,
            Severity::High,
            0.4,
            OptimalRange::new(0.8, 3.0),
            "",
        )];
        let metrics = KeyMetrics {
            peak_velocity: 0.4,
            peak_velocity_frame: Some(3),
            ..KeyMetrics::default()
        };
        let insights = generate_insights(&metrics, &[], &weaknesses);
        assert_eq!(insights[0], "Peak hand speed of 0.40 units/s at frame 3");
        assert_eq!(
            insights.last().unwrap(),
            "Top priority: Low Hand Speed (high severity)"
        );
    }
}
