//! Weakness-detection rule engine.
//!
//! A fixed battery of independent rules, evaluated in table order. Each rule
//! yields at most one [`Weakness`]; the result is stable-sorted by severity.
//! Velocity fields are never absent, so the speed rules always compare their
//! `0` default. Rules reading a phase that was not emitted, or a metric that is
//! `None`, stay silent.

use kinetix_core::{sort_by_severity, OptimalRange, Severity, Weakness, WeaknessIssue};

use crate::metrics::KeyMetrics;
use crate::moments::{KeyMoments, MomentKind};
use crate::phases::{find_phase, MovementPhase, PhaseName};

const CONTACT_HEIGHT_RANGE: OptimalRange = OptimalRange::new(0.0, 0.45);
const CONTACT_ELBOW_RANGE: OptimalRange = OptimalRange::new(160.0, 180.0);
const COCKING_RANGE: OptimalRange = OptimalRange::new(70.0, 100.0);
const EXTENSION_RANGE: OptimalRange = OptimalRange::new(0.25, 0.6);
const HAND_SPEED_RANGE: OptimalRange = OptimalRange::new(0.8, 3.0);
const TIMING_RANGE: OptimalRange = OptimalRange::new(0.0, 0.15);
const JUMP_RANGE: OptimalRange = OptimalRange::new(0.08, 0.3);
const LEAN_RANGE: OptimalRange = OptimalRange::new(0.0, 25.0);
const ACCEL_DURATION_RANGE: OptimalRange = OptimalRange::new(0.2, 0.6);
const PREP_DURATION_RANGE: OptimalRange = OptimalRange::new(0.4, 1.2);
const ACCEL_VELOCITY_RANGE: OptimalRange = OptimalRange::new(0.4, 2.0);
const SHOULDER_RANGE: OptimalRange = OptimalRange::new(120.0, 180.0);

/// Everything the rules may read
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub metrics: &'a KeyMetrics,
    pub phases: &'a [MovementPhase],
    pub moments: &'a KeyMoments,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        metrics: &'a KeyMetrics,
        phases: &'a [MovementPhase],
        moments: &'a KeyMoments,
    ) -> Self {
        Self {
            metrics,
            phases,
            moments,
        }
    }

    fn contact_metric(&self, name: &str) -> Option<f64> {
        self.moments.contact()?.metric(name)
    }

    fn phase(&self, name: PhaseName) -> Option<&'a MovementPhase> {
        find_phase(self.phases, name)
    }
}

pub type Rule = fn(&RuleContext<'_>) -> Option<Weakness>;

/// Rules in evaluation order; ties after sorting keep this order
pub const RULES: [Rule; 12] = [
    low_contact_point,
    incomplete_arm_extension,
    insufficient_arm_cocking,
    limited_extension_range,
    low_hand_speed,
    poor_velocity_timing,
    limited_vertical_jump,
    excessive_forward_lean,
    slow_acceleration_phase,
    prolonged_preparation,
    weak_acceleration,
    limited_shoulder_range,
];

/// Run every rule and sort the findings, most severe first
pub fn detect_weaknesses(ctx: &RuleContext<'_>) -> Vec<Weakness> {
    let mut weaknesses: Vec<Weakness> = RULES.iter().filter_map(|rule| rule(ctx)).collect();
    sort_by_severity(&mut weaknesses);

    tracing::debug!(count = weaknesses.len(), "weakness rules evaluated");

    weaknesses
}

fn low_contact_point(ctx: &RuleContext<'_>) -> Option<Weakness> {
    let height = ctx.contact_metric("body_height")?;
    if height <= 0.45 {
        return None;
    }
    let severity = if height > 0.55 {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(Weakness::new(
        WeaknessIssue::LowContactPoint,
        severity,
        height,
        CONTACT_HEIGHT_RANGE,
        format!("Body height at contact is {height:.2}; strike higher, at full reach"),
    ))
}

fn incomplete_arm_extension(ctx: &RuleContext<'_>) -> Option<Weakness> {
    let elbow = ctx.contact_metric("elbow_angle")?;
    if elbow >= 160.0 {
        return None;
    }
    let severity = if elbow < 150.0 {
        Severity::High
    } else if elbow < 155.0 {
        Severity::Medium
    } else {
        Severity::Low
    };
    Some(Weakness::new(
        WeaknessIssue::IncompleteArmExtension,
        severity,
        elbow,
        CONTACT_ELBOW_RANGE,
        format!("Elbow is bent to {elbow:.2} degrees at contact; straighten the arm"),
    ))
}

fn insufficient_arm_cocking(ctx: &RuleContext<'_>) -> Option<Weakness> {
    let min_elbow = ctx.metrics.min_elbow_angle?;
    if min_elbow <= 100.0 {
        return None;
    }
    let severity = if min_elbow > 120.0 {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(Weakness::new(
        WeaknessIssue::InsufficientArmCocking,
        severity,
        min_elbow,
        COCKING_RANGE,
        format!("Tightest elbow bend is only {min_elbow:.2} degrees; cock the arm deeper"),
    ))
}

fn limited_extension_range(ctx: &RuleContext<'_>) -> Option<Weakness> {
    let range = ctx.metrics.arm_extension?.range;
    if range >= 0.25 {
        return None;
    }
    let severity = if range < 0.20 {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(Weakness::new(
        WeaknessIssue::LimitedExtensionRange,
        severity,
        range,
        EXTENSION_RANGE,
        format!("Arm extension varies by only {range:.2}; the swing is cramped"),
    ))
}

fn low_hand_speed(ctx: &RuleContext<'_>) -> Option<Weakness> {
    let peak = ctx.metrics.peak_velocity;
    if peak >= 0.8 {
        return None;
    }
    let severity = if peak < 0.5 {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(Weakness::new(
        WeaknessIssue::LowHandSpeed,
        severity,
        peak,
        HAND_SPEED_RANGE,
        format!("Peak hand speed is {peak:.2} units/s; more arm speed means more power"),
    ))
}

fn poor_velocity_timing(ctx: &RuleContext<'_>) -> Option<Weakness> {
    let peak = ctx.moments.get(MomentKind::PeakVelocity)?;
    let extension = ctx.moments.get(MomentKind::MaximumExtension)?;
    let gap = (peak.timestamp - extension.timestamp).abs();
    if gap <= 0.15 {
        return None;
    }
    let severity = if gap > 0.25 {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(Weakness::new(
        WeaknessIssue::PoorVelocityTiming,
        severity,
        gap,
        TIMING_RANGE,
        format!("Peak speed and full extension are {gap:.2}s apart; align them at contact"),
    ))
}

fn limited_vertical_jump(ctx: &RuleContext<'_>) -> Option<Weakness> {
    let height = ctx.metrics.jump_height?;
    if height >= 0.08 {
        return None;
    }
    let severity = if height < 0.05 {
        Severity::Medium
    } else {
        Severity::Low
    };
    Some(Weakness::new(
        WeaknessIssue::LimitedVerticalJump,
        severity,
        height,
        JUMP_RANGE,
        format!("Center of mass rises only {height:.2}; jump higher to raise the contact"),
    ))
}

fn excessive_forward_lean(ctx: &RuleContext<'_>) -> Option<Weakness> {
    let lean = ctx.metrics.avg_torso_angle?;
    if lean <= 25.0 {
        return None;
    }
    let severity = if lean > 35.0 {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(Weakness::new(
        WeaknessIssue::ExcessiveForwardLean,
        severity,
        lean,
        LEAN_RANGE,
        format!("Torso leans {lean:.2} degrees from vertical; stay taller through the swing"),
    ))
}

fn slow_acceleration_phase(ctx: &RuleContext<'_>) -> Option<Weakness> {
    let duration = ctx.phase(PhaseName::Acceleration)?.duration;
    if duration <= 0.6 {
        return None;
    }
    let severity = if duration > 0.8 {
        Severity::Medium
    } else {
        Severity::Low
    };
    Some(Weakness::new(
        WeaknessIssue::SlowAccelerationPhase,
        severity,
        duration,
        ACCEL_DURATION_RANGE,
        format!("Acceleration takes {duration:.2}s; the arm swing should be snappier"),
    ))
}

fn prolonged_preparation(ctx: &RuleContext<'_>) -> Option<Weakness> {
    let duration = ctx.phase(PhaseName::Preparation)?.duration;
    if duration <= 1.2 {
        return None;
    }
    Some(Weakness::new(
        WeaknessIssue::ProlongedPreparation,
        Severity::Low,
        duration,
        PREP_DURATION_RANGE,
        format!("Preparation lasts {duration:.2}s; a long wind-up telegraphs the attack"),
    ))
}

fn weak_acceleration(ctx: &RuleContext<'_>) -> Option<Weakness> {
    let avg = ctx.phase(PhaseName::Acceleration)?.avg_velocity;
    if avg >= 0.4 {
        return None;
    }
    let severity = if avg < 0.3 {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(Weakness::new(
        WeaknessIssue::WeakAcceleration,
        severity,
        avg,
        ACCEL_VELOCITY_RANGE,
        format!("Hand averages {avg:.2} units/s while accelerating; drive into contact"),
    ))
}

fn limited_shoulder_range(ctx: &RuleContext<'_>) -> Option<Weakness> {
    let shoulder = ctx.metrics.max_shoulder_angle?;
    if shoulder >= 120.0 {
        return None;
    }
    let severity = if shoulder < 100.0 {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(Weakness::new(
        WeaknessIssue::LimitedShoulderRange,
        severity,
        shoulder,
        SHOULDER_RANGE,
        format!("Arm only opens {shoulder:.2} degrees from the torso; reach higher"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ExtensionRange;
    use crate::moments::KeyMoment;
    use std::collections::BTreeMap;

    fn moment(kind: MomentKind, frame: u32, timestamp: f64, metrics: &[(&str, f64)]) -> KeyMoment {
        KeyMoment {
            frame,
            timestamp,
            kind,
            description: String::new(),
            metrics: metrics
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn contact(metrics: &[(&str, f64)]) -> KeyMoments {
        KeyMoments {
            moments: vec![moment(MomentKind::PeakVelocity, 5, 0.5, metrics)],
        }
    }

    fn phase(name: PhaseName, duration: f64, avg_velocity: f64) -> MovementPhase {
        MovementPhase {
            name,
            start_frame: 0,
            end_frame: 1,
            duration,
            avg_velocity,
            max_velocity: avg_velocity,
            insights: Vec::new(),
        }
    }

    /// Metrics fast enough to keep the hand-speed rule quiet
    fn quick() -> KeyMetrics {
        KeyMetrics {
            peak_velocity: 2.0,
            peak_velocity_frame: Some(5),
            ..KeyMetrics::default()
        }
    }

    fn run(metrics: &KeyMetrics, phases: &[MovementPhase], moments: &KeyMoments) -> Vec<Weakness> {
        detect_weaknesses(&RuleContext::new(metrics, phases, moments))
    }

    fn severity_of(weaknesses: Vec<Weakness>, issue: WeaknessIssue) -> Option<Severity> {
        weaknesses
            .into_iter()
            .find(|w| w.issue == issue)
            .map(|w| w.severity)
    }

    #[test]
    fn test_contact_height_medium_band() {
        let moments = contact(&[("body_height", 0.50)]);
        let weaknesses = run(&quick(), &[], &moments);

        let found = weaknesses
            .iter()
            .find(|w| w.issue == WeaknessIssue::LowContactPoint)
            .unwrap();
        assert_eq!(found.severity, Severity::Medium);
        assert_eq!(found.detected_value, 0.50);
        assert_eq!(found.optimal_range, CONTACT_HEIGHT_RANGE);
        assert_eq!(found.category, kinetix_core::WeaknessCategory::ContactPoint);
    }

    #[test]
    fn test_contact_height_boundaries() {
        for (height, expected) in [
            (0.45, None),
            (0.55, Some(Severity::Medium)),
            (0.56, Some(Severity::High)),
        ] {
            let moments = contact(&[("body_height", height)]);
            let issue = WeaknessIssue::LowContactPoint;
            let found = severity_of(run(&quick(), &[], &moments), issue);
            assert_eq!(found, expected, "height {height}");
        }
    }

    #[test]
    fn test_elbow_extension_bands() {
        for (angle, expected) in [
            (149.0, Some(Severity::High)),
            (150.0, Some(Severity::Medium)),
            (152.0, Some(Severity::Medium)),
            (155.0, Some(Severity::Low)),
            (157.0, Some(Severity::Low)),
            (160.0, None),
        ] {
            let moments = contact(&[("elbow_angle", angle)]);
            let issue = WeaknessIssue::IncompleteArmExtension;
            let found = severity_of(run(&quick(), &[], &moments), issue);
            assert_eq!(found, expected, "angle {angle}");
        }
    }

    #[test]
    fn test_arm_cocking_bands() {
        for (min_elbow, expected) in [
            (100.0, None),
            (110.0, Some(Severity::Medium)),
            (120.0, Some(Severity::Medium)),
            (121.0, Some(Severity::High)),
        ] {
            let metrics = KeyMetrics {
                min_elbow_angle: Some(min_elbow),
                ..quick()
            };
            let issue = WeaknessIssue::InsufficientArmCocking;
            let found = severity_of(run(&metrics, &[], &KeyMoments::default()), issue);
            assert_eq!(found, expected, "min elbow {min_elbow}");
        }
    }

    #[test]
    fn test_extension_range_bands() {
        for (range, expected) in [
            (0.19, Some(Severity::High)),
            (0.20, Some(Severity::Medium)),
            (0.22, Some(Severity::Medium)),
            (0.25, None),
        ] {
            let metrics = KeyMetrics {
                arm_extension: Some(ExtensionRange {
                    min: 0.3,
                    max: 0.3 + range,
                    range,
                }),
                ..quick()
            };
            let issue = WeaknessIssue::LimitedExtensionRange;
            let found = severity_of(run(&metrics, &[], &KeyMoments::default()), issue);
            assert_eq!(found, expected, "range {range}");
        }
    }

    #[test]
    fn test_hand_speed_bands() {
        for (peak, expected) in [
            (0.0, Some(Severity::High)),
            (0.49, Some(Severity::High)),
            (0.5, Some(Severity::Medium)),
            (0.79, Some(Severity::Medium)),
            (0.8, None),
        ] {
            let metrics = KeyMetrics {
                peak_velocity: peak,
                ..KeyMetrics::default()
            };
            let issue = WeaknessIssue::LowHandSpeed;
            let found = severity_of(run(&metrics, &[], &KeyMoments::default()), issue);
            assert_eq!(found, expected, "peak {peak}");
        }
    }

    #[test]
    fn test_zero_velocity_is_measured_not_missing() {
        // No velocity samples at all still reads as a stationary hand
        let phases = vec![
            phase(PhaseName::Preparation, 0.1, 0.0),
            phase(PhaseName::Acceleration, 0.1, 0.0),
        ];
        let weaknesses = run(&KeyMetrics::default(), &phases, &KeyMoments::default());

        assert_eq!(
            weaknesses
                .iter()
                .map(|w| (w.issue, w.severity))
                .collect::<Vec<_>>(),
            vec![
                (WeaknessIssue::LowHandSpeed, Severity::High),
                (WeaknessIssue::WeakAcceleration, Severity::High),
            ]
        );
    }

    #[test]
    fn test_velocity_timing_bands() {
        for (gap, expected) in [
            (0.1, None),
            (0.2, Some(Severity::Medium)),
            (0.3, Some(Severity::High)),
        ] {
            let moments = KeyMoments {
                moments: vec![
                    moment(MomentKind::MaximumExtension, 2, 0.1, &[]),
                    moment(MomentKind::PeakVelocity, 10, 0.1 + gap, &[]),
                ],
            };
            let issue = WeaknessIssue::PoorVelocityTiming;
            let found = severity_of(run(&quick(), &[], &moments), issue);
            assert_eq!(found, expected, "gap {gap}");
        }
    }

    #[test]
    fn test_vertical_jump_bands() {
        for (height, expected) in [
            (0.04, Some(Severity::Medium)),
            (0.05, Some(Severity::Low)),
            (0.07, Some(Severity::Low)),
            (0.08, None),
        ] {
            let metrics = KeyMetrics {
                jump_height: Some(height),
                ..quick()
            };
            let issue = WeaknessIssue::LimitedVerticalJump;
            let found = severity_of(run(&metrics, &[], &KeyMoments::default()), issue);
            assert_eq!(found, expected, "jump {height}");
        }
    }

    #[test]
    fn test_forward_lean_bands() {
        for (lean, expected) in [
            (25.0, None),
            (30.0, Some(Severity::Medium)),
            (35.0, Some(Severity::Medium)),
            (36.0, Some(Severity::High)),
        ] {
            let metrics = KeyMetrics {
                avg_torso_angle: Some(lean),
                ..quick()
            };
            let issue = WeaknessIssue::ExcessiveForwardLean;
            let found = severity_of(run(&metrics, &[], &KeyMoments::default()), issue);
            assert_eq!(found, expected, "lean {lean}");
        }
    }

    #[test]
    fn test_acceleration_duration_bands() {
        for (duration, expected) in [
            (0.6, None),
            (0.7, Some(Severity::Low)),
            (0.8, Some(Severity::Low)),
            (0.9, Some(Severity::Medium)),
        ] {
            let phases = vec![phase(PhaseName::Acceleration, duration, 1.0)];
            let issue = WeaknessIssue::SlowAccelerationPhase;
            let found = severity_of(run(&quick(), &phases, &KeyMoments::default()), issue);
            assert_eq!(found, expected, "duration {duration}");
        }
    }

    #[test]
    fn test_preparation_duration_band() {
        for (duration, expected) in [(1.2, None), (1.3, Some(Severity::Low))] {
            let phases = vec![phase(PhaseName::Preparation, duration, 1.0)];
            let issue = WeaknessIssue::ProlongedPreparation;
            let found = severity_of(run(&quick(), &phases, &KeyMoments::default()), issue);
            assert_eq!(found, expected, "duration {duration}");
        }
    }

    #[test]
    fn test_acceleration_velocity_bands() {
        for (avg, expected) in [
            (0.29, Some(Severity::High)),
            (0.3, Some(Severity::Medium)),
            (0.39, Some(Severity::Medium)),
            (0.4, None),
        ] {
            let phases = vec![phase(PhaseName::Acceleration, 0.3, avg)];
            let issue = WeaknessIssue::WeakAcceleration;
            let found = severity_of(run(&quick(), &phases, &KeyMoments::default()), issue);
            assert_eq!(found, expected, "avg {avg}");
        }
    }

    #[test]
    fn test_shoulder_range_bands() {
        for (shoulder, expected) in [
            (99.0, Some(Severity::High)),
            (100.0, Some(Severity::Medium)),
            (119.0, Some(Severity::Medium)),
            (120.0, None),
        ] {
            let metrics = KeyMetrics {
                max_shoulder_angle: Some(shoulder),
                ..quick()
            };
            let issue = WeaknessIssue::LimitedShoulderRange;
            let found = severity_of(run(&metrics, &[], &KeyMoments::default()), issue);
            assert_eq!(found, expected, "shoulder {shoulder}");
        }
    }

    #[test]
    fn test_missing_inputs_stay_silent() {
        assert!(run(&quick(), &[], &KeyMoments::default()).is_empty());
    }

    #[test]
    fn test_sorted_by_severity_with_stable_ties() {
        let metrics = KeyMetrics {
            peak_velocity: 0.6,
            peak_velocity_frame: Some(3),
            min_elbow_angle: Some(110.0),
            max_shoulder_angle: Some(90.0),
            jump_height: Some(0.06),
            avg_torso_angle: Some(30.0),
            ..KeyMetrics::default()
        };
        let phases = vec![
            phase(PhaseName::Preparation, 1.5, 0.0),
            phase(PhaseName::Acceleration, 0.7, 0.35),
        ];
        let issues: Vec<WeaknessIssue> = run(&metrics, &phases, &KeyMoments::default())
            .into_iter()
            .map(|w| w.issue)
            .collect();

        assert_eq!(
            issues,
            vec![
                WeaknessIssue::LimitedShoulderRange,
                WeaknessIssue::InsufficientArmCocking,
                WeaknessIssue::LowHandSpeed,
                WeaknessIssue::ExcessiveForwardLean,
                WeaknessIssue::WeakAcceleration,
                WeaknessIssue::LimitedVerticalJump,
                WeaknessIssue::SlowAccelerationPhase,
                WeaknessIssue::ProlongedPreparation,
            ]
        );
    }
}
