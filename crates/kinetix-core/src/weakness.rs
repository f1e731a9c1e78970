//! Biomechanical weakness records shared by the rule engine and the drill matcher.

use serde::{Deserialize, Serialize};

/// Weakness severity; declaration order is rank order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// high = 3, medium = 2, low = 1
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Area of technique a weakness belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaknessCategory {
    ContactPoint,
    ArmMechanics,
    Power,
    Timing,
    Jumping,
    Posture,
    Flexibility,
}

impl WeaknessCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaknessCategory::ContactPoint => "contact_point",
            WeaknessCategory::ArmMechanics => "arm_mechanics",
            WeaknessCategory::Power => "power",
            WeaknessCategory::Timing => "timing",
            WeaknessCategory::Jumping => "jumping",
            WeaknessCategory::Posture => "posture",
            WeaknessCategory::Flexibility => "flexibility",
        }
    }
}

/// The fixed set of issues the rule engine can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaknessIssue {
    #[serde(rename = "Low Contact Point")]
    LowContactPoint,
    #[serde(rename = "Incomplete Arm Extension")]
    IncompleteArmExtension,
    #[serde(rename = "Insufficient Arm Cocking")]
    InsufficientArmCocking,
    #[serde(rename = "Limited Extension Range")]
    LimitedExtensionRange,
    #[serde(rename = "Low Hand Speed")]
    LowHandSpeed,
    #[serde(rename = "Poor Velocity Timing")]
    PoorVelocityTiming,
    #[serde(rename = "Limited Vertical Jump")]
    LimitedVerticalJump,
    #[serde(rename = "Excessive Forward Lean")]
    ExcessiveForwardLean,
    #[serde(rename = "Slow Acceleration Phase")]
    SlowAccelerationPhase,
    #[serde(rename = "Prolonged Preparation")]
    ProlongedPreparation,
    #[serde(rename = "Weak Acceleration")]
    WeakAcceleration,
    #[serde(rename = "Limited Shoulder Range")]
    LimitedShoulderRange,
}

impl WeaknessIssue {
    pub fn title(&self) -> &'static str {
        match self {
            WeaknessIssue::LowContactPoint => "Low Contact Point",
            WeaknessIssue::IncompleteArmExtension => "Incomplete Arm Extension",
            WeaknessIssue::InsufficientArmCocking => "Insufficient Arm Cocking",
            WeaknessIssue::LimitedExtensionRange => "Limited Extension Range",
            WeaknessIssue::LowHandSpeed => "Low Hand Speed",
            WeaknessIssue::PoorVelocityTiming => "Poor Velocity Timing",
            WeaknessIssue::LimitedVerticalJump => "Limited Vertical Jump",
            WeaknessIssue::ExcessiveForwardLean => "Excessive Forward Lean",
            WeaknessIssue::SlowAccelerationPhase => "Slow Acceleration Phase",
            WeaknessIssue::ProlongedPreparation => "Prolonged Preparation",
            WeaknessIssue::WeakAcceleration => "Weak Acceleration",
            WeaknessIssue::LimitedShoulderRange => "Limited Shoulder Range",
        }
    }

    pub fn category(&self) -> WeaknessCategory {
        match self {
            WeaknessIssue::LowContactPoint => WeaknessCategory::ContactPoint,
            WeaknessIssue::IncompleteArmExtension
            | WeaknessIssue::InsufficientArmCocking
            | WeaknessIssue::LimitedExtensionRange => WeaknessCategory::ArmMechanics,
            WeaknessIssue::LowHandSpeed
            | WeaknessIssue::SlowAccelerationPhase
            | WeaknessIssue::WeakAcceleration => WeaknessCategory::Power,
            WeaknessIssue::PoorVelocityTiming | WeaknessIssue::ProlongedPreparation => {
                WeaknessCategory::Timing
            }
            WeaknessIssue::LimitedVerticalJump => WeaknessCategory::Jumping,
            WeaknessIssue::ExcessiveForwardLean => WeaknessCategory::Posture,
            WeaknessIssue::LimitedShoulderRange => WeaknessCategory::Flexibility,
        }
    }
}

/// Inclusive target interval for a measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalRange {
    pub min: f64,
    pub max: f64,
}

impl OptimalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// A measured deviation from an optimal range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weakness {
    pub category: WeaknessCategory,
    pub issue: WeaknessIssue,
    pub severity: Severity,
    pub detected_value: f64,
    pub optimal_range: OptimalRange,
    pub explanation: String,
}

impl Weakness {
    pub fn new(
        issue: WeaknessIssue,
        severity: Severity,
        detected_value: f64,
        optimal_range: OptimalRange,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            category: issue.category(),
            issue,
            severity,
            detected_value,
            optimal_range,
            explanation: explanation.into(),
        }
    }
}

/// Stable sort, most severe first; equal severities keep their order
pub fn sort_by_severity(weaknesses: &mut [Weakness]) {
    weaknesses.sort_by(|a, b| b.severity.rank().cmp(&a.severity.rank()));
}
