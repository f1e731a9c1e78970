//! The movement report: aggregate output of one analysis run.

use chrono::{DateTime, Utc};
use kinetix_core::{Frame, PoseRecording, Result, Weakness};
use kinetix_drills::DrillRecommendation;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::metrics::KeyMetrics;
use crate::moments::KeyMoment;
use crate::phases::MovementPhase;
use crate::timeline::{AnglePoint, VelocityPoint};

/// Engine version stamped into every report
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Provenance of a report. Carries no wall-clock values of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub engine_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_filename: Option<String>,
    /// When the pose extractor processed the video, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    pub frame_count: usize,
    /// Frames with at least one landmark
    pub usable_frame_count: usize,
    pub duration_secs: f64,
    pub config: AnalysisConfig,
}

impl ReportMetadata {
    pub fn new(frames: &[Frame], config: &AnalysisConfig) -> Self {
        let duration_secs = match (frames.first(), frames.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        };

        Self {
            engine_version: ENGINE_VERSION.to_string(),
            source_filename: None,
            processed_at: None,
            fps: None,
            frame_count: frames.len(),
            usable_frame_count: frames.iter().filter(|f| f.has_subject()).count(),
            duration_secs,
            config: config.clone(),
        }
    }

    /// Copy the extractor's provenance fields
    pub fn with_recording(mut self, recording: &PoseRecording) -> Self {
        self.source_filename = recording.video_filename.clone();
        self.processed_at = recording.processed_at;
        self.fps = recording.fps();
        self
    }
}

/// Complete analysis of one recorded motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementReport {
    pub metadata: ReportMetadata,
    pub key_metrics: KeyMetrics,
    pub phases: Vec<MovementPhase>,
    pub key_moments: Vec<KeyMoment>,
    pub velocity_timeline: Vec<VelocityPoint>,
    pub angle_timeline: Vec<AnglePoint>,
    pub insights: Vec<String>,
    pub weaknesses: Vec<Weakness>,
    pub recommendations: Vec<DrillRecommendation>,
}

impl MovementReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Most severe weakness, if any
    pub fn top_weakness(&self) -> Option<&Weakness> {
        self.weaknesses.first()
    }
}
