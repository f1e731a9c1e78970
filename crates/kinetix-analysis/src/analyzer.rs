//! Movement analyzer orchestrating the full analysis pipeline.

use kinetix_core::{validate_frames, Frame, PoseRecording, Result};
use kinetix_drills::{DrillCatalog, DrillMatcher};

use crate::config::AnalysisConfig;
use crate::insights::generate_insights;
use crate::metrics::KeyMetrics;
use crate::moments::{detect_key_moments, KeyMoments};
use crate::phases::segment_phases;
use crate::report::{MovementReport, ReportMetadata};
use crate::rules::{detect_weaknesses, RuleContext};
use crate::timeline::{angle_timeline, velocity_timeline};

/// A single frame carries no motion; fewer frames yield a neutral report
/// with no weaknesses
const MIN_MOTION_FRAMES: usize = 2;

/// Stateless analysis engine; one call produces one report
#[derive(Debug, Clone)]
pub struct MovementAnalyzer<'c> {
    config: AnalysisConfig,
    catalog: &'c DrillCatalog,
}

impl MovementAnalyzer<'static> {
    /// Analyzer backed by the built-in drill catalog
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_catalog(config, DrillCatalog::builtin())
    }
}

impl Default for MovementAnalyzer<'static> {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl<'c> MovementAnalyzer<'c> {
    pub fn with_catalog(config: AnalysisConfig, catalog: &'c DrillCatalog) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze an ordered frame list
    pub fn analyze(&self, frames: &[Frame]) -> Result<MovementReport> {
        self.run(frames, ReportMetadata::new(frames, &self.config))
    }

    /// Analyze a full pose-extraction document, keeping its provenance
    pub fn analyze_recording(&self, recording: &PoseRecording) -> Result<MovementReport> {
        let metadata = ReportMetadata::new(&recording.frames, &self.config)
            .with_recording(recording);
        self.run(&recording.frames, metadata)
    }

    fn run(&self, frames: &[Frame], metadata: ReportMetadata) -> Result<MovementReport> {
        self.config.validate()?;
        if let Err(e) = validate_frames(frames) {
            tracing::warn!("Rejecting input: {}", e);
            return Err(e);
        }

        tracing::info!(
            frames = frames.len(),
            side = self.config.dominant_side.as_str(),
            "Analyzing movement"
        );

        let side = self.config.dominant_side;
        let velocity = velocity_timeline(frames, side, self.config.min_visibility);
        let angles = angle_timeline(frames, side, self.config.min_visibility);
        tracing::debug!(
            velocity_points = velocity.len(),
            angle_points = angles.len(),
            "timelines built"
        );

        let has_motion = frames.len() >= MIN_MOTION_FRAMES;
        let (moments, key_metrics) = if has_motion {
            (
                detect_key_moments(frames, &velocity, side),
                KeyMetrics::compute(frames, &velocity, &angles, side),
            )
        } else {
            tracing::debug!(frames = frames.len(), "too few frames for motion analysis");
            (KeyMoments::default(), KeyMetrics::default())
        };
        let phases = segment_phases(frames, &velocity, &moments);

        let weaknesses = if has_motion {
            detect_weaknesses(&RuleContext::new(&key_metrics, &phases, &moments))
        } else {
            Vec::new()
        };
        let recommendations = DrillMatcher::new(self.catalog).recommend(&weaknesses);
        tracing::debug!(
            count = recommendations.len(),
            "drill recommendations produced"
        );

        let insights = generate_insights(&key_metrics, &phases, &weaknesses);

        Ok(MovementReport {
            metadata,
            key_metrics,
            phases,
            key_moments: moments.into_vec(),
            velocity_timeline: velocity,
            angle_timeline: angles,
            insights,
            weaknesses,
            recommendations,
        })
    }
}
