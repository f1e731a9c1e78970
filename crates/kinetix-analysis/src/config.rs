//! Analysis engine configuration.

use kinetix_core::{Error, Result, Side};
use serde::{Deserialize, Serialize};

/// Tunable engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum landmark visibility for a frame to enter the timelines
    pub min_visibility: f64,

    /// Smoothing window (frames); reserved, not used by the current rules
    pub smoothing_window: usize,

    /// Velocity noise floor; reserved, not used by the current rules
    pub velocity_threshold: f64,

    /// Striking arm tracked by the timelines and key moments
    pub dominant_side: Side,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_visibility: 0.5,
            smoothing_window: 3,
            velocity_threshold: 0.1,
            dominant_side: Side::Right,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from file, overridden by `KINETIX_*` environment variables
    pub fn from_file(path: &str) -> std::result::Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("KINETIX"))
            .build()?;

        settings.try_deserialize()
    }

    /// Load from environment variables
    pub fn from_env() -> std::result::Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("KINETIX"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(Error::Config(format!(
                "min_visibility must be within [0, 1], got {}",
                self.min_visibility
            )));
        }
        if self.smoothing_window == 0 {
            return Err(Error::Config(
                "smoothing_window must be at least 1".to_string(),
            ));
        }
        if !self.velocity_threshold.is_finite() || self.velocity_threshold < 0.0 {
            return Err(Error::Config(format!(
                "velocity_threshold must be a non-negative number, got {}",
                self.velocity_threshold
            )));
        }
        Ok(())
    }
}
