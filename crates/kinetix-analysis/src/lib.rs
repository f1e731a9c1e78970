//! # Kinetix-Analysis
//!
//! Movement Analysis Engine: turns a time series of 33-landmark pose frames
//! into a structured performance report for an overhead striking motion.
//!
//! ## Pipeline
//!
//! 1. **Validate** - reject malformed frames at the boundary
//! 2. **Timelines** - dominant-wrist velocity and elbow/shoulder angles
//! 3. **Key moments** - peak velocity, maximum extension, peak height
//! 4. **Phases** - preparation, acceleration, contact, follow-through
//! 5. **Metrics** - scalar summary of the whole motion
//! 6. **Rules** - fixed battery of weakness checks, severity sorted
//! 7. **Drills** - up to five prioritised drill recommendations
//!
//! The engine is a pure, synchronous batch computation. Identical input
//! produces a byte-identical report.
//!
//! ## Null vs zero
//!
//! Velocity summaries degrade to `0` when no velocity sample exists.
//! Angles, ranges and positions degrade to `null`, and the rules branch on
//! that distinction.

pub mod analyzer;
pub mod config;
pub mod insights;
pub mod measures;
pub mod metrics;
pub mod moments;
pub mod phases;
pub mod report;
pub mod rules;
pub mod timeline;

pub use analyzer::*;
pub use config::*;
pub use measures::*;
pub use metrics::*;
pub use moments::*;
pub use phases::*;
pub use report::*;
pub use rules::*;
pub use timeline::*;
