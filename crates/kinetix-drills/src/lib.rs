//! # Kinetix-Drills
//!
//! Training drill catalog and the recommendation matcher that turns the
//! rule engine's weaknesses into a short, prioritised drill plan.
//!
//! ## Matching
//!
//! ```text
//! Weakness[] (severity sorted)
//!     ↓ top 5
//! [IssueMappingStrategy]      curated ids for the issue
//!     ↓ fewer than 3?
//! [CategoryFallbackStrategy]  beginner → intermediate → any, by category
//!     ↓
//! DrillRecommendation { drills: 1..=3, priority }
//! ```

pub mod catalog;
pub mod matcher;

pub use catalog::*;
pub use matcher::*;
