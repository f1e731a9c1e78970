//! # Kinetix-Core
//!
//! Core types and utilities for the Kinetix movement analysis engine.
//!
//! The pose-extraction service delivers a per-frame series of 33 MediaPipe
//! body landmarks. This crate holds everything the analysis and drill crates
//! share: the landmark/frame vocabulary, geometry primitives, weakness
//! records and the common error type.

pub mod error;
pub mod geometry;
pub mod types;
pub mod weakness;

pub use error::{Error, Result};
pub use geometry::*;
pub use types::*;
pub use weakness::*;
