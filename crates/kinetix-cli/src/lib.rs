//! Kinetix CLI
//!
//! Command-line interface for the movement analysis engine. Reads the JSON
//! document written by the pose extractor and prints or saves the movement
//! report.
//!
//! # Usage
//!
//! ```bash
//! # Full JSON report on stdout
//! kinetix analyze serve.json
//!
//! # Coloured summary tables for a left-handed player
//! kinetix analyze serve.json --format summary --dominant-side left
//!
//! # Browse the drill catalog
//! kinetix drills --category jumping
//! ```

use clap::{Parser, Subcommand};

pub mod commands;

/// Kinetix Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "kinetix")]
#[command(
    author,
    version,
    about = "Biomechanical analysis of overhead striking motions"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a pose-extraction JSON file
    Analyze(commands::AnalyzeArgs),

    /// List the built-in training drills
    Drills(commands::DrillsArgs),

    /// Display version information
    Version,
}
