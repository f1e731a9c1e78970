//! Analyze and drills subcommands.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use kinetix_analysis::{AnalysisConfig, KeyMetrics, MovementAnalyzer, MovementReport};
use kinetix_core::{PoseRecording, Side};
use kinetix_drills::{Drill, DrillCatalog, DrillCategory};

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Pose-extraction JSON file (full document or bare frame array)
    pub input: PathBuf,

    /// Configuration file (TOML, JSON or YAML); KINETIX_* variables override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Minimum landmark visibility for the timelines (0.0-1.0)
    #[arg(long)]
    pub min_visibility: Option<f64>,

    /// Striking arm to track
    #[arg(long, value_enum)]
    pub dominant_side: Option<SideArg>,
}

/// Arguments for the drills command
#[derive(Args, Debug)]
pub struct DrillsArgs {
    /// Only list drills of this category (e.g. jumping, arm_swing)
    #[arg(short, long)]
    pub category: Option<String>,
}

/// Report output format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
    /// Human-readable tables
    Summary,
}

/// Body side argument enum for CLI
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SideArg {
    Left,
    Right,
}

impl From<SideArg> for Side {
    fn from(val: SideArg) -> Self {
        match val {
            SideArg::Left => Side::Left,
            SideArg::Right => Side::Right,
        }
    }
}

/// Execute the analyze command
pub fn analyze(args: AnalyzeArgs) -> Result<()> {
    let config = load_config(&args)?;

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let mut recording = PoseRecording::from_json(&raw)
        .with_context(|| format!("Failed to parse pose data in {}", args.input.display()))?;
    if recording.video_filename.is_none() {
        recording.video_filename = file_name(&args.input);
    }

    let report = MovementAnalyzer::new(config)
        .analyze_recording(&recording)
        .context("Movement analysis failed")?;

    if args.format == OutputFormat::Summary && args.output.is_some() {
        colored::control::set_override(false);
    }

    let rendered = match args.format {
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Pretty => report.to_json_pretty()?,
        OutputFormat::Summary => render_summary(&report)?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Execute the drills command
pub fn drills(args: DrillsArgs) -> Result<()> {
    let catalog = DrillCatalog::builtin();

    let selected: Vec<&Drill> = match args.category.as_deref() {
        Some(name) => {
            let Some(category) = DrillCategory::parse(name) else {
                let known: Vec<&str> = DrillCategory::ALL.iter().map(|c| c.as_str()).collect();
                bail!(
                    "Unknown drill category '{}'. Expected one of: {}",
                    name,
                    known.join(", ")
                );
            };
            catalog.by_category(category).collect()
        }
        None => catalog.iter().collect(),
    };

    println!("{}", "Training Drills".bold().cyan());
    println!("{}", drill_table(&selected));
    Ok(())
}

fn load_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(&path.to_string_lossy())
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AnalysisConfig::from_env().context("Failed to read KINETIX_* environment")?,
    };

    if let Some(min_visibility) = args.min_visibility {
        config.min_visibility = min_visibility;
    }
    if let Some(side) = args.dominant_side {
        config.dominant_side = side.into();
    }

    config.validate().context("Invalid analysis configuration")?;
    Ok(config)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.2}{unit}"),
        None => "-".to_string(),
    }
}

// ============================================================================
// Display Structs for Tables
// ============================================================================

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct PhaseRow {
    #[tabled(rename = "Phase")]
    name: &'static str,
    #[tabled(rename = "Frames")]
    frames: String,
    #[tabled(rename = "Duration (s)")]
    duration: String,
    #[tabled(rename = "Avg Velocity")]
    avg_velocity: String,
    #[tabled(rename = "Max Velocity")]
    max_velocity: String,
}

#[derive(Tabled)]
struct WeaknessRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Issue")]
    issue: &'static str,
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Severity")]
    severity: &'static str,
    #[tabled(rename = "Detected")]
    detected: String,
    #[tabled(rename = "Optimal")]
    optimal: String,
}

#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Priority")]
    priority: u32,
    #[tabled(rename = "Issue")]
    issue: &'static str,
    #[tabled(rename = "Drills")]
    drills: String,
}

#[derive(Tabled)]
struct DrillRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Difficulty")]
    difficulty: &'static str,
    #[tabled(rename = "Sets")]
    sets: String,
}

fn metric_row(name: &'static str, value: String) -> MetricRow {
    MetricRow { name, value }
}

fn metric_rows(m: &KeyMetrics) -> Vec<MetricRow> {
    let peak_frame = m
        .peak_velocity_frame
        .map_or_else(|| "-".to_string(), |f| f.to_string());
    let extension = m.arm_extension.map_or_else(
        || "-".to_string(),
        |e| format!("{:.2} - {:.2} (range {:.2})", e.min, e.max, e.range),
    );

    vec![
        metric_row("Peak velocity", format!("{:.2}", m.peak_velocity)),
        metric_row("Peak velocity frame", peak_frame),
        metric_row("Average velocity", format!("{:.2}", m.avg_velocity)),
        metric_row("Max elbow angle", fmt_opt(m.max_elbow_angle, "°")),
        metric_row("Min elbow angle", fmt_opt(m.min_elbow_angle, "°")),
        metric_row("Max shoulder angle", fmt_opt(m.max_shoulder_angle, "°")),
        metric_row("Arm extension", extension),
        metric_row("Jump height", fmt_opt(m.jump_height, "")),
        metric_row("Avg torso lean", fmt_opt(m.avg_torso_angle, "°")),
        metric_row("Avg shoulder width", fmt_opt(m.avg_shoulder_width, "")),
    ]
}

/// Human-readable summary of a report
pub fn render_summary(report: &MovementReport) -> Result<String> {
    let mut out = String::new();
    write_summary(&mut out, report).context("Failed to render summary")?;
    Ok(out)
}

fn write_summary(out: &mut String, report: &MovementReport) -> std::fmt::Result {
    let meta = &report.metadata;

    writeln!(out, "{}", "Movement Analysis Report".bold().cyan())?;
    if let Some(source) = &meta.source_filename {
        writeln!(out, "  Source:  {source}")?;
    }
    writeln!(
        out,
        "  Frames:  {} ({} with a subject), {:.2}s",
        meta.frame_count, meta.usable_frame_count, meta.duration_secs
    )?;
    writeln!(out, "  Side:    {}", meta.config.dominant_side.as_str())?;
    writeln!(out)?;

    writeln!(out, "{}", "Key Metrics:".bold())?;
    let mut metrics_table = Table::new(metric_rows(&report.key_metrics));
    writeln!(out, "{}", metrics_table.with(Style::rounded()))?;

    if !report.phases.is_empty() {
        let rows: Vec<PhaseRow> = report
            .phases
            .iter()
            .map(|p| PhaseRow {
                name: p.name.as_str(),
                frames: format!("{}-{}", p.start_frame, p.end_frame),
                duration: format!("{:.2}", p.duration),
                avg_velocity: format!("{:.2}", p.avg_velocity),
                max_velocity: format!("{:.2}", p.max_velocity),
            })
            .collect();
        writeln!(out)?;
        writeln!(out, "{}", "Phases:".bold())?;
        writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;
    }

    writeln!(out)?;
    match report.top_weakness() {
        None => writeln!(out, "{}", "No weaknesses detected".green().bold())?,
        Some(top) => {
            let rows: Vec<WeaknessRow> = report
                .weaknesses
                .iter()
                .enumerate()
                .map(|(i, w)| WeaknessRow {
                    rank: i + 1,
                    issue: w.issue.title(),
                    category: w.category.as_str(),
                    severity: w.severity.as_str(),
                    detected: format!("{:.2}", w.detected_value),
                    optimal: format!("{:.2} - {:.2}", w.optimal_range.min, w.optimal_range.max),
                })
                .collect();
            writeln!(
                out,
                "{} {}",
                "Weaknesses:".bold(),
                report.weaknesses.len().to_string().yellow().bold()
            )?;
            writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;
            writeln!(
                out,
                "  Focus first on: {} ({})",
                top.issue.title().red().bold(),
                top.severity.as_str()
            )?;
        }
    }

    if !report.recommendations.is_empty() {
        let rows: Vec<RecommendationRow> = report
            .recommendations
            .iter()
            .map(|r| RecommendationRow {
                priority: r.priority,
                issue: r.weakness.issue.title(),
                drills: r
                    .recommended_drills
                    .iter()
                    .map(|d| d.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();
        writeln!(out)?;
        writeln!(out, "{}", "Recommended Drills:".bold())?;
        writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;
    }

    if !report.insights.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "Insights:".bold())?;
        for insight in &report.insights {
            writeln!(out, "  - {insight}")?;
        }
    }

    Ok(())
}

fn drill_table(drills: &[&Drill]) -> String {
    let rows: Vec<DrillRow> = drills
        .iter()
        .map(|d| DrillRow {
            id: d.id.clone(),
            name: d.name.clone(),
            category: d.category.as_str(),
            difficulty: d.difficulty.as_str(),
            sets: d.sets.clone(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetix_core::{
        Frame, Landmark, OptimalRange, PoseLandmark, Severity, Weakness, WeaknessIssue,
    };

    fn report() -> MovementReport {
        let frames: Vec<Frame> = (0..6)
            .map(|n| {
                Frame::new(
                    n,
                    n as f64 / 30.0,
                    vec![Landmark::new(
                        PoseLandmark::RightWrist.index(),
                        0.5,
                        0.5 - 0.05 * n as f64,
                        0.0,
                        0.9,
                    )],
                )
            })
            .collect();
        MovementAnalyzer::default().analyze(&frames).unwrap()
    }

    #[test]
    fn test_summary_sections() {
        colored::control::set_override(false);
        let summary = render_summary(&report()).unwrap();
        assert!(summary.contains("Movement Analysis Report"));
        assert!(summary.contains("Key Metrics:"));
        assert!(summary.contains("Peak velocity"));
        assert!(summary.contains("Phases:"));
    }

    #[test]
    fn test_summary_names_top_weakness() {
        colored::control::set_override(false);
        let mut report = report();
        report.weaknesses = vec![
            Weakness::new(
                WeaknessIssue::LimitedShoulderRange,
                Severity::High,
                90.0,
                OptimalRange::new(120.0, 180.0),
                "",
            ),
            Weakness::new(
                WeaknessIssue::ProlongedPreparation,
                Severity::Low,
                1.5,
                OptimalRange::new(0.4, 1.2),
                "",
            ),
        ];

        let summary = render_summary(&report).unwrap();
        assert!(summary.contains("Weaknesses:"));
        assert!(summary.contains("Focus first on: Limited Shoulder Range (high)"));
    }

    #[test]
    fn test_missing_metrics_render_as_dash() {
        assert_eq!(fmt_opt(None, "°"), "-");
        assert_eq!(fmt_opt(Some(12.346), "°"), "12.35°");
    }

    #[test]
    fn test_drill_table_lists_ids() {
        let catalog = DrillCatalog::builtin();
        let jumping: Vec<&Drill> = catalog.by_category(DrillCategory::Jumping).collect();
        let table = drill_table(&jumping);
        assert!(table.contains("box-jumps"));
        assert!(!table.contains("sleeper-stretch"));
    }

    #[test]
    fn test_file_name_fallback() {
        let name = file_name(Path::new("/tmp/serve.json"));
        assert_eq!(name.as_deref(), Some("serve.json"));
    }
}
