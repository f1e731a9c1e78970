//! Kinetix CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kinetix_cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => commands::analyze(args)?,
        Commands::Drills(args) => commands::drills(args)?,
        Commands::Version => {
            println!("kinetix {}", env!("CARGO_PKG_VERSION"));
            println!(
                "Analysis engine version: {}",
                kinetix_analysis::ENGINE_VERSION
            );
            println!(
                "Built-in drills: {}",
                kinetix_drills::DrillCatalog::builtin().len()
            );
        }
    }

    Ok(())
}
