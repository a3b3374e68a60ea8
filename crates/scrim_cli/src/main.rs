//! Scrim CLI
//!
//! Command-line companion for the scrim crates:
//! - `scrim edges` computes fade visibility for a set of scroll metrics
//! - `scrim simulate` replays a TOML scenario and prints one JSON line per step
//! - `scrim css` prints the colored-fade stylesheet

mod scenario;
mod simulator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use scrim_core::geometry::DEFAULT_EDGE_THRESHOLD;
use scrim_core::{compute_edge_visibility, AxisMetrics, ScrollMetrics};
use scrim_fade::{colored_fade_css, COLORED_FADE_CLASS};

use crate::scenario::Scenario;
use crate::simulator::Simulation;

/// Scroll edge fades and wheel ownership toolkit
#[derive(Parser)]
#[command(name = "scrim")]
#[command(about = "Edge-fade geometry and wheel ownership simulator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute which edges show a fade
    Edges {
        /// Vertical scroll offset
        #[arg(long, default_value = "0")]
        offset_y: f32,

        /// Vertical content height
        #[arg(long, default_value = "0")]
        content_y: f32,

        /// Vertical visible height
        #[arg(long, default_value = "0")]
        visible_y: f32,

        /// Horizontal scroll offset
        #[arg(long, default_value = "0")]
        offset_x: f32,

        /// Horizontal content width
        #[arg(long, default_value = "0")]
        content_x: f32,

        /// Horizontal visible width
        #[arg(long, default_value = "0")]
        visible_x: f32,

        /// Distance from an edge within which its fade stays hidden
        #[arg(long, default_value_t = DEFAULT_EDGE_THRESHOLD)]
        threshold: f32,
    },

    /// Replay a scenario file
    Simulate {
        /// Scenario file (TOML)
        file: PathBuf,

        /// Pretty-print each step report
        #[arg(long)]
        pretty: bool,
    },

    /// Print the colored-fade stylesheet
    Css {
        /// Class name the stylesheet targets
        #[arg(long, default_value = COLORED_FADE_CLASS)]
        class: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Edges {
            offset_y,
            content_y,
            visible_y,
            offset_x,
            content_x,
            visible_x,
            threshold,
        } => {
            let metrics = ScrollMetrics::new(
                AxisMetrics::new(offset_y, content_y, visible_y),
                AxisMetrics::new(offset_x, content_x, visible_x),
            );
            let visibility = compute_edge_visibility(&metrics, threshold);
            println!("{}", serde_json::to_string(&visibility)?);
        }
        Commands::Simulate { file, pretty } => {
            let scenario = Scenario::load(&file)?;
            tracing::info!(
                "Simulating {} ({} containers, {} steps)",
                file.display(),
                scenario.containers.len(),
                scenario.steps.len()
            );

            let reports = Simulation::run(&scenario)
                .with_context(|| format!("Simulation of {} failed", file.display()))?;
            for report in &reports {
                let line = if pretty {
                    serde_json::to_string_pretty(report)?
                } else {
                    serde_json::to_string(report)?
                };
                println!("{}", line);
            }
        }
        Commands::Css { class } => {
            print!("{}", colored_fade_css(&class));
        }
    }

    Ok(())
}
