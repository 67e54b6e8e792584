//! CN-017: CLI subcommands — generate, validate.

use crate::core::{pipeline, resolver, types::PipelineOptions};
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve datasets and generate all charts
    Generate {
        /// Primary data directory (first candidate for every dataset)
        #[arg(long, default_value = "output")]
        data_dir: PathBuf,

        /// Root of the output tree
        #[arg(long, default_value = "output")]
        out_dir: PathBuf,

        /// Truncation size for the ranked aggregates
        #[arg(long, default_value_t = 20)]
        top: usize,

        /// Interaction rows to fabricate in the synthetic batch
        #[arg(long, default_value_t = 100)]
        interactions: usize,

        /// Skip the user-analytics bar charts
        #[arg(long)]
        no_user_charts: bool,

        /// Skip the interactions-per-day line chart
        #[arg(long)]
        no_time_series: bool,

        /// Ignore on-disk data and use the synthetic batch
        #[arg(long)]
        synthetic: bool,
    },

    /// Probe candidate CSVs and check required columns without rendering
    Validate {
        /// Primary data directory
        #[arg(long, default_value = "output")]
        data_dir: PathBuf,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Generate {
            data_dir,
            out_dir,
            top,
            interactions,
            no_user_charts,
            no_time_series,
            synthetic,
        } => cmd_generate(PipelineOptions {
            data_dir,
            out_dir,
            user_charts: !no_user_charts,
            time_series: !no_time_series,
            top_n: top,
            synthetic_interactions: interactions,
            force_synthetic: synthetic,
        }),
        Commands::Validate { data_dir } => cmd_validate(&data_dir),
    }
}

fn cmd_generate(opts: PipelineOptions) -> Result<(), String> {
    let summary = pipeline::run(&opts)?;

    for chart in &summary.charts {
        println!("  + {}", chart.path.display());
    }
    for skip in &summary.skipped {
        println!("  - {} ({})", skip.chart, skip.reason);
    }

    println!();
    println!(
        "Charts: {} rendered, {} skipped, {} failed{}.",
        summary.charts.len(),
        summary.skipped.len(),
        summary.failures.len(),
        if summary.synthetic {
            " (synthetic data)"
        } else {
            ""
        }
    );

    if !summary.failures.is_empty() {
        return Err(format!("{} chart(s) failed", summary.failures.len()));
    }
    Ok(())
}

/// Required columns per dataset; users has none.
const REQUIRED_COLUMNS: [(&str, &[&str]); 3] = [
    (resolver::DS_RECIPE, &["recipe_id", "prep_time_min"]),
    (resolver::DS_INGREDIENTS, &["recipe_id", "name"]),
    (resolver::DS_INTERACTIONS, &["recipe_id", "type"]),
];

fn cmd_validate(data_dir: &Path) -> Result<(), String> {
    let mut errors = Vec::new();
    let mut any_required_absent = false;

    for (name, required) in REQUIRED_COLUMNS {
        match resolver::resolve(name, &resolver::candidate_paths(data_dir, name)) {
            Some(resolved) => {
                println!(
                    "OK: {} ({}, {} rows)",
                    name,
                    resolved.path.display(),
                    resolved.table.len()
                );
                for column in required {
                    if !resolved.table.has_column(column) {
                        errors.push(format!("{}: missing required column '{}'", name, column));
                    }
                }
            }
            None => {
                any_required_absent = true;
                println!("absent: {}", name);
            }
        }
    }

    match resolver::resolve(
        resolver::DS_USERS,
        &resolver::candidate_paths(data_dir, resolver::DS_USERS),
    ) {
        Some(resolved) => {
            let country = if resolved.table.has_column("country") {
                "with country column"
            } else {
                "no country column — users_by_country will be skipped"
            };
            println!(
                "OK: users ({}, {} rows, {})",
                resolved.path.display(),
                resolved.table.len(),
                country
            );
        }
        None => println!("absent: users (user charts will be skipped)"),
    }

    if any_required_absent {
        println!("Note: a missing required dataset replaces all three with a synthetic batch.");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        for e in &errors {
            eprintln!("  ERROR: {}", e);
        }
        Err(format!("{} validation error(s)", errors.len()))
    }
}
