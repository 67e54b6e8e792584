//! CN-006: Pipeline orchestration — resolve, aggregate, render, report.
//!
//! One parametrized pass: resolve the batch (or synthesize it), then run
//! every enabled aggregate through an isolation boundary so a single
//! failure never blocks the rest. The only fatal paths are output-tree
//! setup and the final text artifacts.

use std::path::{Path, PathBuf};

use super::aggregate;
use super::resolver;
use super::table::Table;
use super::types::{
    ChartArtifact, ChartFailure, ChartSkip, PipelineEvent, PipelineOptions, RunSummary,
};
use crate::charts;
use crate::report::{self, eventlog};

/// Chart and artifact file names, fixed by contract.
pub const TOP_INGREDIENTS_PNG: &str = "top_ingredients.png";
pub const PREP_TIME_HISTOGRAM_PNG: &str = "prep_time_histogram.png";
pub const PREP_VS_LIKES_PNG: &str = "prep_vs_likes_scatter.png";
pub const USERS_BY_COUNTRY_PNG: &str = "users_by_country.png";
pub const TOP_USERS_PNG: &str = "top_users_by_interactions.png";
pub const INTERACTIONS_PER_DAY_PNG: &str = "interactions_per_day.png";
pub const PREVIEW_CSV: &str = "top_ingredients_preview.csv";
pub const README_FILE: &str = "README_charts.txt";

/// Bin count for the prep-time histogram.
const HISTOGRAM_BINS: usize = 10;

/// Shared bookkeeping for chart outcomes.
struct RunCtx<'a> {
    chart_dir: &'a Path,
    summary: RunSummary,
}

impl RunCtx<'_> {
    fn rendered(&mut self, chart: &str, path: PathBuf) {
        let _ = eventlog::append_event(
            self.chart_dir,
            PipelineEvent::ChartRendered {
                chart: chart.to_string(),
                path: path.display().to_string(),
            },
        );
        self.summary.charts.push(ChartArtifact {
            name: chart.to_string(),
            path,
        });
    }

    fn skipped(&mut self, chart: &str, reason: &str) {
        let _ = eventlog::append_event(
            self.chart_dir,
            PipelineEvent::AggregateSkipped {
                chart: chart.to_string(),
                reason: reason.to_string(),
            },
        );
        self.summary.skipped.push(ChartSkip {
            chart: chart.to_string(),
            reason: reason.to_string(),
        });
    }

    fn failed(&mut self, chart: &str, error: String) {
        eprintln!("{} failed: {}", chart, error);
        let _ = eventlog::append_event(
            self.chart_dir,
            PipelineEvent::AggregateFailed {
                chart: chart.to_string(),
                error: error.clone(),
            },
        );
        self.summary.failures.push(ChartFailure {
            chart: chart.to_string(),
            error,
        });
    }

    /// Run one render step behind the isolation boundary.
    fn attempt(
        &mut self,
        chart: &str,
        path: PathBuf,
        render: impl FnOnce(&Path) -> Result<(), String>,
    ) {
        match render(&path) {
            Ok(()) => self.rendered(chart, path),
            Err(e) => self.failed(chart, e),
        }
    }
}

/// Resolve one logical dataset, logging the outcome.
fn resolve_dataset(chart_dir: &Path, data_dir: &Path, name: &str) -> Option<Table> {
    match resolver::resolve(name, &resolver::candidate_paths(data_dir, name)) {
        Some(resolved) => {
            let _ = eventlog::append_event(
                chart_dir,
                PipelineEvent::DatasetResolved {
                    dataset: name.to_string(),
                    path: resolved.path.display().to_string(),
                    rows: resolved.table.len(),
                },
            );
            Some(resolved.table)
        }
        None => {
            let _ = eventlog::append_event(
                chart_dir,
                PipelineEvent::DatasetAbsent {
                    dataset: name.to_string(),
                },
            );
            None
        }
    }
}

/// Execute the full pipeline.
pub fn run(opts: &PipelineOptions) -> Result<RunSummary, String> {
    report::ensure_output_tree(&opts.out_dir)?;
    let chart_dir = report::chart_dir(&opts.out_dir);
    let user_dir = report::user_chart_dir(&opts.out_dir);

    // Resolution: the three required datasets feed the all-or-nothing
    // pre-check; users is independent and never synthesized.
    let (recipes, ingredients, interactions) = if opts.force_synthetic {
        (None, None, None)
    } else {
        (
            resolve_dataset(&chart_dir, &opts.data_dir, resolver::DS_RECIPE),
            resolve_dataset(&chart_dir, &opts.data_dir, resolver::DS_INGREDIENTS),
            resolve_dataset(&chart_dir, &opts.data_dir, resolver::DS_INTERACTIONS),
        )
    };
    let users = resolve_dataset(&chart_dir, &opts.data_dir, resolver::DS_USERS);

    let source = resolver::assemble_batch(
        recipes,
        ingredients,
        interactions,
        opts.force_synthetic,
        opts.synthetic_interactions,
    );
    if source.is_synthetic() {
        println!("Synthesizing fallback dataset...");
        let batch = source.tables();
        let _ = eventlog::append_event(
            &chart_dir,
            PipelineEvent::SyntheticBatch {
                recipes: batch.recipes.len(),
                interactions: batch.interactions.len(),
            },
        );
    }
    let batch = source.tables();

    let mut ctx = RunCtx {
        chart_dir: &chart_dir,
        summary: RunSummary {
            synthetic: source.is_synthetic(),
            ..RunSummary::default()
        },
    };

    // 1. Top ingredients — bar chart plus the preview CSV over the same rows
    match aggregate::top_ingredients(&batch.ingredients, opts.top_n) {
        Ok(rows) => {
            report::write_preview_csv(&chart_dir.join(PREVIEW_CSV), &rows)?;
            if rows.is_empty() {
                ctx.skipped(TOP_INGREDIENTS_PNG, "no ingredient names");
            } else {
                ctx.attempt(TOP_INGREDIENTS_PNG, chart_dir.join(TOP_INGREDIENTS_PNG), |p| {
                    charts::render_bar_chart(
                        p,
                        "Top Ingredients (by occurrence)",
                        "Ingredient",
                        "Count",
                        &rows,
                        (1000, 600),
                    )
                });
            }
        }
        Err(e) => ctx.failed(TOP_INGREDIENTS_PNG, e),
    }

    // 2. Prep-time histogram — drop policy for uncoercible rows
    match aggregate::prep_times(&batch.recipes) {
        Ok(values) if values.is_empty() => {
            ctx.skipped(PREP_TIME_HISTOGRAM_PNG, "no numeric prep_time_min values")
        }
        Ok(values) => {
            let bins = aggregate::histogram(&values, HISTOGRAM_BINS);
            ctx.attempt(
                PREP_TIME_HISTOGRAM_PNG,
                chart_dir.join(PREP_TIME_HISTOGRAM_PNG),
                |p| {
                    charts::render_histogram(
                        p,
                        "Preparation Time Distribution",
                        "Prep Time (min)",
                        "Number of Recipes",
                        &bins,
                    )
                },
            );
        }
        Err(e) => ctx.failed(PREP_TIME_HISTOGRAM_PNG, e),
    }

    // 3. Prep time vs likes — fill policy, one point per recipe
    match aggregate::prep_vs_likes(&batch.recipes, &batch.interactions) {
        Ok(points) if points.is_empty() => ctx.skipped(PREP_VS_LIKES_PNG, "no recipe rows"),
        Ok(points) => {
            ctx.attempt(PREP_VS_LIKES_PNG, chart_dir.join(PREP_VS_LIKES_PNG), |p| {
                charts::render_scatter(
                    p,
                    "Prep Time vs Like Count",
                    "Prep Time (min)",
                    "Likes",
                    &points,
                )
            });
        }
        Err(e) => ctx.failed(PREP_VS_LIKES_PNG, e),
    }

    // 4 + 5. User analytics — only when the users dataset resolved
    if !opts.user_charts {
        ctx.skipped(USERS_BY_COUNTRY_PNG, "disabled by options");
        ctx.skipped(TOP_USERS_PNG, "disabled by options");
    } else if let Some(users_table) = &users {
        match aggregate::users_by_country(users_table) {
            None => ctx.skipped(USERS_BY_COUNTRY_PNG, "users table has no country column"),
            Some(rows) if rows.is_empty() => ctx.skipped(USERS_BY_COUNTRY_PNG, "no user rows"),
            Some(rows) => {
                ctx.attempt(USERS_BY_COUNTRY_PNG, user_dir.join(USERS_BY_COUNTRY_PNG), |p| {
                    charts::render_bar_chart(
                        p,
                        "Users by Country",
                        "Country",
                        "User Count",
                        &rows,
                        (800, 500),
                    )
                });
            }
        }

        match aggregate::top_users(&batch.interactions, opts.top_n) {
            None => ctx.skipped(TOP_USERS_PNG, "interactions table has no user_id column"),
            Some(rows) if rows.is_empty() => ctx.skipped(TOP_USERS_PNG, "no interaction rows"),
            Some(rows) => {
                ctx.attempt(TOP_USERS_PNG, user_dir.join(TOP_USERS_PNG), |p| {
                    charts::render_hbar_chart(
                        p,
                        "Top Users by Interaction Count",
                        "Interactions",
                        "User ID",
                        &rows,
                    )
                });
            }
        }
    } else {
        ctx.skipped(USERS_BY_COUNTRY_PNG, "users dataset absent");
        ctx.skipped(TOP_USERS_PNG, "users dataset absent");
    }

    // 6. Interactions per day — needs at least one parseable timestamp
    if !opts.time_series {
        ctx.skipped(INTERACTIONS_PER_DAY_PNG, "disabled by options");
    } else {
        match aggregate::interactions_per_day(&batch.interactions) {
            None => ctx.skipped(
                INTERACTIONS_PER_DAY_PNG,
                "no parseable created_at timestamps",
            ),
            Some(days) => {
                ctx.attempt(
                    INTERACTIONS_PER_DAY_PNG,
                    user_dir.join(INTERACTIONS_PER_DAY_PNG),
                    |p| {
                        charts::render_line_chart(
                            p,
                            "Interactions Per Day",
                            "Date",
                            "Interactions",
                            &days,
                        )
                    },
                );
            }
        }
    }

    report::write_readme(&chart_dir.join(README_FILE), &ctx.summary)?;
    let _ = eventlog::append_event(
        &chart_dir,
        PipelineEvent::RunCompleted {
            charts: ctx.summary.charts.len() as u32,
            skipped: ctx.summary.skipped.len() as u32,
            failed: ctx.summary.failures.len() as u32,
        },
    );

    Ok(ctx.summary)
}
