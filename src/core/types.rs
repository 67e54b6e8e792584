//! CN-001: Core types for the analytics pipeline.
//!
//! Domain enums, synthetic record structs, the tagged batch-resolution
//! result, pipeline configuration, and the run-log event types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::table::Table;

// ============================================================================
// Domain enums
// ============================================================================

/// Recipe difficulty rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulty values, in ascending order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// Interaction event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    View,
    Like,
    CookAttempt,
    Rating,
}

impl InteractionType {
    /// All interaction types.
    pub const ALL: [InteractionType; 4] = [
        InteractionType::View,
        InteractionType::Like,
        InteractionType::CookAttempt,
        InteractionType::Rating,
    ];
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => write!(f, "view"),
            Self::Like => write!(f, "like"),
            Self::CookAttempt => write!(f, "cook_attempt"),
            Self::Rating => write!(f, "rating"),
        }
    }
}

// ============================================================================
// Synthetic records
// ============================================================================

/// One recipe row. `total_time_min` is derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRecord {
    /// Unique recipe key — the join key for every downstream aggregate
    pub recipe_id: String,

    /// Display name
    pub name: String,

    /// Preparation time in minutes
    pub prep_time_min: u32,

    /// Cooking time in minutes
    pub cook_time_min: u32,

    /// Difficulty rating
    pub difficulty: Difficulty,
}

impl RecipeRecord {
    /// Derived total time (prep + cook).
    pub fn total_time_min(&self) -> u32 {
        self.prep_time_min + self.cook_time_min
    }
}

/// One ingredient row; many-to-one with `RecipeRecord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRecord {
    /// Owning recipe
    pub recipe_id: String,

    /// Unique ingredient key
    pub ingredient_id: String,

    /// Free-text ingredient name (case/whitespace variants are distinct)
    pub name: String,

    /// Quantity in `unit`s
    pub quantity: u32,

    /// Measurement unit
    pub unit: String,

    /// 1-based position within the recipe
    pub order: u32,
}

/// One interaction row; many-to-one with both recipe and user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Unique interaction key
    pub interaction_id: String,

    /// Acting user (soft foreign key — never enforced)
    pub user_id: String,

    /// Target recipe
    pub recipe_id: String,

    /// Event type
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,

    /// Rating in 0..=5, present only when `interaction_type` is `Rating`
    #[serde(default)]
    pub rating: Option<u8>,
}

// ============================================================================
// Batch resolution
// ============================================================================

/// The three required tables, resolved or synthesized as one unit.
#[derive(Debug, Clone)]
pub struct DataBatch {
    pub recipes: Table,
    pub ingredients: Table,
    pub interactions: Table,
}

/// Tagged result of the all-or-nothing batch policy: either every required
/// dataset resolved from disk, or all three were regenerated together.
#[derive(Debug, Clone)]
pub enum BatchSource {
    Resolved(DataBatch),
    Synthesized(DataBatch),
}

impl BatchSource {
    /// Access the underlying tables regardless of provenance.
    pub fn tables(&self) -> &DataBatch {
        match self {
            Self::Resolved(b) | Self::Synthesized(b) => b,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthesized(_))
    }
}

// ============================================================================
// Pipeline configuration
// ============================================================================

/// One parametrized pipeline instead of near-duplicate script variants.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Primary data directory (first candidate for every dataset)
    pub data_dir: PathBuf,

    /// Root of the output tree (charts land in `<out_dir>/charts/`)
    pub out_dir: PathBuf,

    /// Render the user-analytics bar charts when the users dataset resolves
    pub user_charts: bool,

    /// Render the interactions-per-day line chart when timestamps parse
    pub time_series: bool,

    /// Truncation size for the ranked aggregates
    pub top_n: usize,

    /// Interaction rows to fabricate when the synthetic batch is used
    pub synthetic_interactions: usize,

    /// Skip resolution entirely and use the synthetic batch
    pub force_synthetic: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("output"),
            out_dir: PathBuf::from("output"),
            user_charts: true,
            time_series: true,
            top_n: 20,
            synthetic_interactions: 100,
            force_synthetic: false,
        }
    }
}

// ============================================================================
// Run summary
// ============================================================================

/// A chart file written this run.
#[derive(Debug, Clone)]
pub struct ChartArtifact {
    /// Chart file name, e.g. `top_ingredients.png`
    pub name: String,

    /// Full path of the written image
    pub path: PathBuf,
}

/// A chart that was intentionally not produced.
#[derive(Debug, Clone)]
pub struct ChartSkip {
    pub chart: String,
    pub reason: String,
}

/// A chart whose aggregate or render step failed.
#[derive(Debug, Clone)]
pub struct ChartFailure {
    pub chart: String,
    pub error: String,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// True when the synthetic fallback batch fed the aggregates
    pub synthetic: bool,

    /// Charts written, in run order
    pub charts: Vec<ChartArtifact>,

    /// Charts skipped (absent dataset, absent column, or disabled option)
    pub skipped: Vec<ChartSkip>,

    /// Charts that failed; a failure never blocks the remaining aggregates
    pub failures: Vec<ChartFailure>,
}

// ============================================================================
// Run-log events
// ============================================================================

/// Event for the JSONL run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    DatasetResolved {
        dataset: String,
        path: String,
        rows: usize,
    },
    DatasetAbsent {
        dataset: String,
    },
    SyntheticBatch {
        recipes: usize,
        interactions: usize,
    },
    ChartRendered {
        chart: String,
        path: String,
    },
    AggregateSkipped {
        chart: String,
        reason: String,
    },
    AggregateFailed {
        chart: String,
        error: String,
    },
    RunCompleted {
        charts: u32,
        skipped: u32,
        failed: u32,
    },
}

/// Timestamped event wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampedEvent {
    pub ts: String,
    #[serde(flatten)]
    pub event: PipelineEvent,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::Table;

    fn tiny_table(name: &str) -> Table {
        Table {
            name: name.to_string(),
            headers: vec!["recipe_id".to_string()],
            rows: vec![vec!["r1".to_string()]],
        }
    }

    fn tiny_batch() -> DataBatch {
        DataBatch {
            recipes: tiny_table("recipe"),
            ingredients: tiny_table("ingredients"),
            interactions: tiny_table("interactions"),
        }
    }

    #[test]
    fn test_cn001_difficulty_display() {
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert_eq!(Difficulty::Medium.to_string(), "medium");
        assert_eq!(Difficulty::Hard.to_string(), "hard");
    }

    #[test]
    fn test_cn001_interaction_type_display() {
        assert_eq!(InteractionType::View.to_string(), "view");
        assert_eq!(InteractionType::CookAttempt.to_string(), "cook_attempt");
        assert_eq!(InteractionType::Rating.to_string(), "rating");
    }

    #[test]
    fn test_cn001_interaction_type_serde() {
        let json = serde_json::to_string(&InteractionType::CookAttempt).unwrap();
        assert_eq!(json, "\"cook_attempt\"");
        let back: InteractionType = serde_json::from_str("\"like\"").unwrap();
        assert_eq!(back, InteractionType::Like);
    }

    #[test]
    fn test_cn001_total_time_derived() {
        let r = RecipeRecord {
            recipe_id: "r1".to_string(),
            name: "Test".to_string(),
            prep_time_min: 15,
            cook_time_min: 25,
            difficulty: Difficulty::Easy,
        };
        assert_eq!(r.total_time_min(), 40);
    }

    #[test]
    fn test_cn001_batch_source_tag() {
        let resolved = BatchSource::Resolved(tiny_batch());
        let synthesized = BatchSource::Synthesized(tiny_batch());
        assert!(!resolved.is_synthetic());
        assert!(synthesized.is_synthetic());
        assert_eq!(resolved.tables().recipes.name, "recipe");
        assert_eq!(synthesized.tables().recipes.name, "recipe");
    }

    #[test]
    fn test_cn001_options_defaults() {
        let opts = PipelineOptions::default();
        assert_eq!(opts.data_dir, PathBuf::from("output"));
        assert_eq!(opts.top_n, 20);
        assert_eq!(opts.synthetic_interactions, 100);
        assert!(opts.user_charts);
        assert!(opts.time_series);
        assert!(!opts.force_synthetic);
    }

    #[test]
    fn test_cn001_pipeline_event_serde() {
        let event = PipelineEvent::DatasetResolved {
            dataset: "recipe".to_string(),
            path: "output/recipe.csv".to_string(),
            rows: 12,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"dataset_resolved\""));
        assert!(json.contains("\"rows\":12"));
    }

    #[test]
    fn test_cn001_timestamped_event_flatten() {
        let te = TimestampedEvent {
            ts: "2026-08-06T12:00:00Z".to_string(),
            event: PipelineEvent::SyntheticBatch {
                recipes: 8,
                interactions: 100,
            },
        };
        let json = serde_json::to_string(&te).unwrap();
        assert!(json.contains("\"ts\":\"2026-08-06T12:00:00Z\""));
        assert!(json.contains("\"event\":\"synthetic_batch\""));
        assert!(!json.contains("\"event\":{"));
    }
}
