//! CN-003: Dataset resolution — ordered candidate probing, all-or-nothing
//! batch policy.
//!
//! Each logical dataset is probed at a priority-ordered list of locations.
//! A missing candidate is skipped silently; a candidate that exists but
//! fails to parse is reported and skipped. The first successful parse wins
//! outright — candidates are never merged. If any of the three required
//! datasets is absent, all three are replaced by one synthetic batch.

use std::path::{Path, PathBuf};

use super::synth;
use super::table::{self, Table};
use super::types::{BatchSource, DataBatch};

/// Fixed absolute fallback directory, probed after the local data dir.
pub const FALLBACK_DATA_DIR: &str = "/mnt/data/output";

/// Logical dataset names; each maps to `<name>.csv`.
pub const DS_RECIPE: &str = "recipe";
pub const DS_INGREDIENTS: &str = "ingredients";
pub const DS_INTERACTIONS: &str = "interactions";
pub const DS_USERS: &str = "users";

/// A table together with the candidate path it was loaded from.
#[derive(Debug, Clone)]
pub struct ResolvedTable {
    pub table: Table,
    pub path: PathBuf,
}

/// The fixed candidate locations for one logical dataset, in priority
/// order: local data dir first, absolute fallback second.
pub fn candidate_paths(data_dir: &Path, logical_name: &str) -> Vec<PathBuf> {
    let file = format!("{}.csv", logical_name);
    vec![
        data_dir.join(&file),
        Path::new(FALLBACK_DATA_DIR).join(&file),
    ]
}

/// Probe candidates in order and return the first table that parses.
///
/// Parse failures are reported on stderr and resolution continues with the
/// next candidate; this function never returns an error.
pub fn resolve(logical_name: &str, candidates: &[PathBuf]) -> Option<ResolvedTable> {
    for path in candidates {
        if !path.exists() {
            continue;
        }
        match table::parse_table_file(logical_name, path) {
            Ok(t) => {
                println!("Loaded: {}", path.display());
                return Some(ResolvedTable {
                    table: t,
                    path: path.clone(),
                });
            }
            Err(e) => {
                eprintln!("found {} but failed to parse: {}", path.display(), e);
            }
        }
    }
    None
}

/// The all-or-nothing pre-check: if every required dataset resolved (and
/// synthesis is not forced), the batch is `Resolved`; otherwise every real
/// result is discarded and one mutually consistent synthetic batch is
/// generated.
pub fn assemble_batch(
    recipes: Option<Table>,
    ingredients: Option<Table>,
    interactions: Option<Table>,
    force_synthetic: bool,
    synthetic_interactions: usize,
) -> BatchSource {
    if !force_synthetic {
        if let (Some(recipes), Some(ingredients), Some(interactions)) =
            (recipes, ingredients, interactions)
        {
            return BatchSource::Resolved(DataBatch {
                recipes,
                ingredients,
                interactions,
            });
        }
    }

    let mut rng = rand::thread_rng();
    BatchSource::Synthesized(synth::synthetic_batch(&mut rng, synthetic_interactions))
}
