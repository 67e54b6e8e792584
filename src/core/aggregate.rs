//! CN-005: Aggregates — six independent, pure table-to-summary views.
//!
//! Each aggregate is a stateless function over already-resolved tables.
//! Coercion policy differs per aggregate and is deliberate: the prep-time
//! distribution DROPS rows that fail to coerce, while the prep-vs-likes
//! join FILLS them with zero so every recipe contributes exactly one point.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use std::collections::BTreeMap;

use super::table::{cell, coerce_numeric, Table};

/// Sentinel for absent user ids and countries.
pub const UNKNOWN: &str = "unknown";

/// A ranked (label, count) pair shared by the frequency aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCount {
    pub name: String,
    pub count: u64,
}

/// One equal-width histogram bucket over `[lo, hi)` (last bucket closed).
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lo: f64,
    pub hi: f64,
    pub count: u64,
}

/// One scatter observation — exactly one per recipe row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub recipe_id: String,
    pub prep_time_min: f64,
    pub like_count: u64,
}

/// One day of interaction volume.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u64,
}

// ============================================================================
// 1. Top ingredients
// ============================================================================

/// Occurrence count per trimmed ingredient name (case preserved — distinct
/// case is a distinct key), over ALL rows, not deduplicated per recipe.
/// Sorted count-descending, ties in first-encountered order, truncated to
/// `top_n`. Whitespace-only names are not counted.
pub fn top_ingredients(ingredients: &Table, top_n: usize) -> Result<Vec<NamedCount>, String> {
    let idx = ingredients
        .column_index("name")
        .ok_or_else(|| "ingredients table has no name column".to_string())?;

    let mut counts: IndexMap<&str, u64> = IndexMap::new();
    for row in &ingredients.rows {
        let name = cell(row, idx).trim();
        if name.is_empty() {
            continue;
        }
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut ranked: Vec<NamedCount> = counts
        .into_iter()
        .map(|(name, count)| NamedCount {
            name: name.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps first-encountered order within equal counts
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_n);
    Ok(ranked)
}

// ============================================================================
// 2. Prep-time distribution
// ============================================================================

/// Coerced prep times; rows that fail to coerce are dropped, never
/// zero-filled.
pub fn prep_times(recipes: &Table) -> Result<Vec<f64>, String> {
    let idx = recipes
        .column_index("prep_time_min")
        .ok_or_else(|| "recipe table has no prep_time_min column".to_string())?;

    Ok(recipes
        .rows
        .iter()
        .filter_map(|row| coerce_numeric(cell(row, idx)))
        .collect())
}

/// Bucket values into `bin_count` equal-width bins spanning the observed
/// range. The final bin is right-inclusive; a single-valued range yields
/// one bin holding everything.
pub fn histogram(values: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            lo: min,
            hi: max,
            count: values.len() as u64,
        }];
    }

    let width = (max - min) / bin_count as f64;
    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            lo: min + width * i as f64,
            hi: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width) as usize).min(bin_count - 1);
        bins[idx].count += 1;
    }
    bins
}

// ============================================================================
// 3. Prep time vs likes
// ============================================================================

/// Left-join like counts onto every recipe row. Recipes without likes get
/// zero; prep times that fail to coerce become 0.0 here (fill, not drop)
/// so the scatter has exactly one point per recipe.
pub fn prep_vs_likes(recipes: &Table, interactions: &Table) -> Result<Vec<ScatterPoint>, String> {
    let rid_idx = recipes
        .column_index("recipe_id")
        .ok_or_else(|| "recipe table has no recipe_id column".to_string())?;
    let prep_idx = recipes.column_index("prep_time_min");

    // Unmatched interaction rows contribute zero, never an error, so the
    // join source being short a column degrades to an all-zero intermediate.
    let mut likes: IndexMap<&str, u64> = IndexMap::new();
    if let (Some(i_rid), Some(i_type)) = (
        interactions.column_index("recipe_id"),
        interactions.column_index("type"),
    ) {
        for row in &interactions.rows {
            if cell(row, i_type).trim() == "like" {
                *likes.entry(cell(row, i_rid)).or_insert(0) += 1;
            }
        }
    }

    Ok(recipes
        .rows
        .iter()
        .map(|row| {
            let recipe_id = cell(row, rid_idx);
            ScatterPoint {
                recipe_id: recipe_id.to_string(),
                prep_time_min: prep_idx
                    .and_then(|idx| coerce_numeric(cell(row, idx)))
                    .unwrap_or(0.0),
                like_count: likes.get(recipe_id).copied().unwrap_or(0),
            }
        })
        .collect())
}

// ============================================================================
// 4. Users by country
// ============================================================================

/// Count users per country, absent/blank countries folded into the
/// `unknown` sentinel. `None` when the table has no country column — the
/// chart is simply not produced. No truncation.
pub fn users_by_country(users: &Table) -> Option<Vec<NamedCount>> {
    let idx = users.column_index("country")?;
    Some(ranked_counts(users.rows.iter().map(|row| cell(row, idx))))
}

// ============================================================================
// 5. Top users by interaction count
// ============================================================================

/// Count interactions per user, absent/blank user ids folded into the
/// `unknown` sentinel. `None` when there is no user_id column. Truncated
/// to `top_n`.
pub fn top_users(interactions: &Table, top_n: usize) -> Option<Vec<NamedCount>> {
    let idx = interactions.column_index("user_id")?;
    let mut ranked = ranked_counts(interactions.rows.iter().map(|row| cell(row, idx)));
    ranked.truncate(top_n);
    Some(ranked)
}

/// Shared counting core for the sentinel-filled frequency aggregates:
/// count-descending, first-encountered tie order.
fn ranked_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<NamedCount> {
    let mut counts: IndexMap<&str, u64> = IndexMap::new();
    for value in values {
        let key = match value.trim() {
            "" => UNKNOWN,
            v => v,
        };
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut ranked: Vec<NamedCount> = counts
        .into_iter()
        .map(|(name, count)| NamedCount {
            name: name.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

// ============================================================================
// 6. Interactions per day
// ============================================================================

/// Daily interaction volume, ascending by calendar date. `None` when the
/// table has no created_at column or no cell parses to a date; unparseable
/// cells are dropped row-by-row, never an error.
pub fn interactions_per_day(interactions: &Table) -> Option<Vec<DayCount>> {
    let idx = interactions.column_index("created_at")?;

    let mut daily: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for row in &interactions.rows {
        if let Some(date) = parse_timestamp(cell(row, idx)) {
            *daily.entry(date).or_insert(0) += 1;
        }
    }

    if daily.is_empty() {
        return None;
    }
    Some(
        daily
            .into_iter()
            .map(|(date, count)| DayCount { date, count })
            .collect(),
    )
}

/// Parse a timestamp cell down to its calendar date. Accepted formats, in
/// order: RFC 3339, `%Y-%m-%d %H:%M:%S`, `%Y-%m-%d`.
pub fn parse_timestamp(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::parse_table;

    #[test]
    fn test_cn005_top_ingredients_trim_and_case() {
        let t = parse_table(
            "ingredients",
            "recipe_id,name\nr1,  salt \nr1,salt\nr2,Salt\nr2,oil\nr3,salt\n",
        )
        .unwrap();
        let ranked = top_ingredients(&t, 20).unwrap();
        // "salt" (3 after trim), then ties "Salt"/"oil" in first-seen order
        assert_eq!(ranked[0], NamedCount { name: "salt".into(), count: 3 });
        assert_eq!(ranked[1].name, "Salt");
        assert_eq!(ranked[2].name, "oil");
    }

    #[test]
    fn test_cn005_top_ingredients_truncates() {
        let mut text = String::from("name\n");
        for i in 0..30 {
            // ing0 once, ing1 twice, ... so every count is distinct
            for _ in 0..=i {
                text.push_str(&format!("ing{}\n", i));
            }
        }
        let t = parse_table("ingredients", &text).unwrap();
        let ranked = top_ingredients(&t, 20).unwrap();
        assert_eq!(ranked.len(), 20);
        assert_eq!(ranked[0].name, "ing29");
        assert_eq!(ranked[0].count, 30);
        // Strictly descending
        for pair in ranked.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn test_cn005_top_ingredients_missing_column() {
        let t = parse_table("ingredients", "recipe_id\nr1\n").unwrap();
        assert!(top_ingredients(&t, 20).is_err());
    }

    #[test]
    fn test_cn005_prep_times_drop_policy() {
        let t = parse_table(
            "recipe",
            "recipe_id,prep_time_min\nr1,15\nr2,abc\nr3,\n",
        )
        .unwrap();
        // Exactly one observation survives coercion
        assert_eq!(prep_times(&t).unwrap(), vec![15.0]);
    }

    #[test]
    fn test_cn005_histogram_equal_width() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0];
        let bins = histogram(&values, 10);
        assert_eq!(bins.len(), 10);
        assert!((bins[0].lo - 0.0).abs() < f64::EPSILON);
        assert!((bins[9].hi - 10.0).abs() < f64::EPSILON);
        // Max lands in the final (right-inclusive) bin
        assert_eq!(bins[9].count, 1);
        let total: u64 = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, values.len() as u64);
    }

    #[test]
    fn test_cn005_histogram_degenerate_range() {
        let bins = histogram(&[7.0, 7.0, 7.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn test_cn005_histogram_empty() {
        assert!(histogram(&[], 10).is_empty());
        assert!(histogram(&[1.0], 0).is_empty());
    }

    #[test]
    fn test_cn005_prep_vs_likes_one_point_per_recipe() {
        let recipes = parse_table(
            "recipe",
            "recipe_id,prep_time_min\nr1,10\nr2,20\nr3,30\nr4,bad\nr5,\n",
        )
        .unwrap();
        let interactions = parse_table(
            "interactions",
            "recipe_id,type\nr1,like\nr1,like\nr2,view\nr3,like\nghost,like\n",
        )
        .unwrap();

        let points = prep_vs_likes(&recipes, &interactions).unwrap();
        // 5 recipes, only 2 with likes — still 5 points, 3 of them zero
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].like_count, 2);
        assert_eq!(points[1].like_count, 0);
        assert_eq!(points[2].like_count, 1);
        assert_eq!(points.iter().filter(|p| p.like_count == 0).count(), 3);
        // Fill policy: uncoercible prep becomes 0.0 here, not a dropped row
        assert_eq!(points[3].prep_time_min, 0.0);
        assert_eq!(points[4].prep_time_min, 0.0);
    }

    #[test]
    fn test_cn005_prep_vs_likes_missing_join_key() {
        let recipes = parse_table("recipe", "name,prep_time_min\nDal,10\n").unwrap();
        let interactions = parse_table("interactions", "recipe_id,type\nr1,like\n").unwrap();
        assert!(prep_vs_likes(&recipes, &interactions).is_err());
    }

    #[test]
    fn test_cn005_prep_vs_likes_interactions_without_type() {
        let recipes = parse_table("recipe", "recipe_id,prep_time_min\nr1,10\n").unwrap();
        let interactions = parse_table("interactions", "recipe_id\nr1\n").unwrap();
        let points = prep_vs_likes(&recipes, &interactions).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].like_count, 0);
    }

    #[test]
    fn test_cn005_users_by_country_sentinel() {
        let users = parse_table(
            "users",
            "user_id,country\nu1,IN\nu2,IN\nu3,\nu4,US\nu5,  \n",
        )
        .unwrap();
        let ranked = users_by_country(&users).unwrap();
        assert_eq!(ranked[0], NamedCount { name: "IN".into(), count: 2 });
        assert_eq!(ranked[1], NamedCount { name: UNKNOWN.into(), count: 2 });
        assert_eq!(ranked[2], NamedCount { name: "US".into(), count: 1 });
    }

    #[test]
    fn test_cn005_users_by_country_no_column() {
        let users = parse_table("users", "user_id\nu1\n").unwrap();
        assert!(users_by_country(&users).is_none());
    }

    #[test]
    fn test_cn005_top_users_counts() {
        let interactions = parse_table(
            "interactions",
            "recipe_id,type,user_id\nr1,view,u1\nr1,like,u1\nr2,view,\n",
        )
        .unwrap();
        let ranked = top_users(&interactions, 20).unwrap();
        assert_eq!(ranked[0], NamedCount { name: "u1".into(), count: 2 });
        assert_eq!(ranked[1], NamedCount { name: UNKNOWN.into(), count: 1 });
    }

    #[test]
    fn test_cn005_top_users_no_column() {
        let interactions = parse_table("interactions", "recipe_id,type\nr1,view\n").unwrap();
        assert!(top_users(&interactions, 20).is_none());
    }

    #[test]
    fn test_cn005_interactions_per_day() {
        let interactions = parse_table(
            "interactions",
            "recipe_id,type,created_at\n\
             r1,view,2026-03-02T10:00:00Z\n\
             r1,like,2026-03-01 08:30:00\n\
             r2,view,2026-03-02\n\
             r2,view,not-a-date\n\
             r3,view,\n",
        )
        .unwrap();
        let days = interactions_per_day(&interactions).unwrap();
        assert_eq!(days.len(), 2);
        // Ascending by date
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(days[0].count, 1);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(days[1].count, 2);
    }

    #[test]
    fn test_cn005_interactions_per_day_none_parse() {
        let interactions =
            parse_table("interactions", "recipe_id,created_at\nr1,garbage\n").unwrap();
        assert!(interactions_per_day(&interactions).is_none());

        let no_column = parse_table("interactions", "recipe_id,type\nr1,view\n").unwrap();
        assert!(interactions_per_day(&no_column).is_none());
    }

    #[test]
    fn test_cn005_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(parse_timestamp("2026-03-02T10:15:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2026-03-02T10:15:00+05:30"), Some(expected));
        assert_eq!(parse_timestamp("2026-03-02 10:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-03-02"), Some(expected));
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("03/02/2026"), None);
    }
}
