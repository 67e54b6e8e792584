//! CN-004: Synthetic fallback batch — closed catalogue, weighted
//! interactions.
//!
//! Used only when the required datasets cannot all be resolved. The
//! catalogue of recipe ids is fixed, so every fabricated ingredient and
//! interaction row references a recipe that exists in the fabricated
//! recipe table (referential closure).

use rand::Rng;

use super::table::Table;
use super::types::{
    DataBatch, Difficulty, IngredientRecord, InteractionRecord, InteractionType, RecipeRecord,
};

/// Fixed recipe catalogue for the synthetic batch.
pub const RECIPE_CATALOGUE: [&str; 8] = [
    "recipe_puran_poli",
    "recipe_pasta_alfredo",
    "recipe_veg_biryani",
    "recipe_aloo_paratha",
    "recipe_egg_fried_rice",
    "recipe_paneer_butter_masala",
    "recipe_miso_ramen",
    "recipe_chana_masala",
];

/// Fixed ingredient vocabulary.
pub const INGREDIENT_VOCAB: [&str; 10] = [
    "onion", "garlic", "salt", "oil", "turmeric", "ginger", "cumin", "butter", "rice", "tomato",
];

/// Ingredient rows fabricated per recipe.
const INGREDIENTS_PER_RECIPE: u32 = 5;

/// Synthetic user pool size (`user1`..=`user10`).
const USER_POOL: u32 = 10;

/// One recipe row per catalogue entry, with bounded random times and a
/// uniform difficulty.
pub fn synthetic_recipes<R: Rng>(rng: &mut R) -> Vec<RecipeRecord> {
    RECIPE_CATALOGUE
        .iter()
        .map(|rid| RecipeRecord {
            recipe_id: rid.to_string(),
            name: display_name(rid),
            prep_time_min: rng.gen_range(10..=40),
            cook_time_min: rng.gen_range(10..=60),
            difficulty: Difficulty::ALL[rng.gen_range(0..Difficulty::ALL.len())],
        })
        .collect()
}

/// A handful of ingredient rows per recipe, drawn from the fixed vocabulary.
pub fn synthetic_ingredients<R: Rng>(rng: &mut R, recipes: &[RecipeRecord]) -> Vec<IngredientRecord> {
    let mut rows = Vec::with_capacity(recipes.len() * INGREDIENTS_PER_RECIPE as usize);
    for recipe in recipes {
        for i in 1..=INGREDIENTS_PER_RECIPE {
            rows.push(IngredientRecord {
                recipe_id: recipe.recipe_id.clone(),
                ingredient_id: format!("{}_ing{}", recipe.recipe_id, i),
                name: INGREDIENT_VOCAB[rng.gen_range(0..INGREDIENT_VOCAB.len())].to_string(),
                quantity: rng.gen_range(1..=3),
                unit: "unit".to_string(),
                order: i,
            });
        }
    }
    rows
}

/// Interaction rows referencing uniformly chosen catalogue recipes, with a
/// weighted type distribution. A rating value is attached only when the
/// type is `rating`.
pub fn synthetic_interactions<R: Rng>(
    rng: &mut R,
    recipes: &[RecipeRecord],
    count: usize,
) -> Vec<InteractionRecord> {
    let mut rows = Vec::with_capacity(count);
    for i in 0..count {
        let recipe = &recipes[rng.gen_range(0..recipes.len())];
        let interaction_type = weighted_type(rng);
        let rating = match interaction_type {
            // the rating cell may be blank even on rating rows
            InteractionType::Rating => [None, Some(3), Some(4), Some(5)][rng.gen_range(0..4)],
            _ => None,
        };
        rows.push(InteractionRecord {
            interaction_id: format!("int_{}", i),
            user_id: format!("user{}", rng.gen_range(1..=USER_POOL)),
            recipe_id: recipe.recipe_id.clone(),
            interaction_type,
            rating,
        });
    }
    rows
}

/// Weighted draw over the four interaction types:
/// view 5 : like 3 : cook_attempt 1 : rating 1.
fn weighted_type<R: Rng>(rng: &mut R) -> InteractionType {
    match rng.gen_range(0..10) {
        0..=4 => InteractionType::View,
        5..=7 => InteractionType::Like,
        8 => InteractionType::CookAttempt,
        _ => InteractionType::Rating,
    }
}

/// Build the full mutually consistent batch as tables, the same currency
/// the resolver produces.
pub fn synthetic_batch<R: Rng>(rng: &mut R, interaction_count: usize) -> DataBatch {
    let recipes = synthetic_recipes(rng);
    let ingredients = synthetic_ingredients(rng, &recipes);
    let interactions = synthetic_interactions(rng, &recipes, interaction_count);

    DataBatch {
        recipes: recipes_table(&recipes),
        ingredients: ingredients_table(&ingredients),
        interactions: interactions_table(&interactions),
    }
}

/// `recipe_puran_poli` → `Puran Poli`.
fn display_name(recipe_id: &str) -> String {
    recipe_id
        .trim_start_matches("recipe_")
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn recipes_table(records: &[RecipeRecord]) -> Table {
    Table {
        name: super::resolver::DS_RECIPE.to_string(),
        headers: [
            "recipe_id",
            "name",
            "prep_time_min",
            "cook_time_min",
            "total_time_min",
            "difficulty",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect(),
        rows: records
            .iter()
            .map(|r| {
                vec![
                    r.recipe_id.clone(),
                    r.name.clone(),
                    r.prep_time_min.to_string(),
                    r.cook_time_min.to_string(),
                    r.total_time_min().to_string(),
                    r.difficulty.to_string(),
                ]
            })
            .collect(),
    }
}

fn ingredients_table(records: &[IngredientRecord]) -> Table {
    Table {
        name: super::resolver::DS_INGREDIENTS.to_string(),
        headers: ["recipe_id", "ingredient_id", "name", "quantity", "unit", "order"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows: records
            .iter()
            .map(|r| {
                vec![
                    r.recipe_id.clone(),
                    r.ingredient_id.clone(),
                    r.name.clone(),
                    r.quantity.to_string(),
                    r.unit.clone(),
                    r.order.to_string(),
                ]
            })
            .collect(),
    }
}

fn interactions_table(records: &[InteractionRecord]) -> Table {
    Table {
        name: super::resolver::DS_INTERACTIONS.to_string(),
        headers: ["interaction_id", "user_id", "recipe_id", "type", "rating"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows: records
            .iter()
            .map(|r| {
                vec![
                    r.interaction_id.clone(),
                    r.user_id.clone(),
                    r.recipe_id.clone(),
                    r.interaction_type.to_string(),
                    r.rating.map(|v| v.to_string()).unwrap_or_default(),
                ]
            })
            .collect(),
    }
}
