//! In-process search and discovery over a recipe list.
//!
//! The persistence service only returns whole lists, so filtering, the
//! "popular" ranking and the "recent" ranking all run here. Every function is
//! pure; the caller decides where the list comes from.

use std::cmp::Ordering;

use crate::recipe::{Difficulty, Recipe, SearchCriteria};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of recipes returned by the popular/recent views.
pub const DEFAULT_LIMIT: i64 = 10;

/// Maximum number of recipes returned by the popular/recent views.
pub const MAX_LIMIT: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Keep the recipes matching every present criterion, preserving order.
pub fn filter_recipes(recipes: Vec<Recipe>, criteria: &SearchCriteria) -> Vec<Recipe> {
    recipes
        .into_iter()
        .filter(|r| matches(r, criteria))
        .collect()
}

/// Whether a recipe satisfies every present criterion.
///
/// Absent, empty or blank criteria impose no constraint. Recipes with no
/// total time or no calories pass the corresponding bound.
pub fn matches(recipe: &Recipe, criteria: &SearchCriteria) -> bool {
    matches_keyword(recipe, criteria.keyword.as_deref())
        && matches_category(recipe, criteria.categorie.as_deref())
        && matches_max_time(recipe, criteria.temps_max)
        && matches_max_kcal(recipe, criteria.kcal_max)
        && matches_max_difficulty(recipe, criteria.difficulte_max)
        && matches_min_rating(recipe, criteria.note_moyenne_min)
        && matches_tags(recipe, criteria.tags.as_deref())
        && matches_included(recipe, criteria.ingredients_inclus.as_deref())
        && matches_excluded(recipe, criteria.ingredients_exclus.as_deref())
}

fn matches_keyword(recipe: &Recipe, keyword: Option<&str>) -> bool {
    let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) else {
        return true;
    };
    let needle = keyword.to_lowercase();
    let contains = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    };
    contains(&recipe.titre) || contains(&recipe.description)
}

fn matches_category(recipe: &Recipe, categorie: Option<&str>) -> bool {
    match categorie.map(str::trim).filter(|c| !c.is_empty()) {
        Some(wanted) => recipe.categorie.as_deref() == Some(wanted),
        None => true,
    }
}

fn matches_max_time(recipe: &Recipe, max: Option<i32>) -> bool {
    match (max, recipe.temps_total) {
        (Some(max), Some(time)) => time <= max,
        _ => true,
    }
}

fn matches_max_kcal(recipe: &Recipe, max: Option<i32>) -> bool {
    match (max, recipe.kcal) {
        (Some(max), Some(kcal)) => kcal <= max,
        _ => true,
    }
}

/// Unknown or unparseable difficulties never satisfy a bound.
fn matches_max_difficulty(recipe: &Recipe, max: Option<Difficulty>) -> bool {
    let Some(max) = max else {
        return true;
    };
    recipe
        .difficulte
        .as_deref()
        .and_then(|d| d.parse::<Difficulty>().ok())
        .is_some_and(|d| d <= max)
}

fn matches_min_rating(recipe: &Recipe, min: Option<f64>) -> bool {
    match min {
        Some(min) => recipe.note_moyenne.is_some_and(|note| note >= min),
        None => true,
    }
}

fn matches_tags(recipe: &Recipe, tags: Option<&[String]>) -> bool {
    tags.unwrap_or_default().iter().all(|wanted| {
        recipe
            .tags
            .iter()
            .any(|tag| tag.trim().eq_ignore_ascii_case(wanted.trim()))
    })
}

fn matches_included(recipe: &Recipe, food_ids: Option<&[DbId]>) -> bool {
    food_ids
        .unwrap_or_default()
        .iter()
        .all(|id| contains_food(recipe, *id))
}

fn matches_excluded(recipe: &Recipe, food_ids: Option<&[DbId]>) -> bool {
    !food_ids
        .unwrap_or_default()
        .iter()
        .any(|id| contains_food(recipe, *id))
}

fn contains_food(recipe: &Recipe, food_id: DbId) -> bool {
    recipe
        .ingredients
        .iter()
        .any(|line| line.aliment_id == Some(food_id))
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// Best rated first, then most reviewed; unrated recipes go last.
pub fn rank_popular(mut recipes: Vec<Recipe>, limit: usize) -> Vec<Recipe> {
    recipes.sort_by(|a, b| {
        desc_nulls_last(a.note_moyenne, b.note_moyenne, |x, y| x.total_cmp(y))
            .then_with(|| desc_nulls_last(a.nombre_feedbacks, b.nombre_feedbacks, Ord::cmp))
    });
    recipes.truncate(limit);
    recipes
}

/// Newest first; recipes with no creation date go last.
pub fn rank_recent(mut recipes: Vec<Recipe>, limit: usize) -> Vec<Recipe> {
    recipes.sort_by(|a, b| desc_nulls_last(a.date_creation, b.date_creation, Ord::cmp));
    recipes.truncate(limit);
    recipes
}

fn desc_nulls_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&b, &a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
