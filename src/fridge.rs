// ABOUTME: Fridge-ingredient matching engine scoring recipes against owned ingredients
// ABOUTME: Defines MatchPolicy, MatchResult, and the ranked suggestion computation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fridge matching.
//!
//! Scores every candidate recipe's ingredient list against the set of
//! ingredients a user owns, under a caller-supplied [`MatchPolicy`]. The
//! scoring loop is CPU-bound and parallelized with rayon; it performs no I/O.
//!
//! Cookability always means zero missing ingredients, for both match types.
//! `match_type` governs which recipes are included at all, not what counts as
//! cookable. This mirrors the product behavior on purpose: under
//! [`MatchType::Any`] a recipe can appear in results without ever being
//! cookable.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::{Recipe, RecipeSummary};
use crate::query::Term;

/// How owned ingredients gate a recipe's inclusion in suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Every candidate recipe is scored; nothing is excluded for missing
    /// ingredients (beyond `max_missing_ingredients`)
    #[default]
    All,
    /// Only recipes sharing at least one ingredient with the fridge appear
    Any,
}

impl MatchType {
    /// Parse a match type from user input (case-insensitive)
    ///
    /// Returns `None` for values outside the enum.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "any" => Some(Self::Any),
            _ => None,
        }
    }
}

/// Raw, untyped match policy input as received from the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchPolicyInput {
    /// Match type name (all, any)
    pub match_type: Option<String>,
    /// Drop recipes missing more than this many ingredients
    pub max_missing_ingredients: Option<i64>,
    /// Ingredient categories ignored on both the owned and required side
    pub exclude_categories: Vec<String>,
    /// Treat expired fridge items as not owned
    pub exclude_expired: bool,
    /// Maximum number of suggestions to return
    pub limit: Option<i64>,
}

/// Validated policy governing fridge matching
#[derive(Debug, Clone, Default)]
pub struct MatchPolicy {
    /// Inclusion rule
    pub match_type: MatchType,
    /// Optional cap on missing ingredients; recipes over the cap are dropped
    pub max_missing_ingredients: Option<u32>,
    /// Folded category names removed from owned and required sets
    pub exclude_categories: Vec<Term>,
    /// Treat expired fridge items as not owned
    pub exclude_expired: bool,
    /// Optional cap on the number of results
    pub limit: Option<u32>,
}

impl MatchPolicy {
    /// Validate and canonicalize raw policy input
    ///
    /// # Errors
    /// Returns a validation error naming the offending field for an unknown
    /// match type, a negative missing-ingredient cap, or a limit below 1.
    pub fn normalize(input: &MatchPolicyInput) -> AppResult<Self> {
        let match_type = match &input.match_type {
            Some(raw) if !raw.trim().is_empty() => MatchType::parse(raw).ok_or_else(|| {
                AppError::validation("match_type", format!("'{raw}' is not one of all, any"))
            })?,
            _ => MatchType::default(),
        };

        let max_missing_ingredients = match input.max_missing_ingredients {
            Some(v) if v < 0 => {
                return Err(AppError::out_of_range(
                    "max_missing_ingredients",
                    "must be non-negative",
                ));
            }
            Some(v) => Some(v.min(i64::from(u32::MAX)) as u32),
            None => None,
        };

        let limit = match input.limit {
            Some(v) if v < 1 => {
                return Err(AppError::out_of_range("limit", "must be at least 1"));
            }
            Some(v) => Some(v.min(i64::from(u32::MAX)) as u32),
            None => None,
        };

        Ok(Self {
            match_type,
            max_missing_ingredients,
            exclude_categories: input
                .exclude_categories
                .iter()
                .filter_map(|s| Term::new(s))
                .collect(),
            exclude_expired: input.exclude_expired,
            limit,
        })
    }

    /// Whether an ingredient category is excluded from matching
    #[must_use]
    pub fn excludes_category(&self, category: &str) -> bool {
        let folded = category.to_lowercase();
        self.exclude_categories.iter().any(|t| t.folded == folded)
    }
}

/// An ingredient a recipe needs that the fridge lacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingIngredient {
    /// Ingredient id
    pub ingredient_id: i64,
    /// Ingredient name at snapshot time
    pub name: String,
}

/// Score of a single recipe against the owned-ingredient set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// The scored recipe
    pub recipe: RecipeSummary,
    /// Number of required ingredients the fridge covers
    pub matching_count: u32,
    /// Number of required ingredients after category exclusion
    pub required_count: u32,
    /// Required ingredients not owned, in recipe order
    pub missing: Vec<MissingIngredient>,
    /// 100 * matching / required, rounded to one decimal place
    pub match_percentage: f64,
    /// Whether every required ingredient is owned
    pub can_cook: bool,
}

/// Ranked matcher output before page slicing
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Results ordered by match quality, truncated to the policy limit
    pub results: Vec<MatchResult>,
    /// Number of results before truncation
    pub total_count: usize,
}

/// Score candidates against the owned set and rank by match quality
///
/// `owned` must already reflect the policy's category and expiry exclusions
/// on the fridge side; the required side is excluded here. Ordering is
/// `match_percentage` descending, then `can_cook` descending, then recipe id
/// ascending.
#[must_use]
pub fn match_candidates(
    candidates: &[&Recipe],
    owned: &HashSet<i64>,
    policy: &MatchPolicy,
) -> MatchOutcome {
    let mut results: Vec<MatchResult> = candidates
        .par_iter()
        .filter_map(|recipe| score_recipe(recipe, owned, policy))
        .collect();

    results.sort_by(|a, b| {
        b.match_percentage
            .total_cmp(&a.match_percentage)
            .then_with(|| b.can_cook.cmp(&a.can_cook))
            .then_with(|| a.recipe.id.cmp(&b.recipe.id))
    });

    let total_count = results.len();
    if let Some(limit) = policy.limit {
        results.truncate(limit as usize);
    }

    MatchOutcome {
        results,
        total_count,
    }
}

/// Score one recipe; `None` drops it from the suggestion list entirely
fn score_recipe(
    recipe: &Recipe,
    owned: &HashSet<i64>,
    policy: &MatchPolicy,
) -> Option<MatchResult> {
    // Required set: recipe ingredients minus excluded categories, deduplicated
    // by ingredient id in recipe order.
    let mut seen = HashSet::new();
    let required: Vec<_> = recipe
        .ingredients
        .iter()
        .filter(|line| !policy.excludes_category(&line.category))
        .filter(|line| seen.insert(line.ingredient_id))
        .collect();

    // Nothing matchable left: the recipe has no meaningful content under this
    // policy and is excluded rather than reported as 0%.
    if required.is_empty() {
        return None;
    }

    let matching_count = required
        .iter()
        .filter(|line| owned.contains(&line.ingredient_id))
        .count() as u32;
    let missing: Vec<MissingIngredient> = required
        .iter()
        .filter(|line| !owned.contains(&line.ingredient_id))
        .map(|line| MissingIngredient {
            ingredient_id: line.ingredient_id,
            name: line.name.clone(),
        })
        .collect();

    if policy.match_type == MatchType::Any && matching_count == 0 {
        return None;
    }
    if let Some(cap) = policy.max_missing_ingredients {
        if missing.len() as u32 > cap {
            return None;
        }
    }

    let required_count = required.len() as u32;
    let raw_percentage = f64::from(matching_count) / f64::from(required_count) * 100.0;
    let match_percentage = (raw_percentage * 10.0).round() / 10.0;

    Some(MatchResult {
        recipe: RecipeSummary::from(recipe),
        matching_count,
        required_count,
        missing,
        match_percentage,
        can_cook: matching_count == required_count,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::RecipeIngredient;

    fn recipe_abc() -> Recipe {
        Recipe::new(1, 10, "Omelette")
            .with_ingredient(RecipeIngredient::new(1, "Eggs", "dairy", 3.0, "pieces"))
            .with_ingredient(RecipeIngredient::new(2, "Butter", "dairy", 20.0, "g"))
            .with_ingredient(RecipeIngredient::new(3, "Chives", "produce", 5.0, "g"))
    }

    fn owned(ids: &[i64]) -> HashSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_partial_match_counts_and_percentage() {
        let recipe = recipe_abc();
        let outcome = match_candidates(&[&recipe], &owned(&[1, 2]), &MatchPolicy::default());
        let result = &outcome.results[0];
        assert_eq!(result.matching_count, 2);
        assert_eq!(result.required_count, 3);
        assert_eq!(result.missing.len(), 1);
        assert_eq!(result.missing[0].ingredient_id, 3);
        assert!((result.match_percentage - 66.7).abs() < f64::EPSILON);
        assert!(!result.can_cook);
    }

    #[test]
    fn test_full_match_is_cookable() {
        let recipe = recipe_abc();
        let outcome = match_candidates(&[&recipe], &owned(&[1, 2, 3]), &MatchPolicy::default());
        let result = &outcome.results[0];
        assert!(result.can_cook);
        assert!((result.match_percentage - 100.0).abs() < f64::EPSILON);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_max_missing_drops_recipe_entirely() {
        let recipe = recipe_abc();
        let policy = MatchPolicy {
            max_missing_ingredients: Some(0),
            ..MatchPolicy::default()
        };
        let outcome = match_candidates(&[&recipe], &owned(&[1, 2]), &policy);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_empty_fridge_any_yields_nothing() {
        let recipe = recipe_abc();
        let policy = MatchPolicy {
            match_type: MatchType::Any,
            ..MatchPolicy::default()
        };
        let outcome = match_candidates(&[&recipe], &owned(&[]), &policy);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_empty_fridge_all_keeps_uncookable_candidates() {
        let recipe = recipe_abc();
        let outcome = match_candidates(&[&recipe], &owned(&[]), &MatchPolicy::default());
        let result = &outcome.results[0];
        assert_eq!(result.matching_count, 0);
        assert!(!result.can_cook);
        assert!((result.match_percentage - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_category_exclusion_shrinks_required_set() {
        let recipe = recipe_abc();
        let policy = MatchPolicy::normalize(&MatchPolicyInput {
            exclude_categories: vec!["Dairy".into()],
            ..MatchPolicyInput::default()
        })
        .unwrap();
        let outcome = match_candidates(&[&recipe], &owned(&[3]), &policy);
        let result = &outcome.results[0];
        assert_eq!(result.required_count, 1);
        assert!(result.can_cook);
    }

    #[test]
    fn test_all_required_excluded_drops_recipe() {
        let recipe = Recipe::new(2, 10, "Seasoning")
            .with_ingredient(RecipeIngredient::new(9, "Salt", "pantry", 1.0, "tsp"));
        let policy = MatchPolicy::normalize(&MatchPolicyInput {
            exclude_categories: vec!["pantry".into()],
            ..MatchPolicyInput::default()
        })
        .unwrap();
        let outcome = match_candidates(&[&recipe], &owned(&[9]), &policy);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn test_ranking_and_limit() {
        let full = recipe_abc();
        let partial = Recipe::new(5, 10, "Eggy bread")
            .with_ingredient(RecipeIngredient::new(1, "Eggs", "dairy", 2.0, "pieces"))
            .with_ingredient(RecipeIngredient::new(2, "Butter", "dairy", 10.0, "g"))
            .with_ingredient(RecipeIngredient::new(4, "Bread", "bakery", 2.0, "slices"));
        let tied = Recipe::new(3, 10, "Scrambled eggs")
            .with_ingredient(RecipeIngredient::new(1, "Eggs", "dairy", 2.0, "pieces"))
            .with_ingredient(RecipeIngredient::new(2, "Butter", "dairy", 10.0, "g"))
            .with_ingredient(RecipeIngredient::new(5, "Milk", "dairy", 30.0, "ml"));

        let candidates = vec![&full, &partial, &tied];
        let outcome = match_candidates(&candidates, &owned(&[1, 2, 3]), &MatchPolicy::default());
        let ids: Vec<i64> = outcome.results.iter().map(|r| r.recipe.id).collect();
        // 100% (id 1), then the two 66.7% ties by ascending id.
        assert_eq!(ids, vec![1, 3, 5]);

        let limited = MatchPolicy {
            limit: Some(2),
            ..MatchPolicy::default()
        };
        let outcome = match_candidates(&candidates, &owned(&[1, 2, 3]), &limited);
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.total_count, 3);
    }

    #[test]
    fn test_unknown_match_type_rejected() {
        let input = MatchPolicyInput {
            match_type: Some("some".into()),
            ..MatchPolicyInput::default()
        };
        assert!(MatchPolicy::normalize(&input).is_err());
    }
}
