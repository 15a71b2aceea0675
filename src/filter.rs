// ABOUTME: Filter engine applying a SearchQuery against a recipe corpus snapshot
// ABOUTME: Conjunctive across dimensions, any-of within multi-valued dimensions
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate selection.
//!
//! Predicates are ANDed across filter dimensions; a multi-valued dimension
//! (tags, categories, equipment, ingredients) is satisfied when the recipe
//! has any of the listed values. The engine is deterministic: identical input
//! and corpus produce the identical candidate set.

use crate::models::Recipe;
use crate::query::{SearchQuery, Term};

/// Select the recipes satisfying every supplied predicate
///
/// `requester` is the authenticated user id, if any; private recipes are
/// candidates only for their author.
#[must_use]
pub fn filter_candidates<'a>(
    recipes: &'a [Recipe],
    query: &SearchQuery,
    requester: Option<i64>,
) -> Vec<&'a Recipe> {
    recipes
        .iter()
        .filter(|recipe| matches(recipe, query, requester))
        .collect()
}

/// Select the recipes visible to `requester`, ignoring all other filters
///
/// Used by the fridge-suggestion path, which applies its own ingredient
/// scoring instead of search predicates.
#[must_use]
pub fn visible_candidates(recipes: &[Recipe], requester: Option<i64>) -> Vec<&Recipe> {
    recipes
        .iter()
        .filter(|recipe| is_visible(recipe, requester))
        .collect()
}

/// Visibility rule: public recipes for everyone, private only for the author
fn is_visible(recipe: &Recipe, requester: Option<i64>) -> bool {
    recipe.is_public || requester == Some(recipe.author_id)
}

fn matches(recipe: &Recipe, query: &SearchQuery, requester: Option<i64>) -> bool {
    if !is_visible(recipe, requester) {
        return false;
    }

    if let Some(text) = &query.text {
        let title = recipe.title.to_lowercase();
        let description = recipe.description.to_lowercase();
        if !title.contains(&text.folded) && !description.contains(&text.folded) {
            return false;
        }
    }

    if let Some(difficulty) = query.difficulty {
        if recipe.difficulty != difficulty {
            return false;
        }
    }

    if let Some(author_id) = query.author_id {
        if recipe.author_id != author_id {
            return false;
        }
    }

    if let Some(bound) = query.max_prep_time_mins {
        if recipe.prep_time_mins > bound {
            return false;
        }
    }
    if let Some(bound) = query.max_cook_time_mins {
        if recipe.cook_time_mins > bound {
            return false;
        }
    }
    if let Some(bound) = query.max_total_time_mins {
        if recipe.total_time_mins() > bound {
            return false;
        }
    }

    if let Some(min) = query.min_rating {
        if recipe.average_rating < min {
            return false;
        }
    }

    if let Some(min) = query.min_servings {
        if recipe.servings < min {
            return false;
        }
    }
    if let Some(max) = query.max_servings {
        if recipe.servings > max {
            return false;
        }
    }

    if !query.categories.is_empty() && !any_term_matches(&query.categories, &recipe.categories) {
        return false;
    }
    if !query.tags.is_empty() && !any_term_matches(&query.tags, &recipe.tags) {
        return false;
    }
    if !query.equipment.is_empty() {
        let names: Vec<&str> = recipe.equipment.iter().map(|e| e.name.as_str()).collect();
        if !query
            .equipment
            .iter()
            .any(|term| names.iter().any(|n| n.to_lowercase() == term.folded))
        {
            return false;
        }
    }

    if !query.ingredient_ids.is_empty()
        && !recipe
            .ingredients
            .iter()
            .any(|line| query.ingredient_ids.contains(&line.ingredient_id))
    {
        return false;
    }

    true
}

/// Any-of comparison between folded filter terms and recipe values
fn any_term_matches(terms: &[Term], values: &[String]) -> bool {
    terms
        .iter()
        .any(|term| values.iter().any(|v| v.to_lowercase() == term.folded))
}
