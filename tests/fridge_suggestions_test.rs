// ABOUTME: Integration tests for fridge-ingredient suggestions through the catalog service
// ABOUTME: Covers match scoring, policy exclusions, expiry handling, and ranking
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the fridge matching path including:
//! - Matched/missing counts and percentages
//! - Match policy inclusion rules and category exclusion
//! - Expired-item handling and result ranking

use chrono::{Duration, Utc};
use garde_manger::fridge::MatchPolicyInput;
use garde_manger::models::{FridgeItem, Ingredient, Recipe, RecipeIngredient};
use garde_manger::services::CatalogService;
use garde_manger::test_utils::InMemoryStore;

const USER: i64 = 42;

// Ingredient ids used across fixtures
const EGGS: i64 = 1;
const BUTTER: i64 = 2;
const CHIVES: i64 = 3;
const SALT: i64 = 4;
const BREAD: i64 = 5;

fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();

    store.insert_ingredient(Ingredient::new(EGGS, "Eggs", "dairy"));
    store.insert_ingredient(Ingredient::new(BUTTER, "Butter", "dairy"));
    store.insert_ingredient(Ingredient::new(CHIVES, "Chives", "produce"));
    store.insert_ingredient(Ingredient::new(SALT, "Salt", "pantry"));
    store.insert_ingredient(Ingredient::new(BREAD, "Bread", "bakery"));

    store.insert_recipe(
        Recipe::new(1, 7, "Omelette")
            .with_ingredient(RecipeIngredient::new(EGGS, "Eggs", "dairy", 3.0, "pieces"))
            .with_ingredient(RecipeIngredient::new(BUTTER, "Butter", "dairy", 20.0, "g"))
            .with_ingredient(RecipeIngredient::new(CHIVES, "Chives", "produce", 5.0, "g")),
    );
    store.insert_recipe(
        Recipe::new(2, 7, "Buttered toast")
            .with_ingredient(RecipeIngredient::new(BREAD, "Bread", "bakery", 2.0, "slices"))
            .with_ingredient(RecipeIngredient::new(BUTTER, "Butter", "dairy", 10.0, "g")),
    );
    store.insert_recipe(
        Recipe::new(3, 7, "Seasoned butter")
            .with_ingredient(RecipeIngredient::new(SALT, "Salt", "pantry", 2.0, "g"))
            .with_ingredient(RecipeIngredient::new(BUTTER, "Butter", "dairy", 50.0, "g")),
    );

    store
}

fn stock(store: &InMemoryStore, ids: &[i64]) {
    for id in ids {
        store.add_fridge_item(FridgeItem::new(USER, *id));
    }
}

// ============================================================================
// Scoring
// ============================================================================

#[tokio::test]
async fn test_partial_match_scoring() {
    let store = seeded_store();
    stock(&store, &[EGGS, BUTTER]);
    let service = CatalogService::new(store);

    let page = service
        .suggest_from_fridge(USER, &MatchPolicyInput::default())
        .await
        .unwrap();
    let omelette = page.results.iter().find(|r| r.recipe.id == 1).unwrap();
    assert_eq!(omelette.matching_count, 2);
    assert_eq!(omelette.required_count, 3);
    assert_eq!(omelette.missing.len(), 1);
    assert_eq!(omelette.missing[0].name, "Chives");
    assert!((omelette.match_percentage - 66.7).abs() < f64::EPSILON);
    assert!(!omelette.can_cook);
}

#[tokio::test]
async fn test_full_match_is_cookable() {
    let store = seeded_store();
    stock(&store, &[EGGS, BUTTER, CHIVES]);
    let service = CatalogService::new(store);

    let page = service
        .suggest_from_fridge(USER, &MatchPolicyInput::default())
        .await
        .unwrap();
    let omelette = page.results.iter().find(|r| r.recipe.id == 1).unwrap();
    assert!(omelette.can_cook);
    assert!((omelette.match_percentage - 100.0).abs() < f64::EPSILON);
    assert!(omelette.missing.is_empty());
}

#[tokio::test]
async fn test_percentage_within_bounds_and_cookable_means_nothing_missing() {
    let store = seeded_store();
    stock(&store, &[BUTTER]);
    let service = CatalogService::new(store);

    let page = service
        .suggest_from_fridge(USER, &MatchPolicyInput::default())
        .await
        .unwrap();
    for result in &page.results {
        assert!((0.0..=100.0).contains(&result.match_percentage));
        if result.can_cook {
            assert!(result.missing.is_empty());
        }
    }
}

// ============================================================================
// Policy rules
// ============================================================================

#[tokio::test]
async fn test_max_missing_zero_drops_incomplete_recipes() {
    let store = seeded_store();
    stock(&store, &[EGGS, BUTTER]);
    let service = CatalogService::new(store);

    let policy = MatchPolicyInput {
        max_missing_ingredients: Some(0),
        ..MatchPolicyInput::default()
    };
    let page = service.suggest_from_fridge(USER, &policy).await.unwrap();
    assert!(page.results.iter().all(|r| r.missing.is_empty()));
    assert!(page.results.iter().all(|r| r.recipe.id != 1));
}

#[tokio::test]
async fn test_empty_fridge_any_yields_empty_list() {
    let store = seeded_store();
    let service = CatalogService::new(store);

    let policy = MatchPolicyInput {
        match_type: Some("any".into()),
        ..MatchPolicyInput::default()
    };
    let page = service.suggest_from_fridge(USER, &policy).await.unwrap();
    assert!(page.results.is_empty());
    assert_eq!(page.meta.total_count, 0);
}

#[tokio::test]
async fn test_empty_fridge_all_keeps_uncookable_candidates() {
    let store = seeded_store();
    let service = CatalogService::new(store);

    let policy = MatchPolicyInput {
        match_type: Some("all".into()),
        ..MatchPolicyInput::default()
    };
    let page = service.suggest_from_fridge(USER, &policy).await.unwrap();
    assert_eq!(page.results.len(), 3);
    assert!(page.results.iter().all(|r| !r.can_cook));
}

#[tokio::test]
async fn test_category_exclusion_applies_to_both_sides() {
    let store = seeded_store();
    // Fridge holds salt only; with pantry excluded the fridge is effectively
    // empty and "Seasoned butter" requires just butter.
    stock(&store, &[SALT]);
    let service = CatalogService::new(store);

    let policy = MatchPolicyInput {
        exclude_categories: vec!["pantry".into()],
        ..MatchPolicyInput::default()
    };
    let page = service.suggest_from_fridge(USER, &policy).await.unwrap();
    let seasoned = page.results.iter().find(|r| r.recipe.id == 3).unwrap();
    assert_eq!(seasoned.required_count, 1);
    assert_eq!(seasoned.matching_count, 0);
    assert_eq!(seasoned.missing[0].name, "Butter");
}

#[tokio::test]
async fn test_expired_items_not_owned_when_excluded() {
    let store = seeded_store();
    let yesterday = Utc::now() - Duration::days(1);
    store.add_fridge_item(FridgeItem::new(USER, BREAD).with_expiry(yesterday));
    store.add_fridge_item(FridgeItem::new(USER, BUTTER));
    let service = CatalogService::new(store);

    let policy = MatchPolicyInput {
        exclude_expired: true,
        ..MatchPolicyInput::default()
    };
    let page = service.suggest_from_fridge(USER, &policy).await.unwrap();
    let toast = page.results.iter().find(|r| r.recipe.id == 2).unwrap();
    assert_eq!(toast.matching_count, 1);
    assert_eq!(toast.missing[0].name, "Bread");
}

#[tokio::test]
async fn test_invalid_policy_rejected() {
    let store = seeded_store();
    let service = CatalogService::new(store);

    let policy = MatchPolicyInput {
        match_type: Some("most".into()),
        ..MatchPolicyInput::default()
    };
    let err = service.suggest_from_fridge(USER, &policy).await.err().unwrap();
    assert_eq!(err.field.as_deref(), Some("match_type"));

    let policy = MatchPolicyInput {
        limit: Some(0),
        ..MatchPolicyInput::default()
    };
    assert!(service.suggest_from_fridge(USER, &policy).await.is_err());
}

// ============================================================================
// Ranking & metadata
// ============================================================================

#[tokio::test]
async fn test_results_ranked_by_match_quality() {
    let store = seeded_store();
    stock(&store, &[BREAD, BUTTER, EGGS]);
    let service = CatalogService::new(store);

    let page = service
        .suggest_from_fridge(USER, &MatchPolicyInput::default())
        .await
        .unwrap();
    let percentages: Vec<f64> = page.results.iter().map(|r| r.match_percentage).collect();
    let mut sorted = percentages.clone();
    sorted.sort_by(|a, b| b.total_cmp(a));
    assert_eq!(percentages, sorted);
    // Toast is fully stocked and must lead.
    assert_eq!(page.results[0].recipe.id, 2);
    assert!(page.results[0].can_cook);
}

#[tokio::test]
async fn test_limit_truncates_but_metadata_keeps_total() {
    let store = seeded_store();
    stock(&store, &[BUTTER]);
    let service = CatalogService::new(store);

    let policy = MatchPolicyInput {
        limit: Some(1),
        ..MatchPolicyInput::default()
    };
    let page = service.suggest_from_fridge(USER, &policy).await.unwrap();
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.meta.total_count, 3);
    assert!(page.meta.has_next);
}

#[tokio::test]
async fn test_match_type_any_never_marks_partial_results_cookable() {
    let store = seeded_store();
    stock(&store, &[EGGS]);
    let service = CatalogService::new(store);

    let policy = MatchPolicyInput {
        match_type: Some("any".into()),
        ..MatchPolicyInput::default()
    };
    let page = service.suggest_from_fridge(USER, &policy).await.unwrap();
    // Only the omelette shares an ingredient with the fridge; it is included
    // but stays uncookable because cookability always means zero missing.
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].recipe.id, 1);
    assert!(!page.results[0].can_cook);
}
