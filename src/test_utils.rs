// ABOUTME: Shared test utilities with an in-memory CatalogStore implementation
// ABOUTME: Provides seedable fixtures for engine and service tests without a database
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage fixture.
//!
//! Backs the integration tests and doubles as the reference semantics for
//! [`CatalogStore`] implementations: fridge rows are unique per
//! (user, ingredient), and every rating mutation bumps the recipe's aggregate
//! version so the compare-and-swap write path is exercised for real.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::errors::AppResult;
use crate::models::{FridgeItem, Ingredient, RatedComment, Recipe};
use crate::store::{CatalogStore, RatingSnapshot};

#[derive(Debug, Default)]
struct StoreInner {
    recipes: DashMap<i64, Recipe>,
    ingredients: DashMap<i64, Ingredient>,
    fridge: DashMap<i64, Vec<FridgeItem>>,
    ratings: DashMap<i64, (Vec<RatedComment>, u64)>,
}

/// In-memory catalog store for tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<StoreInner>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a recipe snapshot
    pub fn insert_recipe(&self, recipe: Recipe) {
        self.inner
            .ratings
            .entry(recipe.id)
            .or_insert_with(|| (Vec::new(), 0));
        self.inner.recipes.insert(recipe.id, recipe);
    }

    /// Insert or replace an ingredient record
    pub fn insert_ingredient(&self, ingredient: Ingredient) {
        self.inner.ingredients.insert(ingredient.id, ingredient);
    }

    /// Add a fridge item, replacing any existing (user, ingredient) row
    pub fn add_fridge_item(&self, item: FridgeItem) {
        let mut entry = self.inner.fridge.entry(item.user_id).or_default();
        entry.retain(|existing| existing.ingredient_id != item.ingredient_id);
        entry.push(item);
    }

    /// Attach a comment to a recipe, bumping the rating version
    pub fn add_comment(&self, comment: RatedComment) {
        let mut entry = self
            .inner
            .ratings
            .entry(comment.recipe_id)
            .or_insert_with(|| (Vec::new(), 0));
        entry.0.push(comment);
        entry.1 += 1;
    }

    /// Remove a comment from a recipe, bumping the rating version
    pub fn remove_comment(&self, recipe_id: i64, comment_id: i64) {
        if let Some(mut entry) = self.inner.ratings.get_mut(&recipe_id) {
            entry.0.retain(|c| c.id != comment_id);
            entry.1 += 1;
        }
    }

    /// Read back a recipe's stored rating aggregate
    #[must_use]
    pub fn rating_aggregate(&self, recipe_id: i64) -> Option<(f64, u32)> {
        self.inner
            .recipes
            .get(&recipe_id)
            .map(|r| (r.average_rating, r.rating_count))
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn load_recipes(&self) -> AppResult<Vec<Recipe>> {
        let mut recipes: Vec<Recipe> = self
            .inner
            .recipes
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        recipes.sort_by_key(|r| r.id);
        Ok(recipes)
    }

    async fn load_recipe(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        Ok(self
            .inner
            .recipes
            .get(&recipe_id)
            .map(|entry| entry.value().clone()))
    }

    async fn load_ingredients(&self, ids: &[i64]) -> AppResult<Vec<Ingredient>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.inner.ingredients.get(id))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn load_fridge(&self, user_id: i64) -> AppResult<Vec<FridgeItem>> {
        Ok(self
            .inner
            .fridge
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn load_ratings(&self, recipe_id: i64) -> AppResult<Option<RatingSnapshot>> {
        if !self.inner.recipes.contains_key(&recipe_id) {
            return Ok(None);
        }
        let (comments, version) = self
            .inner
            .ratings
            .get(&recipe_id)
            .map(|entry| entry.value().clone())
            .unwrap_or((Vec::new(), 0));
        Ok(Some(RatingSnapshot { comments, version }))
    }

    async fn write_rating_aggregate(
        &self,
        recipe_id: i64,
        average_rating: f64,
        rating_count: u32,
        expected_version: u64,
    ) -> AppResult<bool> {
        let Some(entry) = self.inner.ratings.get(&recipe_id) else {
            return Ok(false);
        };
        if entry.value().1 != expected_version {
            return Ok(false);
        }
        drop(entry);

        if let Some(mut recipe) = self.inner.recipes.get_mut(&recipe_id) {
            recipe.average_rating = average_rating;
            recipe.rating_count = rating_count;
        }
        Ok(true)
    }
}
