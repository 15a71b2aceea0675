// ABOUTME: Storage abstraction for the recipe catalog core
// ABOUTME: Defines the CatalogStore trait implemented by the collaborator persistence layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The seam between the pure engines and the storage collaborator.
//!
//! All reads return fully materialized snapshots so the engines never perform
//! I/O mid-computation. The single write path (rating aggregation) goes
//! through a versioned compare-and-swap.

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::{FridgeItem, Ingredient, RatedComment, Recipe};

/// Ratings attached to a recipe together with the aggregate's write version
///
/// The version increments on every rating mutation; the aggregator passes it
/// back on write so a lost race is detected instead of silently overwritten.
#[derive(Debug, Clone)]
pub struct RatingSnapshot {
    /// All comments currently attached to the recipe, rated or not
    pub comments: Vec<RatedComment>,
    /// Version observed at read time
    pub version: u64,
}

/// Core storage abstraction trait
///
/// All storage implementations must implement this trait to provide a
/// consistent interface for the catalog engines.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Load a snapshot of all recipes with resolved associations
    async fn load_recipes(&self) -> AppResult<Vec<Recipe>>;

    /// Load a single recipe snapshot by id
    async fn load_recipe(&self, recipe_id: i64) -> AppResult<Option<Recipe>>;

    /// Resolve ingredient records for the given ids
    ///
    /// Unknown ids are silently absent from the result.
    async fn load_ingredients(&self, ids: &[i64]) -> AppResult<Vec<Ingredient>>;

    /// Load a user's fridge contents
    ///
    /// A user with no fridge rows yields an empty vector, not an error.
    async fn load_fridge(&self, user_id: i64) -> AppResult<Vec<FridgeItem>>;

    /// Load the ratings attached to a recipe, with the aggregate version
    ///
    /// Returns `None` when the recipe does not exist.
    async fn load_ratings(&self, recipe_id: i64) -> AppResult<Option<RatingSnapshot>>;

    /// Write a recomputed rating aggregate if the version still matches
    ///
    /// Returns `false` when `expected_version` no longer matches the stored
    /// version, in which case the caller must re-read and recompute.
    async fn write_rating_aggregate(
        &self,
        recipe_id: i64,
        average_rating: f64,
        rating_count: u32,
        expected_version: u64,
    ) -> AppResult<bool>;
}
