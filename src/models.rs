// ABOUTME: Data models for the recipe catalog core
// ABOUTME: Defines Recipe, Ingredient, FridgeItem, and related snapshot types
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snapshot types consumed by the search and matching engines.
//!
//! These are read-only views materialized by the storage collaborator. The
//! core never mutates them; derived values (`total_time`, rating aggregates)
//! are recomputed, never hand-edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Recipe difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Simple recipes, basic techniques
    Easy,
    /// Moderate complexity, some techniques required
    #[default]
    Medium,
    /// Complex recipes, advanced techniques
    Hard,
}

impl Difficulty {
    /// Parse a difficulty from user input (case-insensitive)
    ///
    /// Returns `None` for values outside the enum; callers decide whether
    /// that is a validation failure or an absent filter.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Get string representation for API responses
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// A catalog ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique ingredient identifier
    pub id: i64,
    /// Ingredient name, unique case-insensitively
    pub name: String,
    /// Ingredient category (produce, dairy, pantry, ...)
    pub category: String,
    /// Optional display icon reference
    pub icon: Option<String>,
}

impl Ingredient {
    /// Create a new ingredient
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            icon: None,
        }
    }

    /// Attach a display icon
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Single ingredient line within a recipe
///
/// Carries a denormalized name/category snapshot so the engines never reach
/// back into storage during scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Referenced ingredient id
    pub ingredient_id: i64,
    /// Ingredient name at snapshot time
    pub name: String,
    /// Ingredient category at snapshot time
    pub category: String,
    /// Amount in the specified unit, strictly positive
    pub quantity: f64,
    /// Measurement unit, non-empty
    pub unit: String,
}

impl RecipeIngredient {
    /// Create a new recipe ingredient line
    #[must_use]
    pub fn new(
        ingredient_id: i64,
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            ingredient_id,
            name: name.into(),
            category: category.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

/// Equipment needed by a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeEquipment {
    /// Equipment name (e.g. "stand mixer")
    pub name: String,
    /// Whether the recipe cannot be made without it
    pub required: bool,
}

/// A complete recipe snapshot with resolved associations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe identifier
    pub id: i64,
    /// Recipe title
    pub title: String,
    /// Recipe description
    pub description: String,
    /// Cooking instructions (ordered steps)
    pub steps: Vec<String>,
    /// Preparation time in minutes
    pub prep_time_mins: u32,
    /// Cooking time in minutes
    pub cook_time_mins: u32,
    /// Number of servings this recipe makes, at least 1
    pub servings: u32,
    /// Difficulty level
    pub difficulty: Difficulty,
    /// Whether the recipe is visible to everyone
    pub is_public: bool,
    /// Owning author id
    pub author_id: i64,
    /// Mean of all current ratings, 0.0 when unrated (derived, aggregator-owned)
    pub average_rating: f64,
    /// Number of rated comments (derived, aggregator-owned)
    pub rating_count: u32,
    /// Ingredient lines, at least one
    pub ingredients: Vec<RecipeIngredient>,
    /// Equipment with required/optional flags
    pub equipment: Vec<RecipeEquipment>,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Category names
    pub categories: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a new recipe with basic information
    #[must_use]
    pub fn new(id: i64, author_id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            steps: Vec::new(),
            prep_time_mins: 0,
            cook_time_mins: 0,
            servings: 1,
            difficulty: Difficulty::default(),
            is_public: true,
            author_id,
            average_rating: 0.0,
            rating_count: 0,
            ingredients: Vec::new(),
            equipment: Vec::new(),
            tags: Vec::new(),
            categories: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Add a description
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set preparation time
    #[must_use]
    pub const fn with_prep_time(mut self, mins: u32) -> Self {
        self.prep_time_mins = mins;
        self
    }

    /// Set cooking time
    #[must_use]
    pub const fn with_cook_time(mut self, mins: u32) -> Self {
        self.cook_time_mins = mins;
        self
    }

    /// Set number of servings
    #[must_use]
    pub const fn with_servings(mut self, servings: u32) -> Self {
        self.servings = servings;
        self
    }

    /// Set difficulty level
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set visibility
    #[must_use]
    pub const fn with_visibility(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// Add an ingredient line
    #[must_use]
    pub fn with_ingredient(mut self, ingredient: RecipeIngredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    /// Add an instruction step
    #[must_use]
    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Add a tag
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add a category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Add an equipment entry
    #[must_use]
    pub fn with_equipment(mut self, name: impl Into<String>, required: bool) -> Self {
        self.equipment.push(RecipeEquipment {
            name: name.into(),
            required,
        });
        self
    }

    /// Set the creation timestamp (snapshots carry the stored value)
    #[must_use]
    pub const fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set the derived rating aggregate (only the aggregator writes this)
    #[must_use]
    pub const fn with_rating(mut self, average: f64, count: u32) -> Self {
        self.average_rating = average;
        self.rating_count = count;
        self
    }

    /// Get total time (prep + cook), always recomputed
    #[must_use]
    pub const fn total_time_mins(&self) -> u32 {
        self.prep_time_mins.saturating_add(self.cook_time_mins)
    }

    /// Validate structural invariants of this snapshot
    ///
    /// # Errors
    /// Returns a validation error for zero servings, an empty ingredient
    /// list, non-positive quantities, empty units, or a rating aggregate
    /// outside [0, 5].
    pub fn validate(&self) -> AppResult<()> {
        if self.servings < 1 {
            return Err(AppError::validation("servings", "must be at least 1"));
        }
        if self.ingredients.is_empty() {
            return Err(AppError::validation(
                "ingredients",
                "a recipe must have at least one ingredient",
            ));
        }
        for line in &self.ingredients {
            if line.quantity <= 0.0 {
                return Err(AppError::validation(
                    "ingredients.quantity",
                    format!("quantity for '{}' must be positive", line.name),
                ));
            }
            if line.unit.trim().is_empty() {
                return Err(AppError::validation(
                    "ingredients.unit",
                    format!("unit for '{}' must not be empty", line.name),
                ));
            }
        }
        if !(0.0..=5.0).contains(&self.average_rating) {
            return Err(AppError::out_of_range(
                "average_rating",
                "must be between 0 and 5",
            ));
        }
        Ok(())
    }
}

/// Per-user ownership of an ingredient ("what's in the fridge")
///
/// At most one item exists per (user, ingredient) pair; the storage layer
/// enforces the uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FridgeItem {
    /// Owning user id
    pub user_id: i64,
    /// Owned ingredient id
    pub ingredient_id: i64,
    /// Optional amount on hand
    pub quantity: Option<f64>,
    /// Optional unit for the amount
    pub unit: Option<String>,
    /// Optional expiry timestamp
    pub expires_at: Option<DateTime<Utc>>,
    /// Free-form notes
    pub notes: Option<String>,
}

impl FridgeItem {
    /// Create a fridge item with no quantity or expiry information
    #[must_use]
    pub const fn new(user_id: i64, ingredient_id: i64) -> Self {
        Self {
            user_id,
            ingredient_id,
            quantity: None,
            unit: None,
            expires_at: None,
            notes: None,
        }
    }

    /// Set an expiry timestamp
    #[must_use]
    pub const fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Check whether this item is expired at the given instant
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// A comment attached to a recipe, optionally carrying a rating
///
/// Replies carry no rating and are excluded from aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatedComment {
    /// Comment identifier
    pub id: i64,
    /// Recipe the comment belongs to
    pub recipe_id: i64,
    /// Star rating 1-5, `None` for unrated replies
    pub rating: Option<u8>,
}

/// Projection of a recipe for search result lists
///
/// The presentation layer consumes summaries; full snapshots stay inside the
/// engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Recipe identifier
    pub id: i64,
    /// Recipe title
    pub title: String,
    /// Difficulty level
    pub difficulty: Difficulty,
    /// Preparation time in minutes
    pub prep_time_mins: u32,
    /// Cooking time in minutes
    pub cook_time_mins: u32,
    /// Derived total time in minutes
    pub total_time_mins: u32,
    /// Number of servings
    pub servings: u32,
    /// Mean rating
    pub average_rating: f64,
    /// Number of ratings
    pub rating_count: u32,
    /// Tags
    pub tags: Vec<String>,
    /// Categories
    pub categories: Vec<String>,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            difficulty: recipe.difficulty,
            prep_time_mins: recipe.prep_time_mins,
            cook_time_mins: recipe.cook_time_mins,
            total_time_mins: recipe.total_time_mins(),
            servings: recipe.servings,
            average_rating: recipe.average_rating,
            rating_count: recipe.rating_count,
            tags: recipe.tags.clone(),
            categories: recipe.categories.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe() -> Recipe {
        Recipe::new(1, 10, "Shakshuka")
            .with_prep_time(10)
            .with_cook_time(25)
            .with_ingredient(RecipeIngredient::new(1, "Eggs", "dairy", 4.0, "pieces"))
    }

    #[test]
    fn test_total_time_is_derived() {
        let recipe = sample_recipe();
        assert_eq!(recipe.total_time_mins(), 35);
    }

    #[test]
    fn test_validate_accepts_well_formed_recipe() {
        assert!(sample_recipe().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_ingredients() {
        let recipe = Recipe::new(2, 10, "Empty plate");
        assert!(recipe.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_quantity() {
        let recipe = Recipe::new(3, 10, "Bad line")
            .with_ingredient(RecipeIngredient::new(1, "Salt", "pantry", 0.0, "tsp"));
        assert!(recipe.validate().is_err());
    }

    #[test]
    fn test_difficulty_parse_is_case_insensitive() {
        assert_eq!(Difficulty::parse(" HARD "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("unknown"), None);
    }

    #[test]
    fn test_fridge_item_expiry() {
        let now = Utc::now();
        let fresh = FridgeItem::new(1, 2);
        assert!(!fresh.is_expired(now));

        let expired = FridgeItem::new(1, 3).with_expiry(now - chrono::Duration::hours(1));
        assert!(expired.is_expired(now));
    }
}
