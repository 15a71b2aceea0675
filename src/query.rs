// ABOUTME: Search filter input types and query normalization
// ABOUTME: Turns raw untyped filters into a validated SearchQuery with defaults and bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query normalization.
//!
//! Raw filter input arrives untyped from the caller (query strings, JSON
//! bodies). [`SearchQuery::normalize`] validates it into a canonical form or
//! fails with a validation error naming the offending field. Normalization is
//! pure: no defaults are read from global state and nothing is mutated.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::errors::{AppError, AppResult};
use crate::models::Difficulty;

/// Field to order search results by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Creation timestamp
    #[default]
    CreatedAt,
    /// Average rating
    Rating,
    /// Preparation time
    PrepTime,
    /// Cooking time
    CookTime,
    /// Derived total time
    TotalTime,
    /// Title, lexicographic
    Title,
}

impl SortField {
    /// Parse a sort field from string (case-insensitive)
    ///
    /// Unknown values fall back to [`SortField::CreatedAt`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "rating" => Self::Rating,
            "prep_time" => Self::PrepTime,
            "cook_time" => Self::CookTime,
            "total_time" => Self::TotalTime,
            "title" => Self::Title,
            _ => Self::CreatedAt,
        }
    }

    /// Get string representation for API responses
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Rating => "rating",
            Self::PrepTime => "prep_time",
            Self::CookTime => "cook_time",
            Self::TotalTime => "total_time",
            Self::Title => "title",
        }
    }
}

/// Direction to order search results in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse a direction from string, defaulting to descending
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// A string filter kept in both display and comparison forms
///
/// Matching is case-insensitive, but the verbatim input survives for echoing
/// back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Trimmed input as supplied
    pub display: String,
    /// Case-folded form used for comparison
    pub folded: String,
}

impl Term {
    /// Build a term from raw input, trimming and case-folding
    ///
    /// Returns `None` when the input is blank.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            display: trimmed.to_owned(),
            folded: trimmed.to_lowercase(),
        })
    }
}

/// Raw, untyped search filter input as received from the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Free-text term matched against title and description
    pub text: Option<String>,
    /// Category names; a recipe matches if it has any of them
    pub categories: Vec<String>,
    /// Tag names; a recipe matches if it has any of them
    pub tags: Vec<String>,
    /// Equipment names; a recipe matches if it has any of them
    pub equipment: Vec<String>,
    /// Ingredient ids; a recipe matches if it uses any of them
    pub ingredient_ids: Vec<i64>,
    /// Difficulty name (easy, medium, hard)
    pub difficulty: Option<String>,
    /// Inclusive upper bound on preparation minutes
    pub max_prep_time: Option<i64>,
    /// Inclusive upper bound on cooking minutes
    pub max_cook_time: Option<i64>,
    /// Inclusive upper bound on total minutes
    pub max_total_time: Option<i64>,
    /// Inclusive lower bound on average rating
    pub min_rating: Option<f64>,
    /// Inclusive lower bound on servings
    pub min_servings: Option<i64>,
    /// Inclusive upper bound on servings
    pub max_servings: Option<i64>,
    /// Restrict to a single author
    pub author_id: Option<i64>,
    /// Sort field name; unknown values fall back to `created_at`
    pub sort_by: Option<String>,
    /// Sort direction name; unknown values fall back to `desc`
    pub sort_dir: Option<String>,
    /// 1-based page number
    pub page: Option<i64>,
    /// Results per page
    pub page_size: Option<i64>,
}

/// Validated, canonical search query
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Free-text term
    pub text: Option<Term>,
    /// Category filter set
    pub categories: Vec<Term>,
    /// Tag filter set
    pub tags: Vec<Term>,
    /// Equipment filter set
    pub equipment: Vec<Term>,
    /// Ingredient id filter set
    pub ingredient_ids: Vec<i64>,
    /// Difficulty filter
    pub difficulty: Option<Difficulty>,
    /// Inclusive prep time bound in minutes
    pub max_prep_time_mins: Option<u32>,
    /// Inclusive cook time bound in minutes
    pub max_cook_time_mins: Option<u32>,
    /// Inclusive total time bound in minutes
    pub max_total_time_mins: Option<u32>,
    /// Inclusive lower rating bound
    pub min_rating: Option<f64>,
    /// Inclusive lower servings bound
    pub min_servings: Option<u32>,
    /// Inclusive upper servings bound
    pub max_servings: Option<u32>,
    /// Author restriction
    pub author_id: Option<i64>,
    /// Sort field
    pub sort_by: SortField,
    /// Sort direction
    pub sort_dir: SortDirection,
    /// 1-based page number, at least 1
    pub page: u32,
    /// Results per page, within configured bounds
    pub page_size: u32,
}

impl SearchQuery {
    /// Validate and canonicalize raw filter input
    ///
    /// # Errors
    /// Returns a validation error naming the offending field for negative
    /// time bounds, a rating bound outside [0, 5], servings bounds below 1 or
    /// inverted, or a difficulty outside the enum.
    pub fn normalize(filters: &SearchFilters, config: &EngineConfig) -> AppResult<Self> {
        let difficulty = match &filters.difficulty {
            Some(raw) if !raw.trim().is_empty() => Some(
                Difficulty::parse(raw).ok_or_else(|| {
                    AppError::validation(
                        "difficulty",
                        format!("'{raw}' is not one of easy, medium, hard"),
                    )
                })?,
            ),
            _ => None,
        };

        let min_rating = match filters.min_rating {
            Some(r) if !(0.0..=5.0).contains(&r) => {
                return Err(AppError::out_of_range(
                    "min_rating",
                    "must be between 0 and 5",
                ));
            }
            other => other,
        };

        let min_servings = bounded_count("min_servings", filters.min_servings)?;
        let max_servings = bounded_count("max_servings", filters.max_servings)?;
        if let (Some(lo), Some(hi)) = (min_servings, max_servings) {
            if lo > hi {
                return Err(AppError::validation(
                    "min_servings",
                    "must not exceed max_servings",
                ));
            }
        }

        // Page clamps rather than errors; time bounds reject instead.
        let page = filters.page.map_or(1, |p| p.clamp(1, i64::from(u32::MAX))) as u32;
        let page_size = filters.page_size.map_or(
            i64::from(config.default_page_size),
            |s| s.clamp(1, i64::from(config.max_page_size)),
        ) as u32;

        Ok(Self {
            text: filters.text.as_deref().and_then(Term::new),
            categories: fold_terms(&filters.categories),
            tags: fold_terms(&filters.tags),
            equipment: fold_terms(&filters.equipment),
            ingredient_ids: filters.ingredient_ids.clone(),
            difficulty,
            max_prep_time_mins: time_bound("max_prep_time", filters.max_prep_time)?,
            max_cook_time_mins: time_bound("max_cook_time", filters.max_cook_time)?,
            max_total_time_mins: time_bound("max_total_time", filters.max_total_time)?,
            min_rating,
            min_servings,
            max_servings,
            author_id: filters.author_id,
            sort_by: filters.sort_by.as_deref().map_or_else(SortField::default, SortField::parse),
            sort_dir: filters
                .sort_dir
                .as_deref()
                .map_or_else(SortDirection::default, SortDirection::parse),
            page,
            page_size,
        })
    }
}

/// Trim, case-fold, and drop blank entries from a multi-valued filter
fn fold_terms(raw: &[String]) -> Vec<Term> {
    raw.iter().filter_map(|s| Term::new(s)).collect()
}

/// Validate an inclusive minute bound; negative values are rejected
fn time_bound(field: &str, raw: Option<i64>) -> AppResult<Option<u32>> {
    match raw {
        Some(v) if v < 0 => Err(AppError::out_of_range(field, "must be non-negative")),
        Some(v) => Ok(Some(v.min(i64::from(u32::MAX)) as u32)),
        None => Ok(None),
    }
}

/// Validate a servings bound; values below 1 are rejected
fn bounded_count(field: &str, raw: Option<i64>) -> AppResult<Option<u32>> {
    match raw {
        Some(v) if v < 1 => Err(AppError::out_of_range(field, "must be at least 1")),
        Some(v) => Ok(Some(v.min(i64::from(u32::MAX)) as u32)),
        None => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_defaults_applied() {
        let query = SearchQuery::normalize(&SearchFilters::default(), &config()).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.sort_dir, SortDirection::Desc);
    }

    #[test]
    fn test_page_clamped_not_rejected() {
        let filters = SearchFilters {
            page: Some(-3),
            page_size: Some(10_000),
            ..SearchFilters::default()
        };
        let query = SearchQuery::normalize(&filters, &config()).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 100);
    }

    #[test]
    fn test_negative_time_bound_rejected() {
        let filters = SearchFilters {
            max_prep_time: Some(-1),
            ..SearchFilters::default()
        };
        let err = SearchQuery::normalize(&filters, &config()).err();
        assert_eq!(err.and_then(|e| e.field), Some("max_prep_time".to_owned()));
    }

    #[test]
    fn test_unknown_difficulty_rejected() {
        let filters = SearchFilters {
            difficulty: Some("impossible".into()),
            ..SearchFilters::default()
        };
        assert!(SearchQuery::normalize(&filters, &config()).is_err());
    }

    #[test]
    fn test_unknown_sort_falls_back() {
        let filters = SearchFilters {
            sort_by: Some("deliciousness".into()),
            sort_dir: Some("sideways".into()),
            ..SearchFilters::default()
        };
        let query = SearchQuery::normalize(&filters, &config()).unwrap();
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.sort_dir, SortDirection::Desc);
    }

    #[test]
    fn test_terms_trimmed_and_folded_but_display_preserved() {
        let filters = SearchFilters {
            text: Some("  Shakshuka  ".into()),
            tags: vec!["  Brunch ".into(), "   ".into()],
            ..SearchFilters::default()
        };
        let query = SearchQuery::normalize(&filters, &config()).unwrap();
        let text = query.text.unwrap();
        assert_eq!(text.display, "Shakshuka");
        assert_eq!(text.folded, "shakshuka");
        assert_eq!(query.tags.len(), 1);
        assert_eq!(query.tags[0].display, "Brunch");
    }

    #[test]
    fn test_min_rating_out_of_range() {
        let filters = SearchFilters {
            min_rating: Some(5.5),
            ..SearchFilters::default()
        };
        assert!(SearchQuery::normalize(&filters, &config()).is_err());
    }
}
