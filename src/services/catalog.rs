// ABOUTME: Catalog service orchestrating search, fridge suggestions, and rating refresh
// ABOUTME: Loads snapshots from the store, runs the pure engines, and shapes result pages
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two operations the catalog core exposes to its caller, plus the
//! rating-refresh hook the comment workflow invokes. All heavy lifting is
//! delegated to the pure engine modules; this layer only loads snapshots,
//! wires them through, and logs.

use std::collections::HashSet;

use chrono::Utc;
use tracing::debug;

use crate::config::EngineConfig;
use crate::errors::AppResult;
use crate::filter;
use crate::fridge::{self, MatchPolicy, MatchPolicyInput, MatchResult};
use crate::models::RecipeSummary;
use crate::pagination::{self, PageMeta};
use crate::query::{SearchFilters, SearchQuery};
use crate::ratings::{RatingAggregate, RatingAggregator};
use crate::store::CatalogStore;

/// One page of search results with its metadata
#[derive(Debug, Clone)]
pub struct SearchPage {
    /// Recipe summaries in the requested order
    pub recipes: Vec<RecipeSummary>,
    /// Pagination metadata
    pub meta: PageMeta,
}

/// Ranked fridge suggestions with their metadata
#[derive(Debug, Clone)]
pub struct SuggestionPage {
    /// Match results ordered by match quality
    pub results: Vec<MatchResult>,
    /// Pagination metadata
    pub meta: PageMeta,
}

/// Recipe catalog service over a storage collaborator
pub struct CatalogService<S> {
    store: S,
    config: EngineConfig,
    aggregator: RatingAggregator,
}

impl<S: CatalogStore> CatalogService<S> {
    /// Create a service with default engine configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create a service with explicit engine configuration
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            aggregator: RatingAggregator::new(),
        }
    }

    /// Access the underlying store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Multi-criteria recipe search
    ///
    /// Normalizes the raw filters, selects candidates, orders them, and
    /// slices out the requested page. Identical filters against an unchanged
    /// corpus always return an identical ordered result.
    ///
    /// # Errors
    /// Returns a validation error for malformed filters and propagates store
    /// failures.
    pub async fn search(
        &self,
        filters: &SearchFilters,
        requester: Option<i64>,
    ) -> AppResult<SearchPage> {
        let query = SearchQuery::normalize(filters, &self.config)?;
        let recipes = self.store.load_recipes().await?;

        let mut candidates = filter::filter_candidates(&recipes, &query, requester);
        debug!(
            total = recipes.len(),
            candidates = candidates.len(),
            sort = query.sort_by.as_str(),
            "search candidates selected"
        );

        pagination::sort_candidates(&mut candidates, query.sort_by, query.sort_dir);
        let (page, meta) = pagination::paginate(candidates, query.page, query.page_size);

        Ok(SearchPage {
            recipes: page.into_iter().map(RecipeSummary::from).collect(),
            meta,
        })
    }

    /// Fridge-ingredient suggestions
    ///
    /// Scores every recipe visible to the user against their fridge contents
    /// under the supplied policy, ranked by match quality. The policy's
    /// `limit` acts as the page size of the single returned page.
    ///
    /// # Errors
    /// Returns a validation error for a malformed policy and propagates
    /// store failures.
    pub async fn suggest_from_fridge(
        &self,
        user_id: i64,
        input: &MatchPolicyInput,
    ) -> AppResult<SuggestionPage> {
        let policy = MatchPolicy::normalize(input)?;
        let owned = self.owned_ingredients(user_id, &policy).await?;

        let recipes = self.store.load_recipes().await?;
        let candidates = filter::visible_candidates(&recipes, Some(user_id));
        let outcome = fridge::match_candidates(&candidates, &owned, &policy);
        debug!(
            user_id,
            owned = owned.len(),
            candidates = candidates.len(),
            suggestions = outcome.total_count,
            "fridge suggestions computed"
        );

        let page_size = policy
            .limit
            .unwrap_or_else(|| outcome.total_count.max(1) as u32);
        let meta = PageMeta::new(outcome.total_count, 1, page_size);

        Ok(SuggestionPage {
            results: outcome.results,
            meta,
        })
    }

    /// Recompute a recipe's rating aggregate after a comment mutation
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown recipe and `ConcurrencyConflict`
    /// when the write loses its race beyond the configured retry budget.
    pub async fn refresh_rating(&self, recipe_id: i64) -> AppResult<RatingAggregate> {
        self.aggregator
            .recompute(&self.store, recipe_id, self.config.rating_write_retries)
            .await
    }

    /// Resolve the owned-ingredient id set under the policy's exclusions
    async fn owned_ingredients(
        &self,
        user_id: i64,
        policy: &MatchPolicy,
    ) -> AppResult<HashSet<i64>> {
        let now = Utc::now();
        let fridge = self.store.load_fridge(user_id).await?;
        let mut owned: HashSet<i64> = fridge
            .iter()
            .filter(|item| !(policy.exclude_expired && item.is_expired(now)))
            .map(|item| item.ingredient_id)
            .collect();

        if !policy.exclude_categories.is_empty() && !owned.is_empty() {
            let ids: Vec<i64> = owned.iter().copied().collect();
            // Ingredients without a resolvable record keep their owned status;
            // only a known, excluded category removes them.
            for ingredient in self.store.load_ingredients(&ids).await? {
                if policy.excludes_category(&ingredient.category) {
                    owned.remove(&ingredient.id);
                }
            }
        }

        Ok(owned)
    }
}
