// ABOUTME: Rating aggregator recomputing a recipe's average rating and count
// ABOUTME: Serializes recompute-then-write per recipe with a bounded retry on version conflicts
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rating aggregation.
//!
//! Invoked after any create, update, or delete of a rating-bearing comment.
//! The aggregate is always recomputed from the full rating set, never kept as
//! a running counter, so partial failures cannot make it drift. Writes are
//! serialized per recipe: a keyed mutex serializes callers within this
//! process, and a versioned compare-and-swap in the store catches races with
//! other writers.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::store::CatalogStore;

/// Recomputed rating aggregate for a recipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingAggregate {
    /// Arithmetic mean of all ratings, 0.0 when none remain
    pub average_rating: f64,
    /// Number of rated comments
    pub rating_count: u32,
}

/// Recomputes and writes rating aggregates with per-recipe serialization
#[derive(Debug, Default)]
pub struct RatingAggregator {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl RatingAggregator {
    /// Create a new aggregator with an empty lock registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute a recipe's rating aggregate and write it back
    ///
    /// Retries the read-recompute-write cycle up to `retries` times when the
    /// store reports a version conflict.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown recipe id, `ConcurrencyConflict`
    /// once the retry budget is exhausted, and propagates store failures.
    pub async fn recompute<S: CatalogStore>(
        &self,
        store: &S,
        recipe_id: i64,
        retries: u32,
    ) -> AppResult<RatingAggregate> {
        let lock = self
            .locks
            .entry(recipe_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        for attempt in 1..=retries {
            let snapshot = store
                .load_ratings(recipe_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("recipe {recipe_id}")))?;

            let aggregate = compute_aggregate(
                snapshot
                    .comments
                    .iter()
                    .filter_map(|comment| comment.rating),
            );

            let written = store
                .write_rating_aggregate(
                    recipe_id,
                    aggregate.average_rating,
                    aggregate.rating_count,
                    snapshot.version,
                )
                .await?;
            if written {
                debug!(
                    recipe_id,
                    average = aggregate.average_rating,
                    count = aggregate.rating_count,
                    "rating aggregate written"
                );
                return Ok(aggregate);
            }

            warn!(recipe_id, attempt, "rating aggregate write lost a race, retrying");
        }

        Err(AppError::concurrency(format!(
            "rating recomputation for recipe {recipe_id} conflicted {retries} times"
        )))
    }
}

/// Mean and count over the non-null ratings currently attached to a recipe
fn compute_aggregate(ratings: impl Iterator<Item = u8>) -> RatingAggregate {
    let mut sum = 0u64;
    let mut count = 0u32;
    for rating in ratings {
        sum += u64::from(rating);
        count += 1;
    }

    if count == 0 {
        return RatingAggregate {
            average_rating: 0.0,
            rating_count: 0,
        };
    }

    RatingAggregate {
        average_rating: sum as f64 / f64::from(count),
        rating_count: count,
    }
}
