// ABOUTME: Main library entry point for the garde-manger recipe catalog core
// ABOUTME: Exposes search, fridge matching, and rating aggregation engines
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Garde-Manger
//!
//! The computational core of a recipe catalog: multi-criteria search and
//! fridge-ingredient matching over read-only corpus snapshots, plus the one
//! guarded write path (rating aggregation).
//!
//! ## Architecture
//!
//! - **Query normalization** ([`query`]): raw filter input becomes a
//!   validated [`query::SearchQuery`] or fails naming the offending field
//! - **Filter engine** ([`filter`]): conjunctive predicates, any-of within
//!   multi-valued dimensions, visibility honoring recipe authorship
//! - **Sort & paginate** ([`pagination`]): stable ordering with an
//!   ascending-id tie-break and offset-page metadata
//! - **Fridge matcher** ([`fridge`]): scores recipes against owned
//!   ingredients under a caller-supplied [`fridge::MatchPolicy`]
//! - **Rating aggregator** ([`ratings`]): recompute-on-write aggregate
//!   serialized per recipe
//! - **Storage seam** ([`store`]): the [`store::CatalogStore`] trait the
//!   persistence collaborator implements
//!
//! The engines are pure and synchronous; they operate on snapshots already
//! materialized in memory and are safe to run fully in parallel across
//! requests. Async appears only at the store boundary.
//!
//! ## Example
//!
//! ```rust,no_run
//! use garde_manger::query::SearchFilters;
//! use garde_manger::services::CatalogService;
//! use garde_manger::test_utils::InMemoryStore;
//!
//! # #[tokio::main]
//! # async fn main() -> garde_manger::errors::AppResult<()> {
//! let service = CatalogService::new(InMemoryStore::new());
//! let filters = SearchFilters {
//!     text: Some("tomato".into()),
//!     max_total_time: Some(45),
//!     ..SearchFilters::default()
//! };
//! let page = service.search(&filters, None).await?;
//! println!("{} recipes match", page.meta.total_count);
//! # Ok(())
//! # }
//! ```

/// Engine configuration with environment-first loading
pub mod config;
/// Unified error handling
pub mod errors;
/// Filter engine for candidate selection
pub mod filter;
/// Fridge-ingredient matching engine
pub mod fridge;
/// Structured logging configuration
pub mod logging;
/// Snapshot data models
pub mod models;
/// Sort and paginate stage
pub mod pagination;
/// Search filter input and query normalization
pub mod query;
/// Rating aggregation
pub mod ratings;
/// Service layer orchestration
pub mod services;
/// Storage abstraction
pub mod store;
/// In-memory store and fixtures for tests
pub mod test_utils;

pub use errors::{AppError, AppResult, ErrorCode};
pub use fridge::{MatchPolicy, MatchPolicyInput, MatchResult, MatchType};
pub use models::{Difficulty, FridgeItem, Ingredient, Recipe, RecipeIngredient, RecipeSummary};
pub use pagination::PageMeta;
pub use query::{SearchFilters, SearchQuery, SortDirection, SortField};
pub use services::CatalogService;
pub use store::CatalogStore;
