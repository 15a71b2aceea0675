// ABOUTME: Service layer module exposing the catalog core's operations
// ABOUTME: Business logic orchestration kept out of any transport layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer for the catalog core.

/// Search and fridge-suggestion orchestration
pub mod catalog;

pub use catalog::{CatalogService, SearchPage, SuggestionPage};
