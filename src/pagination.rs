// ABOUTME: Sort and paginate stage for candidate recipe sets
// ABOUTME: Stable ordering with ascending-id tie-break plus offset-page slicing and metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordering and pagination.
//!
//! Ties on the requested sort key are broken by ascending recipe id so
//! repeated calls with identical filters return an identical order. Pages
//! beyond the candidate count yield an empty slice, never an error.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::Recipe;
use crate::query::{SortDirection, SortField};

/// Pagination metadata reported with every result page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Number of candidates before slicing
    pub total_count: usize,
    /// 1-based page number of this slice
    pub current_page: u32,
    /// Requested page size
    pub page_size: u32,
    /// ceil(`total_count` / `page_size`), 0 when the set is empty
    pub total_pages: u32,
    /// Whether a later page exists
    pub has_next: bool,
    /// Whether an earlier page exists
    pub has_prev: bool,
}

impl PageMeta {
    /// Compute metadata for a page over `total_count` candidates
    #[must_use]
    pub fn new(total_count: usize, current_page: u32, page_size: u32) -> Self {
        let size = page_size.max(1);
        let total_pages = (total_count as u64).div_ceil(u64::from(size)) as u32;
        Self {
            total_count,
            current_page,
            page_size: size,
            total_pages,
            has_next: current_page < total_pages,
            has_prev: current_page > 1 && total_count > 0,
        }
    }
}

/// Order candidates by the requested field and direction
///
/// The id tie-break applies in ascending order regardless of direction.
pub fn sort_candidates(candidates: &mut [&Recipe], field: SortField, direction: SortDirection) {
    candidates.sort_by(|a, b| {
        let primary = match field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Rating => a.average_rating.total_cmp(&b.average_rating),
            SortField::PrepTime => a.prep_time_mins.cmp(&b.prep_time_mins),
            SortField::CookTime => a.cook_time_mins.cmp(&b.cook_time_mins),
            SortField::TotalTime => a.total_time_mins().cmp(&b.total_time_mins()),
            SortField::Title => a.title.cmp(&b.title),
        };
        let oriented = match direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        match oriented {
            Ordering::Equal => a.id.cmp(&b.id),
            other => other,
        }
    });
}

/// Slice out page `page` of size `page_size` and report metadata
///
/// Elements `[(page-1)*size, page*size)` are returned; an out-of-range page
/// is an empty slice with intact metadata.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> (Vec<T>, PageMeta) {
    let meta = PageMeta::new(items.len(), page, page_size);
    let start = (page.max(1) as usize - 1).saturating_mul(meta.page_size as usize);
    let slice = items
        .into_iter()
        .skip(start)
        .take(meta.page_size as usize)
        .collect();
    (slice, meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn recipes() -> Vec<Recipe> {
        let base = Utc::now();
        vec![
            Recipe::new(1, 1, "Beta")
                .with_prep_time(30)
                .with_created_at(base - Duration::days(2))
                .with_rating(4.0, 3),
            Recipe::new(2, 1, "Alpha")
                .with_prep_time(10)
                .with_created_at(base)
                .with_rating(4.0, 2),
            Recipe::new(3, 1, "Gamma")
                .with_prep_time(10)
                .with_created_at(base - Duration::days(1))
                .with_rating(2.5, 1),
        ]
    }

    fn ids(candidates: &[&Recipe]) -> Vec<i64> {
        candidates.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_default_sort_created_at_desc() {
        let recipes = recipes();
        let mut candidates: Vec<&Recipe> = recipes.iter().collect();
        sort_candidates(&mut candidates, SortField::CreatedAt, SortDirection::Desc);
        assert_eq!(ids(&candidates), vec![2, 3, 1]);
    }

    #[test]
    fn test_ties_break_by_ascending_id() {
        let recipes = recipes();
        let mut candidates: Vec<&Recipe> = recipes.iter().collect();
        // Recipes 2 and 3 share prep_time 10; id 2 must come first either way.
        sort_candidates(&mut candidates, SortField::PrepTime, SortDirection::Asc);
        assert_eq!(ids(&candidates), vec![2, 3, 1]);
        sort_candidates(&mut candidates, SortField::Rating, SortDirection::Desc);
        assert_eq!(ids(&candidates), vec![1, 2, 3]);
    }

    #[test]
    fn test_title_sort() {
        let recipes = recipes();
        let mut candidates: Vec<&Recipe> = recipes.iter().collect();
        sort_candidates(&mut candidates, SortField::Title, SortDirection::Asc);
        assert_eq!(ids(&candidates), vec![2, 1, 3]);
    }

    #[test]
    fn test_paginate_slices_and_reports_metadata() {
        let (page, meta) = paginate(vec![1, 2, 3, 4, 5], 2, 2);
        assert_eq!(page, vec![3, 4]);
        assert_eq!(meta.total_count, 5);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_page_beyond_range_is_empty_not_error() {
        let (page, meta) = paginate(vec![1, 2, 3], 9, 2);
        assert!(page.is_empty());
        assert_eq!(meta.total_pages, 2);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_empty_set_has_zero_pages() {
        let (page, meta) = paginate(Vec::<i64>::new(), 1, 20);
        assert!(page.is_empty());
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }
}
