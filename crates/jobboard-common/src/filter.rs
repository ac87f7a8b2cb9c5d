use crate::models::job::{Job, JobFilters};

/// Page size used when the caller gives none (or zero)
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Whether a posting satisfies every active predicate in `filters`.
///
/// - search: case-insensitive substring of title, company, location or
///   description (any one field is enough)
/// - type: exact match against the wire name, e.g. "Full-time"
/// - location: case-insensitive substring; whitespace-only is inactive
pub fn matches_filters(job: &Job, filters: &JobFilters) -> bool {
    if !filters.search.is_empty() {
        let term = filters.search.to_lowercase();
        let hit = [&job.title, &job.company, &job.location, &job.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&term));
        if !hit {
            return false;
        }
    }

    if !filters.job_type.is_empty() && job.job_type.as_str() != filters.job_type {
        return false;
    }

    if !filters.location.trim().is_empty()
        && !job
            .location
            .to_lowercase()
            .contains(&filters.location.to_lowercase())
    {
        return false;
    }

    true
}

/// Filter `corpus`, then cut out the requested page.
///
/// Returns `(page_slice, total)` where `total` counts every match, not just the
/// ones on the page. Pages past the end come back empty. A `page` of zero is
/// treated as the first page and a `limit` of zero as [`DEFAULT_PAGE_SIZE`].
pub fn filter_and_paginate(
    corpus: Vec<Job>,
    filters: &JobFilters,
    page: u32,
    limit: u32,
) -> (Vec<Job>, usize) {
    let limit = if limit == 0 { DEFAULT_PAGE_SIZE } else { limit };
    let limit = limit as usize;
    let page = page.max(1) as usize;

    let filtered: Vec<Job> = corpus
        .into_iter()
        .filter(|job| matches_filters(job, filters))
        .collect();
    let total = filtered.len();

    let start = (page - 1).saturating_mul(limit);
    let slice = filtered.into_iter().skip(start).take(limit).collect();

    (slice, total)
}
