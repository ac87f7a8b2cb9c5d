use serde::{Deserialize, Serialize};
use std::fmt;

use crate::filter::DEFAULT_PAGE_SIZE;

/// Employment type of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Remote,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Remote,
    ];

    /// Wire representation, also what the type filter compares against
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Remote => "Remote",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job posting. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    /// Display-formatted, e.g. "$120k - $150k"
    pub salary: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub posted_date: String,
}

/// Active listing filters. Empty strings mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilters {
    pub search: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub location: String,
}

impl JobFilters {
    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty() || !self.job_type.is_empty() || !self.location.is_empty()
    }

    /// Overwrite only the fields present in `update`.
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(search) = update.search {
            self.search = search;
        }
        if let Some(job_type) = update.job_type {
            self.job_type = job_type;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
    }
}

/// Partial filter change, as produced by a single filter input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub search: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
}

impl FilterUpdate {
    pub fn search(value: impl Into<String>) -> Self {
        Self {
            search: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn job_type(value: impl Into<String>) -> Self {
        Self {
            job_type: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn location(value: impl Into<String>) -> Self {
        Self {
            location: Some(value.into()),
            ..Default::default()
        }
    }
}

/// Client-side pagination cursor.
///
/// `total` is the number of postings left after filtering, never the size of
/// the unfiltered corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl Pagination {
    /// Last valid page, `ceil(total / limit)`
    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit as usize) as u32
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}

/// Criteria for a single listing fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    pub search: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl JobQuery {
    pub fn from_state(filters: &JobFilters, pagination: &Pagination) -> Self {
        Self {
            search: Some(filters.search.clone()),
            job_type: Some(filters.job_type.clone()),
            location: Some(filters.location.clone()),
            page: Some(pagination.page),
            limit: Some(pagination.limit),
        }
    }

    pub fn filters(&self) -> JobFilters {
        JobFilters {
            search: self.search.clone().unwrap_or_default(),
            job_type: self.job_type.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
        }
    }

    /// Requested page; absent or zero means the first page
    pub fn effective_page(&self) -> u32 {
        match self.page {
            Some(p) if p > 0 => p,
            _ => 1,
        }
    }

    /// Requested page size; absent or zero falls back to the default
    pub fn effective_limit(&self) -> u32 {
        match self.limit {
            Some(l) if l > 0 => l,
            _ => DEFAULT_PAGE_SIZE,
        }
    }
}
