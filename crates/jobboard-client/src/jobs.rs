use jobboard_common::{filter_and_paginate, FilterUpdate, Job, JobFilters, JobQuery, Pagination};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::gateway::Gateway;
use crate::lifecycle::Lifecycle;

/// One page of filtered postings plus the filtered total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub total: usize,
}

/// Listing slice of the client state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobState {
    /// Current page only
    pub jobs: Vec<Job>,
    pub current_job: Option<Job>,
    pub loading: bool,
    pub error: Option<String>,
    pub filters: JobFilters,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobAction {
    SetFilters(FilterUpdate),
    ClearFilters,
    SetPage(u32),
    ClearCurrentJob,
    ClearError,
    FetchJobs(Lifecycle<JobPage>),
    FetchJobById(Lifecycle<Job>),
}

impl JobState {
    pub fn with_page_size(limit: u32) -> Self {
        let mut state = Self::default();
        if limit > 0 {
            state.pagination.limit = limit;
        }
        state
    }

    pub fn reduce(&mut self, action: JobAction) {
        match action {
            JobAction::SetFilters(update) => {
                self.filters.merge(update);
                self.pagination.page = 1;
            }
            JobAction::ClearFilters => {
                self.filters = JobFilters::default();
                self.pagination.page = 1;
            }
            // No bounds check: an out-of-range page fetches as empty
            JobAction::SetPage(page) => self.pagination.page = page,
            JobAction::ClearCurrentJob => self.current_job = None,
            JobAction::ClearError => self.error = None,
            JobAction::FetchJobs(step) => match step {
                Lifecycle::Pending => {
                    self.loading = true;
                    self.error = None;
                }
                Lifecycle::Fulfilled(page) => {
                    self.loading = false;
                    self.jobs = page.jobs;
                    self.pagination.total = page.total;
                    self.error = None;
                }
                Lifecycle::Rejected(message) => {
                    self.loading = false;
                    self.error = Some(message);
                }
            },
            JobAction::FetchJobById(step) => match step {
                Lifecycle::Pending => {
                    self.loading = true;
                    self.error = None;
                }
                Lifecycle::Fulfilled(job) => {
                    self.loading = false;
                    self.current_job = Some(job);
                    self.error = None;
                }
                Lifecycle::Rejected(message) => {
                    self.loading = false;
                    self.error = Some(message);
                }
            },
        }
    }
}

/// Job listing: filters, pagination and detail lookups
pub struct JobContainer {
    state: RwLock<JobState>,
    gateway: Arc<dyn Gateway>,
    forward_server_paging: bool,
}

impl JobContainer {
    pub fn new(gateway: Arc<dyn Gateway>, page_size: u32, forward_server_paging: bool) -> Self {
        Self {
            state: RwLock::new(JobState::with_page_size(page_size)),
            gateway,
            forward_server_paging,
        }
    }

    pub async fn state(&self) -> JobState {
        self.state.read().await.clone()
    }

    pub async fn dispatch(&self, action: JobAction) {
        self.state.write().await.reduce(action);
    }

    /// Merge `update` into the filters; always moves back to page 1
    pub async fn set_filters(&self, update: FilterUpdate) {
        self.dispatch(JobAction::SetFilters(update)).await;
    }

    pub async fn clear_filters(&self) {
        self.dispatch(JobAction::ClearFilters).await;
    }

    pub async fn set_page(&self, page: u32) {
        self.dispatch(JobAction::SetPage(page)).await;
    }

    pub async fn clear_current_job(&self) {
        self.dispatch(JobAction::ClearCurrentJob).await;
    }

    pub async fn clear_error(&self) {
        self.dispatch(JobAction::ClearError).await;
    }

    /// Fetch the catalog, then filter and paginate it locally.
    ///
    /// When server paging is forwarded the backend only returns one page, and
    /// the local filter and window are applied on top of that page.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_jobs(&self, query: JobQuery) -> Result<JobPage> {
        self.dispatch(JobAction::FetchJobs(Lifecycle::Pending)).await;

        let result = self.load_page(&query).await;
        match &result {
            Ok(page) => tracing::debug!(
                "Fetched {} of {} matching jobs",
                page.jobs.len(),
                page.total
            ),
            Err(e) => tracing::warn!("Failed to fetch jobs: {}", e),
        }

        self.dispatch(JobAction::FetchJobs(Lifecycle::from(&result))).await;
        result
    }

    async fn load_page(&self, query: &JobQuery) -> Result<JobPage> {
        let (server_page, server_limit) = if self.forward_server_paging {
            (
                query.page.filter(|p| *p > 0),
                query.limit.filter(|l| *l > 0),
            )
        } else {
            (None, None)
        };

        let corpus = self.gateway.fetch_jobs(server_page, server_limit).await?;
        let (jobs, total) = filter_and_paginate(
            corpus,
            &query.filters(),
            query.effective_page(),
            query.effective_limit(),
        );
        Ok(JobPage { jobs, total })
    }

    /// Re-fetch using the container's own filters and pagination
    pub async fn refresh(&self) -> Result<JobPage> {
        let query = {
            let state = self.state.read().await;
            JobQuery::from_state(&state.filters, &state.pagination)
        };
        self.fetch_jobs(query).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_job_by_id(&self, id: i64) -> Result<Job> {
        self.dispatch(JobAction::FetchJobById(Lifecycle::Pending)).await;

        let result = self.gateway.fetch_job_by_id(id).await;
        if let Err(e) = &result {
            tracing::warn!("Failed to fetch job {}: {}", id, e);
        }

        self.dispatch(JobAction::FetchJobById(Lifecycle::from(&result))).await;
        result
    }
}
