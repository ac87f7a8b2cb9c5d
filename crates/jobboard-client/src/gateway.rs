use async_trait::async_trait;
use jobboard_common::{ApplicationDraft, Job, JobApplication, UserRecord};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::error::{BoardError, Result};

/// Outbound calls to the job board backend.
///
/// Every call is a fresh round-trip: no retries, no caching. Failures come
/// back as [`BoardError::Transport`] carrying a human-readable message, except
/// for job lookups which report [`BoardError::NotFound`] on a 404.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Full user directory, credentials included
    async fn fetch_users(&self) -> Result<Vec<UserRecord>>;

    async fn create_user(&self, record: &UserRecord) -> Result<UserRecord>;

    /// Job catalog, optionally server-paged
    async fn fetch_jobs(&self, page: Option<u32>, limit: Option<u32>) -> Result<Vec<Job>>;

    async fn fetch_job_by_id(&self, id: i64) -> Result<Job>;

    /// Persist an application. The gateway stamps `appliedDate`; the backend
    /// assigns `id`.
    async fn create_application(&self, draft: &ApplicationDraft) -> Result<JobApplication>;

    async fn fetch_applications_by_applicant(&self, email: &str) -> Result<Vec<JobApplication>>;

    /// Whether `email` already has an application on file for `job_id`
    async fn has_applied(&self, job_id: i64, email: &str) -> Result<bool>;
}

/// HTTP client for a json-server style REST backend
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Arc<str>,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fail with `message` on a non-success status, otherwise decode the body
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        message: &str,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read body".to_string());
            tracing::warn!("{} with status {}: {}", message, status, body);
            return Err(BoardError::Transport(message.to_string()));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::warn!("{}: undecodable response: {}", message, e);
            BoardError::Transport(format!("{}: {}", message, e))
        })
    }

    async fn send(request: reqwest::RequestBuilder, message: &str) -> Result<reqwest::Response> {
        request.send().await.map_err(|e| {
            tracing::warn!("{}: {}", message, e);
            BoardError::Transport(format!("{}: {}", message, e))
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    #[tracing::instrument(skip(self))]
    async fn fetch_users(&self) -> Result<Vec<UserRecord>> {
        let url = format!("{}/users", self.base_url);
        let response = Self::send(self.client.get(&url), "Network error").await?;
        Self::read_json(response, "Network error").await
    }

    #[tracing::instrument(skip(self, record), fields(email = %record.email))]
    async fn create_user(&self, record: &UserRecord) -> Result<UserRecord> {
        let url = format!("{}/users", self.base_url);
        let response =
            Self::send(self.client.post(&url).json(record), "Registration failed").await?;
        Self::read_json(response, "Registration failed").await
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_jobs(&self, page: Option<u32>, limit: Option<u32>) -> Result<Vec<Job>> {
        let url = format!("{}/jobs", self.base_url);
        let mut params: Vec<(&str, u32)> = Vec::new();
        if let Some(page) = page {
            params.push(("_page", page));
        }
        if let Some(limit) = limit {
            params.push(("_limit", limit));
        }

        let mut request = self.client.get(&url);
        if !params.is_empty() {
            request = request.query(&params);
        }

        let response = Self::send(request, "Failed to fetch jobs").await?;
        Self::read_json(response, "Failed to fetch jobs").await
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_job_by_id(&self, id: i64) -> Result<Job> {
        let url = format!("{}/jobs/{}", self.base_url, id);
        let response = Self::send(self.client.get(&url), "Failed to fetch job details").await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(BoardError::NotFound);
        }
        Self::read_json(response, "Failed to fetch job details").await
    }

    #[tracing::instrument(skip(self, draft), fields(job_id = draft.job_id))]
    async fn create_application(&self, draft: &ApplicationDraft) -> Result<JobApplication> {
        let url = format!("{}/applications", self.base_url);
        let outgoing = draft.clone().stamped(chrono::Utc::now().to_rfc3339());

        let response = Self::send(
            self.client.post(&url).json(&outgoing),
            "Failed to submit application",
        )
        .await?;
        Self::read_json(response, "Failed to submit application").await
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_applications_by_applicant(&self, email: &str) -> Result<Vec<JobApplication>> {
        let url = format!("{}/applications", self.base_url);
        let response = Self::send(
            self.client.get(&url).query(&[("applicantEmail", email)]),
            "Failed to fetch applications",
        )
        .await?;
        Self::read_json(response, "Failed to fetch applications").await
    }

    #[tracing::instrument(skip(self))]
    async fn has_applied(&self, job_id: i64, email: &str) -> Result<bool> {
        let url = format!("{}/applications", self.base_url);
        let job_id = job_id.to_string();
        let response = Self::send(
            self.client
                .get(&url)
                .query(&[("jobId", job_id.as_str()), ("applicantEmail", email)]),
            "Failed to check application status",
        )
        .await?;
        let applications: Vec<JobApplication> =
            Self::read_json(response, "Failed to check application status").await?;
        Ok(!applications.is_empty())
    }
}
