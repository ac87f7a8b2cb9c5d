use jobboard_common::{ApplicationDraft, JobApplication};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::gateway::Gateway;
use crate::lifecycle::Lifecycle;

/// Status of the current submission attempt (one form open at a time)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Application slice of the client state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationState {
    pub applications: Vec<JobApplication>,
    pub loading: bool,
    pub error: Option<String>,
    pub submission_status: SubmissionStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationAction {
    Submit(Lifecycle<JobApplication>),
    FetchForApplicant(Lifecycle<Vec<JobApplication>>),
    ResetSubmissionStatus,
    ClearError,
    ClearApplications,
}

impl ApplicationState {
    pub fn reduce(&mut self, action: ApplicationAction) {
        match action {
            ApplicationAction::Submit(step) => match step {
                Lifecycle::Pending => {
                    self.submission_status = SubmissionStatus::Loading;
                    self.error = None;
                }
                Lifecycle::Fulfilled(application) => {
                    self.submission_status = SubmissionStatus::Success;
                    self.applications.push(application);
                    self.error = None;
                }
                Lifecycle::Rejected(message) => {
                    self.submission_status = SubmissionStatus::Error;
                    self.error = Some(message);
                }
            },
            ApplicationAction::FetchForApplicant(step) => match step {
                Lifecycle::Pending => {
                    self.loading = true;
                    self.error = None;
                }
                Lifecycle::Fulfilled(applications) => {
                    self.loading = false;
                    self.applications = applications;
                    self.error = None;
                }
                Lifecycle::Rejected(message) => {
                    self.loading = false;
                    self.error = Some(message);
                }
            },
            ApplicationAction::ResetSubmissionStatus => {
                self.submission_status = SubmissionStatus::Idle;
                self.error = None;
            }
            ApplicationAction::ClearError => self.error = None,
            ApplicationAction::ClearApplications => self.applications.clear(),
        }
    }
}

/// Application submission and the applicant's history
pub struct ApplicationContainer {
    state: RwLock<ApplicationState>,
    gateway: Arc<dyn Gateway>,
}

impl ApplicationContainer {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            state: RwLock::new(ApplicationState::default()),
            gateway,
        }
    }

    pub async fn state(&self) -> ApplicationState {
        self.state.read().await.clone()
    }

    pub async fn dispatch(&self, action: ApplicationAction) {
        self.state.write().await.reduce(action);
    }

    /// Submit a draft. Concurrent submissions share one status: last write wins.
    #[tracing::instrument(skip(self, draft), fields(job_id = draft.job_id))]
    pub async fn submit(&self, draft: ApplicationDraft) -> Result<JobApplication> {
        self.dispatch(ApplicationAction::Submit(Lifecycle::Pending)).await;

        let result = self.gateway.create_application(&draft).await;
        match &result {
            Ok(app) => tracing::info!(
                "Application {:?} submitted for job {}",
                app.id,
                app.job_id
            ),
            Err(e) => tracing::warn!("Failed to submit application: {}", e),
        }

        self.dispatch(ApplicationAction::Submit(Lifecycle::from(&result))).await;
        result
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_for_applicant(&self, email: &str) -> Result<Vec<JobApplication>> {
        let pending = ApplicationAction::FetchForApplicant(Lifecycle::Pending);
        self.dispatch(pending).await;

        let result = self.gateway.fetch_applications_by_applicant(email).await;
        if let Err(e) = &result {
            tracing::warn!("Failed to fetch applications for {}: {}", email, e);
        }

        let step = Lifecycle::from(&result);
        self.dispatch(ApplicationAction::FetchForApplicant(step)).await;
        result
    }

    /// Whether `email` already applied to `job_id`. A failed check reads as
    /// "not applied" and leaves the state untouched.
    pub async fn has_applied(&self, job_id: i64, email: &str) -> bool {
        match self.gateway.has_applied(job_id, email).await {
            Ok(applied) => applied,
            Err(e) => {
                tracing::debug!("Application check failed: {}", e);
                false
            }
        }
    }

    pub async fn reset_submission_status(&self) {
        self.dispatch(ApplicationAction::ResetSubmissionStatus).await;
    }

    pub async fn clear_error(&self) {
        self.dispatch(ApplicationAction::ClearError).await;
    }

    pub async fn clear_applications(&self) {
        self.dispatch(ApplicationAction::ClearApplications).await;
    }
}
