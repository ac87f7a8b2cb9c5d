use serde::Serialize;
use std::sync::Arc;

use crate::applications::{ApplicationContainer, ApplicationState};
use crate::auth::{AuthContainer, AuthState};
use crate::config::ClientConfig;
use crate::gateway::{Gateway, HttpGateway};
use crate::jobs::{JobContainer, JobState};
use crate::session::{FileStore, LocalSession, SessionRepository};

/// Snapshot of every container, e.g. for rendering or debugging
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootState {
    pub auth: AuthState,
    pub jobs: JobState,
    pub applications: ApplicationState,
}

/// Root aggregator. The containers are independent siblings; rules that span
/// them (only signed-in users apply) belong to the caller.
pub struct Store {
    pub auth: AuthContainer,
    pub jobs: JobContainer,
    pub applications: ApplicationContainer,
}

impl Store {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        session: Arc<dyn SessionRepository>,
        page_size: u32,
        forward_server_paging: bool,
    ) -> Self {
        Self {
            auth: AuthContainer::new(gateway.clone(), session),
            jobs: JobContainer::new(gateway.clone(), page_size, forward_server_paging),
            applications: ApplicationContainer::new(gateway),
        }
    }

    /// HTTP gateway against `config.base_url`; the session is file-backed when
    /// `session_dir` is set and detached otherwise.
    pub fn from_config(config: &ClientConfig) -> Self {
        let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::new(&config.base_url));
        let session = match &config.session_dir {
            Some(dir) => LocalSession::new(Arc::new(FileStore::new(dir))),
            None => LocalSession::detached(),
        };
        tracing::debug!(
            "Store for {} (session {})",
            config.base_url,
            if session.is_detached() { "detached" } else { "persisted" }
        );
        Self::new(
            gateway,
            Arc::new(session),
            config.page_size,
            config.forward_server_paging,
        )
    }

    pub async fn snapshot(&self) -> RootState {
        RootState {
            auth: self.auth.state().await,
            jobs: self.jobs.state().await,
            applications: self.applications.state().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_snapshot() {
        let config = ClientConfig {
            page_size: 4,
            ..Default::default()
        };
        let store = Store::from_config(&config);
        let state = store.snapshot().await;

        assert!(!state.auth.is_authenticated);
        assert_eq!(state.jobs.pagination.limit, 4);
        assert_eq!(state.jobs.pagination.page, 1);
        assert!(state.applications.applications.is_empty());

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["applications"]["submission_status"], "idle");
    }

    #[tokio::test]
    async fn test_detached_store_has_no_session_to_restore() {
        let store = Store::from_config(&ClientConfig::default());
        assert!(!store.auth.initialize_session().await);
        assert!(store.auth.state().await.user.is_none());
    }
}
