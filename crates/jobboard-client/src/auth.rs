use chrono::Utc;
use jobboard_common::{User, UserRecord};
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{BoardError, Result};
use crate::gateway::Gateway;
use crate::lifecycle::Lifecycle;
use crate::session::SessionRepository;

/// Authentication slice of the client state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Login(Lifecycle<User>),
    Register(Lifecycle<User>),
    Logout,
    ClearError,
    SetUser(User),
    /// Session restored from storage at startup
    Restore(User),
}

impl AuthState {
    pub fn reduce(&mut self, action: AuthAction) {
        match action {
            AuthAction::Login(step) | AuthAction::Register(step) => match step {
                Lifecycle::Pending => {
                    self.loading = true;
                    self.error = None;
                }
                Lifecycle::Fulfilled(user) => {
                    self.loading = false;
                    self.is_authenticated = true;
                    self.user = Some(user);
                    self.error = None;
                }
                Lifecycle::Rejected(message) => {
                    self.loading = false;
                    self.error = Some(message);
                    self.is_authenticated = false;
                    self.user = None;
                }
            },
            AuthAction::Logout => {
                self.is_authenticated = false;
                self.user = None;
                self.error = None;
            }
            AuthAction::ClearError => self.error = None,
            AuthAction::SetUser(user) | AuthAction::Restore(user) => {
                self.user = Some(user);
                self.is_authenticated = true;
            }
        }
    }
}

/// Timestamp-derived ids, strictly increasing within the process
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

/// Login, registration and session restoration.
///
/// The lock around the state is never held across a gateway call, so the
/// state stays readable while a request is outstanding.
pub struct AuthContainer {
    state: RwLock<AuthState>,
    gateway: Arc<dyn Gateway>,
    session: Arc<dyn SessionRepository>,
    ids: IdGenerator,
}

impl AuthContainer {
    pub fn new(gateway: Arc<dyn Gateway>, session: Arc<dyn SessionRepository>) -> Self {
        Self {
            state: RwLock::new(AuthState::default()),
            gateway,
            session,
            ids: IdGenerator::default(),
        }
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn dispatch(&self, action: AuthAction) {
        self.state.write().await.reduce(action);
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.dispatch(AuthAction::Login(Lifecycle::Pending)).await;

        let result = self.authenticate(email, password).await;
        match &result {
            Ok(user) => {
                self.session.save(user);
                tracing::info!("User {} logged in", user.email);
            }
            Err(e) => tracing::warn!("Login failed for {}: {}", email, e),
        }

        self.dispatch(AuthAction::Login(Lifecycle::from(&result))).await;
        result
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let users = self.gateway.fetch_users().await?;
        users
            .into_iter()
            .find(|record| record.credentials_match(email, password))
            .map(UserRecord::into_user)
            .ok_or(BoardError::InvalidCredentials)
    }

    #[tracing::instrument(skip(self, password, confirm_password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User> {
        self.dispatch(AuthAction::Register(Lifecycle::Pending)).await;

        let result = self
            .create_account(name, email, password, confirm_password)
            .await;
        match &result {
            Ok(user) => {
                self.session.save(user);
                tracing::info!("Registered user {} ({})", user.email, user.id);
            }
            Err(e) => tracing::warn!("Registration failed for {}: {}", email, e),
        }

        self.dispatch(AuthAction::Register(Lifecycle::from(&result))).await;
        result
    }

    async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User> {
        if password != confirm_password {
            return Err(BoardError::PasswordMismatch);
        }

        let existing = self.gateway.fetch_users().await?;
        if existing.iter().any(|u| u.email == email) {
            return Err(BoardError::DuplicateEmail);
        }

        let record = UserRecord {
            id: self.ids.next_id(),
            email: email.to_string(),
            name: name.to_string(),
            password: Some(password.to_string()),
        };
        let created = self.gateway.create_user(&record).await?;
        Ok(created.into_user())
    }

    pub async fn logout(&self) {
        self.dispatch(AuthAction::Logout).await;
        self.session.clear();
        tracing::info!("Logged out");
    }

    /// Restore a persisted session. The stored user is trusted as is; nothing
    /// is checked against the backend.
    pub async fn initialize_session(&self) -> bool {
        match self.session.load() {
            Some((user, true)) => {
                tracing::debug!("Restored session for {}", user.email);
                self.dispatch(AuthAction::Restore(user)).await;
                true
            }
            _ => false,
        }
    }

    pub async fn clear_error(&self) {
        self.dispatch(AuthAction::ClearError).await;
    }

    pub async fn set_user(&self, user: User) {
        self.dispatch(AuthAction::SetUser(user)).await;
    }
}
