pub mod applications;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod jobs;
pub mod lifecycle;
pub mod session;
pub mod store;

pub use applications::{
    ApplicationAction, ApplicationContainer, ApplicationState, SubmissionStatus,
};
pub use auth::{AuthAction, AuthContainer, AuthState};
pub use config::{load_config, ClientConfig};
pub use error::{BoardError, Result};
pub use gateway::{Gateway, HttpGateway};
pub use jobs::{JobAction, JobContainer, JobPage, JobState};
pub use lifecycle::Lifecycle;
pub use session::{FileStore, KeyValueStore, LocalSession, MemoryStore, SessionRepository};
pub use store::{RootState, Store};
