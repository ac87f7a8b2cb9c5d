pub mod filter;
pub mod models;

pub use filter::{filter_and_paginate, matches_filters, DEFAULT_PAGE_SIZE};
pub use models::application::{ApplicationDraft, JobApplication};
pub use models::auth::{User, UserRecord};
pub use models::job::{FilterUpdate, Job, JobFilters, JobQuery, JobType, Pagination};
