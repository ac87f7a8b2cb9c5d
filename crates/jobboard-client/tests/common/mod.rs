#![allow(dead_code)]

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use jobboard_common::{Job, JobApplication, JobType, UserRecord};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

// ─── Fake json-server style backend ─────────────────────────────────────

#[derive(Default)]
pub struct Backend {
    pub users: Mutex<Vec<UserRecord>>,
    pub jobs: Mutex<Vec<Job>>,
    pub applications: Mutex<Vec<JobApplication>>,
    pub user_list_requests: AtomicUsize,
    pub user_create_requests: AtomicUsize,
    /// Raw query string of the most recent `GET /jobs`
    pub last_jobs_query: Mutex<Option<String>>,
    /// Answer every request with 500
    pub failing: AtomicBool,
}

impl Backend {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn is_failing(&self) -> bool {
        self.failing.load(Ordering::SeqCst)
    }
}

pub struct TestServer {
    pub base_url: String,
    pub backend: Arc<Backend>,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "backend unavailable"})),
    )
        .into_response()
}

async fn list_users(State(backend): State<Arc<Backend>>) -> Response {
    backend.user_list_requests.fetch_add(1, Ordering::SeqCst);
    if backend.is_failing() {
        return server_error();
    }
    let users = backend.users.lock().unwrap().clone();
    Json(users).into_response()
}

async fn create_user(
    State(backend): State<Arc<Backend>>,
    Json(record): Json<UserRecord>,
) -> Response {
    backend.user_create_requests.fetch_add(1, Ordering::SeqCst);
    if backend.is_failing() {
        return server_error();
    }
    backend.users.lock().unwrap().push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

#[derive(Debug, Deserialize)]
struct JobsQuery {
    #[serde(rename = "_page")]
    page: Option<usize>,
    #[serde(rename = "_limit")]
    limit: Option<usize>,
}

async fn list_jobs(
    State(backend): State<Arc<Backend>>,
    axum::extract::RawQuery(raw): axum::extract::RawQuery,
    Query(query): Query<JobsQuery>,
) -> Response {
    *backend.last_jobs_query.lock().unwrap() = raw;
    if backend.is_failing() {
        return server_error();
    }
    let jobs = backend.jobs.lock().unwrap().clone();
    let jobs: Vec<Job> = match query.limit {
        Some(limit) => {
            let page = query.page.unwrap_or(1).max(1);
            jobs.into_iter().skip((page - 1) * limit).take(limit).collect()
        }
        None => jobs,
    };
    Json(jobs).into_response()
}

async fn get_job(State(backend): State<Arc<Backend>>, Path(id): Path<i64>) -> Response {
    if backend.is_failing() {
        return server_error();
    }
    let jobs = backend.jobs.lock().unwrap();
    match jobs.iter().find(|j| j.id == id) {
        Some(job) => Json(job.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationsQuery {
    applicant_email: Option<String>,
    job_id: Option<i64>,
}

async fn list_applications(
    State(backend): State<Arc<Backend>>,
    Query(query): Query<ApplicationsQuery>,
) -> Response {
    if backend.is_failing() {
        return server_error();
    }
    let applications: Vec<JobApplication> = backend
        .applications
        .lock()
        .unwrap()
        .iter()
        .filter(|a| {
            query
                .applicant_email
                .as_ref()
                .map_or(true, |e| &a.applicant_email == e)
                && query.job_id.map_or(true, |id| a.job_id == id)
        })
        .cloned()
        .collect();
    Json(applications).into_response()
}

async fn create_application(
    State(backend): State<Arc<Backend>>,
    Json(mut application): Json<JobApplication>,
) -> Response {
    if backend.is_failing() {
        return server_error();
    }
    let mut applications = backend.applications.lock().unwrap();
    application.id = Some(applications.len() as i64 + 1);
    applications.push(application.clone());
    (StatusCode::CREATED, Json(application)).into_response()
}

/// Start a fake backend on an ephemeral port
pub async fn spawn_backend(backend: Backend) -> Result<TestServer> {
    let backend = Arc::new(backend);
    let router = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/jobs", get(list_jobs))
        .route("/jobs/{id}", get(get_job))
        .route(
            "/applications",
            get(list_applications).post(create_application),
        )
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", addr.port()),
        backend,
        handle,
    })
}

// ─── Fixtures ───────────────────────────────────────────────────────────

pub fn user_record(id: i64, email: &str, password: &str) -> UserRecord {
    UserRecord {
        id,
        email: email.to_string(),
        name: format!("User {}", id),
        password: Some(password.to_string()),
    }
}

pub fn job(id: i64, title: &str, location: &str, job_type: JobType) -> Job {
    Job {
        id,
        title: title.to_string(),
        company: format!("Company {}", id),
        location: location.to_string(),
        job_type,
        salary: "$90k - $120k".to_string(),
        description: format!("Join us as {}", title),
        requirements: vec!["Communication".to_string()],
        posted_date: "2024-01-15".to_string(),
    }
}

/// Eight postings, three of which mention "engineer"
pub fn job_corpus() -> Vec<Job> {
    vec![
        job(1, "Frontend Engineer", "Berlin", JobType::FullTime),
        job(2, "Product Designer", "Oslo", JobType::PartTime),
        job(3, "Account Manager", "London", JobType::FullTime),
        job(4, "Data Engineer", "Remote", JobType::Remote),
        job(5, "Recruiter", "Berlin", JobType::Contract),
        job(6, "Support Specialist", "Paris", JobType::FullTime),
        job(7, "Site Reliability Engineer", "Oslo", JobType::Contract),
        job(8, "Copywriter", "Madrid", JobType::PartTime),
    ]
}

pub fn seeded_backend() -> Backend {
    let backend = Backend::default();
    *backend.users.lock().unwrap() = vec![
        user_record(1, "ada@example.com", "lovelace"),
        user_record(2, "grace@example.com", "hopper"),
    ];
    *backend.jobs.lock().unwrap() = job_corpus();
    backend
}
