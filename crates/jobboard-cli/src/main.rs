use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jobboard_client::{load_config, ClientConfig, Store};
use jobboard_common::{ApplicationDraft, FilterUpdate, Job, JobQuery, JobType, Pagination};

#[derive(Parser)]
#[command(name = "jobboard", version, about = "Job board CLI - browse and apply")]
struct Cli {
    /// Backend URL (overrides the config file)
    #[arg(long, env = "JOBBOARD_URL")]
    server: Option<String>,

    /// Path to a YAML config file
    #[arg(long, env = "JOBBOARD_CONFIG")]
    config: Option<String>,

    /// Directory holding the persisted session
    #[arg(long, env = "JOBBOARD_SESSION_DIR")]
    session_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        email: String,
        #[arg(long, env = "JOBBOARD_PASSWORD")]
        password: String,
    },
    /// Create an account and sign in
    Register {
        name: String,
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List job postings
    Jobs {
        /// Match title, company, location or description
        #[arg(long)]
        search: Option<String>,
        /// Full-time, Part-time, Contract or Remote
        #[arg(long = "type")]
        job_type: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, default_value = "1")]
        page: u32,
        /// Page size (defaults to the configured one)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one job posting
    Job {
        id: i64,
    },
    /// Apply to a job as the signed-in user
    Apply {
        job_id: i64,
        #[arg(long)]
        resume: String,
        #[arg(long)]
        cover_letter: String,
        /// Defaults to the signed-in user's name
        #[arg(long)]
        name: Option<String>,
        /// Defaults to the signed-in user's email
        #[arg(long)]
        email: Option<String>,
    },
    /// List the signed-in user's applications
    Applications,
    /// Dump the whole client state as JSON
    State,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    tracing::debug!("Using backend {}", config.base_url);

    let store = Store::from_config(&config);
    store.auth.initialize_session().await;

    match cli.command {
        Commands::Login { email, password } => cmd_login(&store, &email, &password).await?,
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
        } => cmd_register(&store, &name, &email, &password, &confirm_password).await?,
        Commands::Logout => {
            store.auth.logout().await;
            println!("Logged out.");
        }
        Commands::Whoami => cmd_whoami(&store).await,
        Commands::Jobs {
            search,
            job_type,
            location,
            page,
            limit,
        } => {
            let filters = FilterUpdate {
                search,
                job_type,
                location,
            };
            cmd_jobs(&store, filters, page, limit).await?;
        }
        Commands::Job { id } => cmd_job(&store, id).await?,
        Commands::Apply {
            job_id,
            resume,
            cover_letter,
            name,
            email,
        } => cmd_apply(&store, job_id, resume, cover_letter, name, email).await?,
        Commands::Applications => cmd_applications(&store).await?,
        Commands::State => {
            let snapshot = store.snapshot().await;
            let json = serde_json::to_string_pretty(&snapshot).context("Failed to render state")?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Config file and env first, then explicit flags. Without any session
/// directory the session lives under `$HOME/.jobboard`.
fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(server) = &cli.server {
        config.base_url = server.clone();
    }
    if let Some(dir) = &cli.session_dir {
        config.session_dir = Some(dir.clone());
    }
    if config.session_dir.is_none() {
        if let Ok(home) = std::env::var("HOME") {
            config.session_dir = Some(format!("{}/.jobboard", home));
        }
    }
    Ok(config)
}

async fn cmd_login(store: &Store, email: &str, password: &str) -> Result<()> {
    let user = store.auth.login(email, password).await?;
    println!("Logged in as {} <{}>", user.name, user.email);
    Ok(())
}

async fn cmd_register(
    store: &Store,
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<()> {
    let user = store
        .auth
        .register(name, email, password, confirm_password)
        .await?;
    println!("Registered {} <{}> (id {})", user.name, user.email, user.id);
    Ok(())
}

async fn cmd_whoami(store: &Store) {
    match store.auth.state().await.user {
        Some(user) => println!("{} <{}> (id {})", user.name, user.email, user.id),
        None => println!("Not logged in."),
    }
}

async fn cmd_jobs(
    store: &Store,
    filters: FilterUpdate,
    page: u32,
    limit: Option<u32>,
) -> Result<()> {
    if let Some(job_type) = filters.job_type.as_deref() {
        if !job_type.is_empty() && !JobType::ALL.iter().any(|t| t.as_str() == job_type) {
            anyhow::bail!(
                "Unknown job type '{}' (expected one of: {})",
                job_type,
                JobType::ALL.map(|t| t.as_str()).join(", ")
            );
        }
    }

    store.jobs.set_filters(filters).await;
    store.jobs.set_page(page).await;

    let state = store.jobs.state().await;
    let mut pagination = state.pagination;
    if let Some(limit) = limit.filter(|l| *l > 0) {
        pagination.limit = limit;
    }
    let listing = store
        .jobs
        .fetch_jobs(JobQuery::from_state(&state.filters, &pagination))
        .await?;
    pagination.total = listing.total;

    if listing.jobs.is_empty() {
        println!("No jobs found.");
    } else {
        println!(
            "{:6} {:32} {:20} {:16} {:10} SALARY",
            "ID", "TITLE", "COMPANY", "LOCATION", "TYPE"
        );
        println!("{}", "-".repeat(100));
        for job in &listing.jobs {
            println!(
                "{:6} {:32} {:20} {:16} {:10} {}",
                job.id,
                job.title,
                job.company,
                job.location,
                job.job_type.as_str(),
                job.salary
            );
        }
    }

    println!(
        "\nPage {} of {} ({} matching)",
        pagination.page,
        pagination.total_pages().max(1),
        listing.total
    );
    if let Some(hint) = page_hint(&pagination) {
        println!("{}", hint);
    }
    Ok(())
}

/// Navigation hint under a listing, `None` when everything fits on one page
fn page_hint(pagination: &Pagination) -> Option<String> {
    let mut hints = Vec::new();
    if pagination.has_previous_page() {
        hints.push(format!("previous: --page {}", pagination.page - 1));
    }
    if pagination.has_next_page() {
        hints.push(format!("next: --page {}", pagination.page + 1));
    }
    if hints.is_empty() {
        None
    } else {
        Some(hints.join("  "))
    }
}

fn print_job(job: &Job) {
    println!("Job:      {}", job.id);
    println!("Title:    {}", job.title);
    println!("Company:  {}", job.company);
    println!("Location: {}", job.location);
    println!("Type:     {}", job.job_type);
    println!("Salary:   {}", job.salary);
    println!("Posted:   {}", job.posted_date);
    println!("\n{}", job.description);

    if !job.requirements.is_empty() {
        println!("\nRequirements:");
        for requirement in &job.requirements {
            println!("  - {}", requirement);
        }
    }
}

async fn cmd_job(store: &Store, id: i64) -> Result<()> {
    let job = store.jobs.fetch_job_by_id(id).await?;
    print_job(&job);

    if let Some(user) = store.auth.state().await.user {
        if store.applications.has_applied(job.id, &user.email).await {
            println!("\nYou have already applied to this job.");
        }
    }
    Ok(())
}

async fn cmd_apply(
    store: &Store,
    job_id: i64,
    resume: String,
    cover_letter: String,
    name: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let user = store
        .auth
        .state()
        .await
        .user
        .context("Log in to apply for jobs")?;

    let draft = ApplicationDraft {
        job_id,
        applicant_name: name.unwrap_or_else(|| user.name.clone()),
        applicant_email: email.unwrap_or_else(|| user.email.clone()),
        resume,
        cover_letter,
    };

    // Confirms the posting exists before anything is written
    let job = store.jobs.fetch_job_by_id(job_id).await?;
    if store
        .applications
        .has_applied(job_id, &draft.applicant_email)
        .await
    {
        anyhow::bail!("Already applied to '{}' at {}", job.title, job.company);
    }

    let application = store.applications.submit(draft).await?;
    println!(
        "Application {} submitted for '{}' at {}",
        application
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string()),
        job.title,
        job.company
    );
    Ok(())
}

async fn cmd_applications(store: &Store) -> Result<()> {
    let user = store
        .auth
        .state()
        .await
        .user
        .context("Log in to see your applications")?;
    let applications = store.applications.fetch_for_applicant(&user.email).await?;

    if applications.is_empty() {
        println!("No applications yet.");
        return Ok(());
    }

    println!("{:6} {:8} APPLIED", "ID", "JOB");
    println!("{}", "-".repeat(45));
    for application in &applications {
        let id = application
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let applied = application.applied_date.as_deref().unwrap_or("-");
        println!("{:6} {:8} {}", id, application.job_id, applied);
    }
    Ok(())
}
