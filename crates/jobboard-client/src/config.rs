use anyhow::Context;
use jobboard_common::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};

/// Client configuration - loaded from an optional YAML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL; a trailing slash is dropped by the gateway
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Postings per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Directory backing the persisted session; no session persistence when unset
    #[serde(default)]
    pub session_dir: Option<String>,
    /// Send `_page`/`_limit` to the backend before paginating locally.
    /// Keeps the listing identical to the web client; turn off to page over
    /// the whole corpus instead.
    #[serde(default = "default_forward_server_paging")]
    pub forward_server_paging: bool,
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_forward_server_paging() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            session_dir: None,
            forward_server_paging: default_forward_server_paging(),
        }
    }
}

/// Load client config from an optional YAML file with JOBBOARD__ env var overrides.
pub fn load_config(path: Option<&str>) -> anyhow::Result<ClientConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::new(path, config::FileFormat::Yaml));
    }
    let source = path.unwrap_or("<environment>");
    let config: ClientConfig = builder
        .add_source(
            config::Environment::with_prefix("JOBBOARD")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Failed to build config from: {}", source))?
        .try_deserialize()
        .with_context(|| format!("Failed to deserialize config from: {}", source))?;

    if config.page_size == 0 {
        anyhow::bail!("page_size must be greater than zero");
    }
    Ok(config)
}
