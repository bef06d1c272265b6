//! Configuration types for cinesphere

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};
use utoipa::ToSchema;

/// Microsoft Graph access (app registration, drive owner, library root)
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct GraphConfig {
    /// Azure AD tenant ID
    #[serde(default)]
    pub tenant_id: String,

    /// App registration client ID
    #[serde(default)]
    pub client_id: String,

    /// App registration client secret
    #[serde(default, skip_serializing)]
    pub client_secret: String,

    /// User whose OneDrive holds the library (UPN or object ID)
    #[serde(default)]
    pub user: String,

    /// Library root folder inside the drive (e.g. "MyStreamingLibrary")
    #[serde(default)]
    pub root_folder: String,

    /// Graph API base URL (default: "https://graph.microsoft.com/v1.0")
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,

    /// Identity platform base URL (default: "https://login.microsoftonline.com")
    #[serde(default = "default_login_base_url")]
    pub login_base_url: String,

    /// Timeout for a single Graph metadata request (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            user: String::new(),
            root_folder: String::new(),
            graph_base_url: default_graph_base_url(),
            login_base_url: default_login_base_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

// Hand-written so the client secret never reaches a log line.
impl std::fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user", &self.user)
            .field("root_folder", &self.root_folder)
            .field("graph_base_url", &self.graph_base_url)
            .field("login_base_url", &self.login_base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 0.0.0.0:4000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Serve Swagger UI at /api/swagger-ui (default: false)
    #[serde(default)]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: false,
        }
    }
}

/// Library listing behaviour
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LibraryConfig {
    /// Maximum folder-cover lookups in flight per browse request (default: 4)
    #[serde(default = "default_cover_concurrency")]
    pub cover_concurrency: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            cover_concurrency: default_cover_concurrency(),
        }
    }
}

/// Compression method for archive entries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveCompression {
    /// Store entries as-is (videos are already compressed)
    #[default]
    Stored,
    /// Deflate entries
    Deflate,
}

impl std::str::FromStr for ArchiveCompression {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stored" | "store" | "none" => Ok(ArchiveCompression::Stored),
            "deflate" | "deflated" => Ok(ArchiveCompression::Deflate),
            other => Err(format!("unknown compression {other:?} (expected stored or deflate)")),
        }
    }
}

/// Zip download configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ArchiveConfig {
    /// Entry compression (default: stored)
    #[serde(default)]
    pub compression: ArchiveCompression,

    /// Size of the in-memory pipe between archive writer and HTTP body (default: 256 KiB)
    #[serde(default = "default_pipe_buffer_bytes")]
    pub pipe_buffer_bytes: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            compression: ArchiveCompression::default(),
            pipe_buffer_bytes: default_pipe_buffer_bytes(),
        }
    }
}

/// Retry configuration for transient Graph failures
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 10 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// Main configuration for the cinesphere service
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Microsoft Graph access
    #[serde(default)]
    pub graph: GraphConfig,

    /// HTTP API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Library listing settings
    #[serde(default)]
    pub library: LibraryConfig,

    /// Zip download settings
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Retry policy for Graph calls
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Config {
    /// Build a configuration from environment variables.
    ///
    /// Recognised keys: `GRAPH_TENANT_ID`, `GRAPH_CLIENT_ID`, `GRAPH_CLIENT_SECRET`,
    /// `GRAPH_USER`, `GRAPH_FOLDER_PATH`, `PORT`, `GRAPH_BASE_URL`,
    /// `GRAPH_LOGIN_URL`, `GRAPH_REQUEST_TIMEOUT_SECS`, `GRAPH_MAX_RETRIES`,
    /// `CORS_ORIGINS`, `COVER_CONCURRENCY`, `ARCHIVE_COMPRESSION`,
    /// `ARCHIVE_PIPE_BUFFER_BYTES`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset. The result is not validated; call
    /// [`Config::validate`] before serving.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config::default();

        if let Some(v) = get("GRAPH_TENANT_ID") {
            config.graph.tenant_id = v;
        }
        if let Some(v) = get("GRAPH_CLIENT_ID") {
            config.graph.client_id = v;
        }
        if let Some(v) = get("GRAPH_CLIENT_SECRET") {
            config.graph.client_secret = v;
        }
        if let Some(v) = get("GRAPH_USER") {
            config.graph.user = v;
        }
        if let Some(v) = get("GRAPH_FOLDER_PATH") {
            config.graph.root_folder = v.trim_matches('/').to_string();
        }
        if let Some(v) = get("GRAPH_BASE_URL") {
            config.graph.graph_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("GRAPH_LOGIN_URL") {
            config.graph.login_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("GRAPH_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = parse_key("GRAPH_REQUEST_TIMEOUT_SECS", &v)?;
            config.graph.request_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get("GRAPH_MAX_RETRIES") {
            config.retry.max_attempts = parse_key("GRAPH_MAX_RETRIES", &v)?;
        }
        if let Some(v) = get("PORT") {
            let port: u16 = parse_key("PORT", &v)?;
            config.api.bind_address.set_port(port);
        }
        if let Some(v) = get("CORS_ORIGINS") {
            config.api.cors_origins = v
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = get("COVER_CONCURRENCY") {
            config.library.cover_concurrency = parse_key("COVER_CONCURRENCY", &v)?;
        }
        if let Some(v) = get("ARCHIVE_COMPRESSION") {
            config.archive.compression = parse_key("ARCHIVE_COMPRESSION", &v)?;
        }
        if let Some(v) = get("ARCHIVE_PIPE_BUFFER_BYTES") {
            config.archive.pipe_buffer_bytes = parse_key("ARCHIVE_PIPE_BUFFER_BYTES", &v)?;
        }

        Ok(config)
    }

    /// Check that every setting needed to talk to Graph is present
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("GRAPH_TENANT_ID", &self.graph.tenant_id),
            ("GRAPH_CLIENT_ID", &self.graph.client_id),
            ("GRAPH_CLIENT_SECRET", &self.graph.client_secret),
            ("GRAPH_USER", &self.graph.user),
            ("GRAPH_FOLDER_PATH", &self.graph.root_folder),
        ];

        for (key, value) in required {
            if value.is_empty() {
                return Err(Error::config(key, format!("{key} is not set")));
            }
        }

        if self.library.cover_concurrency == 0 {
            return Err(Error::config(
                "COVER_CONCURRENCY",
                "COVER_CONCURRENCY must be at least 1",
            ));
        }
        if self.archive.pipe_buffer_bytes == 0 {
            return Err(Error::config(
                "ARCHIVE_PIPE_BUFFER_BYTES",
                "ARCHIVE_PIPE_BUFFER_BYTES must be at least 1",
            ));
        }

        Ok(())
    }
}

fn parse_key<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| Error::config(key, format!("invalid value {value:?} for {key}: {e}")))
}

fn default_true() -> bool {
    true
}

fn default_graph_base_url() -> String {
    "https://graph.microsoft.com/v1.0".into()
}

fn default_login_base_url() -> String {
    "https://login.microsoftonline.com".into()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 4000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_cover_concurrency() -> usize {
    4
}

fn default_pipe_buffer_bytes() -> usize {
    256 * 1024
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(10)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
