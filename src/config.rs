use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default Storage Brain endpoint.
pub const DEFAULT_STORAGE_URL: &str = "https://storage-brain-api.marlin-pohl.workers.dev";

/// Default htmx bundle. Point `server.htmx_url` at a self-hosted copy
/// (e.g. `/static/vendor/htmx.min.js`) to serve it locally.
pub const DEFAULT_HTMX_URL: &str = "https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js";

/// Config file picked up from the working directory when `--config` is absent.
const CWD_CONFIG_FILE: &str = "config.yaml";

/// Prefix for layered environment overrides, e.g. `RECEIPT_OCR_SERVER__PORT`.
const ENV_PREFIX: &str = "RECEIPT_OCR";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory served under /static
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<String>,

    /// Storage Brain API key
    #[arg(long, env = "STORAGE_BRAIN_API_KEY", hide_env_values = true)]
    pub storage_api_key: Option<String>,

    /// Storage Brain base URL
    #[arg(long, env = "STORAGE_BRAIN_URL")]
    pub storage_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    /// Transport limit on request bodies; uploads are otherwise not validated.
    pub max_body_bytes: usize,
    /// Script URL of the htmx bundle loaded by every page.
    #[serde(default = "default_htmx_url")]
    pub htmx_url: String,
}

#[derive(Deserialize, Clone)]
pub struct StorageConfig {
    /// Required by the client factory; its absence is fatal at startup.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_storage_url")]
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_storage_url(),
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Workspaces idle longer than this are dropped.
    pub idle_timeout_secs: u64,
    /// How often the idle sweep runs.
    pub sweep_interval_secs: u64,
}

fn default_storage_url() -> String {
    DEFAULT_STORAGE_URL.to_string()
}

fn default_htmx_url() -> String {
    DEFAULT_HTMX_URL.to_string()
}

impl AppConfig {
    /// Load from the process arguments; `--help` and argument errors exit
    /// the process the way clap does.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_cli(Cli::parse())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(cli)
    }

    pub fn from_cli(cli: Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.static_dir", "static")?
            .set_default("server.max_body_bytes", 100 * 1024 * 1024)?
            .set_default("server.htmx_url", DEFAULT_HTMX_URL)?
            .set_default("storage.base_url", DEFAULT_STORAGE_URL)?
            .set_default("session.idle_timeout_secs", 30 * 60)?
            .set_default("session.sweep_interval_secs", 60)?;

        // 2. Config file: explicit path must exist, ./config.yaml is optional
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::from(Path::new(path)).required(true));
        } else {
            builder = builder.add_source(File::from(Path::new(CWD_CONFIG_FILE)).required(false));
        }

        // 3. Prefixed environment, e.g. RECEIPT_OCR_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their env fallbacks) win over everything else
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(dir) = cli.static_dir {
            builder = builder.set_override("server.static_dir", dir)?;
        }
        if let Some(key) = cli.storage_api_key.filter(|k| !k.trim().is_empty()) {
            builder = builder.set_override("storage.api_key", key)?;
        }
        if let Some(url) = cli.storage_url.filter(|u| !u.trim().is_empty()) {
            builder = builder.set_override("storage.base_url", url)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
