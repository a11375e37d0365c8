//! Application configuration for Pastewatch.
//!
//! User config lives at `~/.pastewatch/pastewatch.toml`.
//! Every field has a default, so running without a config file performs
//! the stock Pastebin sweep.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PastewatchError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pastewatch.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pastewatch";

/// Placeholder substituted with the paste ID in `raw_url_template`.
pub const PASTE_ID_PLACEHOLDER: &str = "{id}";

// ---------------------------------------------------------------------------
// Config structs (matching pastewatch.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where pastes are discovered and fetched from.
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Sweep pacing.
    #[serde(default)]
    pub sweep: SweepPolicyConfig,

    /// Output file locations.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Archive page listing recent pastes.
    #[serde(default = "default_archive_url")]
    pub archive_url: String,

    /// Raw-content URL, with `{id}` standing in for the paste ID.
    #[serde(default = "default_raw_url_template")]
    pub raw_url_template: String,

    /// Maximum pastes processed per sweep.
    #[serde(default = "default_max_pastes")]
    pub max_pastes: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            archive_url: default_archive_url(),
            raw_url_template: default_raw_url_template(),
            max_pastes: default_max_pastes(),
        }
    }
}

fn default_archive_url() -> String {
    "https://pastebin.com/archive".into()
}
fn default_raw_url_template() -> String {
    "https://pastebin.com/raw/{id}".into()
}
fn default_max_pastes() -> usize {
    30
}

/// `[http]` section, shared by the archive scraper and the paste fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into()
}
fn default_timeout_secs() -> u64 {
    10
}

/// `[sweep]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepPolicyConfig {
    /// Pause after each paste, in milliseconds.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_ms: u64,
}

impl Default for SweepPolicyConfig {
    fn default() -> Self {
        Self {
            rate_limit_ms: default_rate_limit(),
        }
    }
}

fn default_rate_limit() -> u64 {
    2000
}

/// `[output]` section. Relative paths resolve against the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSONL file receiving match records (truncated each run).
    #[serde(default = "default_matches_file")]
    pub matches_file: PathBuf,

    /// Plain-text log file (appended to).
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            matches_file: default_matches_file(),
            log_file: default_log_file(),
        }
    }
}

fn default_matches_file() -> PathBuf {
    PathBuf::from("keyword_matches.jsonl")
}
fn default_log_file() -> PathBuf {
    PathBuf::from("pastebin_crawler.log")
}

// ---------------------------------------------------------------------------
// Sweep config (runtime, validated from AppConfig)
// ---------------------------------------------------------------------------

/// Runtime sweep configuration with parsed URLs.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Archive page to scrape for paste IDs.
    pub archive_url: Url,
    /// Raw-content URL template containing `{id}`.
    pub raw_url_template: String,
    /// Maximum pastes processed per sweep.
    pub max_pastes: usize,
    /// HTTP client settings.
    pub http: HttpConfig,
    /// Pause after each paste, in milliseconds.
    pub rate_limit_ms: u64,
    /// JSONL output path.
    pub matches_file: PathBuf,
}

impl TryFrom<&AppConfig> for SweepConfig {
    type Error = PastewatchError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        let archive_url = Url::parse(&config.source.archive_url).map_err(|e| {
            PastewatchError::config(format!(
                "invalid archive_url '{}': {e}",
                config.source.archive_url
            ))
        })?;

        let template = &config.source.raw_url_template;
        if !template.contains(PASTE_ID_PLACEHOLDER) {
            return Err(PastewatchError::config(format!(
                "raw_url_template '{template}' must contain {PASTE_ID_PLACEHOLDER}"
            )));
        }

        if config.source.max_pastes == 0 {
            return Err(PastewatchError::config("max_pastes must be at least 1"));
        }

        Ok(Self {
            archive_url,
            raw_url_template: template.clone(),
            max_pastes: config.source.max_pastes,
            http: config.http.clone(),
            rate_limit_ms: config.sweep.rate_limit_ms,
            matches_file: config.output.matches_file.clone(),
        })
    }
}

impl SweepConfig {
    /// Pause after each paste as a [`Duration`].
    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pastewatch/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PastewatchError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pastewatch/pastewatch.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PastewatchError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PastewatchError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PastewatchError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| PastewatchError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PastewatchError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
