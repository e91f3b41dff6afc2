//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for confcollect
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub acquire: AcquireConfig,
    pub http: HttpConfig,
    /// File the configuration was read from (None = defaults)
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    #[serde(deserialize_with = "deserialize_path")]
    pub root: PathBuf,
    #[serde(deserialize_with = "deserialize_path")]
    pub venue_list: PathBuf,
    pub min_year: u32,
    pub max_year: u32,
    pub endpoint: String,
    pub page_size: u32,
    /// Keep the raw response as papers.json
    pub archive_raw: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./records"),
            venue_list: PathBuf::from("./conf_jnl.txt"),
            min_year: 2013,
            max_year: 2023,
            endpoint: confcollect_dblp::DEFAULT_ENDPOINT.to_string(),
            page_size: confcollect_dblp::DEFAULT_PAGE_SIZE,
            archive_raw: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    pub tool: String,
    pub args: Vec<String>,
    #[serde(deserialize_with = "deserialize_paths")]
    pub search_paths: Vec<PathBuf>,
    pub no_result_marker: String,
    pub request_failed_marker: String,
    pub priority: Vec<String>,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        let defaults = confcollect_acquire::Config::default();
        Self {
            tool: defaults.tool,
            args: defaults.args,
            search_paths: expand_path("~/.local/bin").into_iter().collect(),
            no_result_marker: defaults.no_result_marker,
            request_failed_marker: defaults.request_failed_marker,
            priority: defaults.priority,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Seconds
    pub connect_timeout: u64,
    /// Seconds
    pub request_timeout: u64,
    pub max_retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let defaults = confcollect_core::HttpConfig::default();
        Self {
            connect_timeout: defaults.connect_timeout.as_secs(),
            request_timeout: defaults.request_timeout.as_secs(),
            max_retries: defaults.max_retries,
        }
    }
}

fn deserialize_path<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    expand_path(&s).ok_or_else(|| serde::de::Error::custom(format!("cannot expand path: {s}")))
}

fn deserialize_paths<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let list: Vec<String> = Vec::deserialize(deserializer)?;
    list.iter()
        .map(|s| {
            expand_path(s).ok_or_else(|| serde::de::Error::custom(format!("cannot expand path: {s}")))
        })
        .collect()
}

/// Expand a leading `~/` to the home directory and a whole-string `${VAR}`.
///
/// `None` when the home directory or the variable is unavailable.
fn expand_path(s: &str) -> Option<PathBuf> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        return std::env::var_os(var_name).map(PathBuf::from);
    }
    if let Some(rest) = s.strip_prefix("~/") {
        let base = directories::BaseDirs::new()?;
        return Some(base.home_dir().join(rest));
    }
    Some(PathBuf::from(s))
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./confcollect.toml (current directory)
    /// 2. ~/.config/confcollect/config.toml (platform config dir)
    ///
    /// If no config file found, returns default config. Runs before logging
    /// is installed; the caller logs [`Config::source`].
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("confcollect.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "confcollect") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn http_config(&self) -> confcollect_core::HttpConfig {
        confcollect_core::HttpConfig {
            connect_timeout: std::time::Duration::from_secs(self.http.connect_timeout),
            request_timeout: std::time::Duration::from_secs(self.http.request_timeout),
            max_retries: self.http.max_retries,
        }
    }
}
