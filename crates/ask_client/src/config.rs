//! Client config load/save for `~/.ask/config.yaml`.

use std::path::{Path, PathBuf};

pub const DEFAULT_HTTP_URL: &str = "http://localhost:3000/api/question";
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:8765";
pub const CONFIG_ENV: &str = "ASK_CONFIG";

/// How questions reach the answering service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Http,
    #[serde(alias = "ws")]
    WebSocket,
}

/// Endpoint section (transport, url, index).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct EndpointSection {
    #[serde(default)]
    pub transport: Transport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

impl EndpointSection {
    pub fn url_or_default(&self) -> String {
        match (&self.url, self.transport) {
            (Some(url), _) => url.clone(),
            (None, Transport::Http) => DEFAULT_HTTP_URL.into(),
            (None, Transport::WebSocket) => DEFAULT_WS_URL.into(),
        }
    }
}

/// Log section (filter directive, log directory of the interactive form).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct LogSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointSection,
    #[serde(default)]
    pub log: LogSection,
}

/// Returns the default config file path: `~/.ask/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    Some(config_dir()?.join("config.yaml"))
}

/// `~/.ask`, home of the config file and the default log directory.
pub fn config_dir() -> Option<PathBuf> {
    Some(home_dir()?.join(".ask"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Resolve config path from an explicit override, `ASK_CONFIG`, or the default.
pub fn resolve_config_path(override_path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(p) = override_path {
        return Ok(p.to_path_buf());
    }
    if let Some(val) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(val));
    }
    default_config_path().ok_or(ConfigError::NoHome)
}

/// Load config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Like [`load`], but a missing file yields the default config.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    match load(path) {
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
        other => other,
    }
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unable to determine config path (set --config or ASK_CONFIG)")]
    NoHome,
}
