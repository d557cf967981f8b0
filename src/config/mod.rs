use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

/// Optional YAML config file. Every key can also be given on the command
/// line; flags win over file values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigFile {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: Option<bool>,
    pub base_url: Option<String>,
    pub compose_files: Option<Vec<String>>,
    pub working_dir: Option<PathBuf>,
    pub logging: Option<LoggingConfig>,
}

impl ConfigFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::InvalidFormat {
                    reason: e.to_string(),
                }
            }
        })?;

        let config: ConfigFile =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::InvalidFormat {
                reason: e.to_string(),
            })?;

        debug!("Loaded config file from {}", path.display());
        Ok(config)
    }
}

/// Structured logging configuration (config file only)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON log lines instead of the compact console format
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// Initialize the tracing subscriber from this configuration.
    /// RUST_LOG still takes precedence over the configured level.
    pub fn init(&self) {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        if self.json {
            let json_layer = fmt::layer().json().flatten_event(true);
            Registry::default().with(env_filter).with(json_layer).init();
        } else {
            let console_layer = fmt::layer().with_target(false).compact();
            Registry::default()
                .with(env_filter)
                .with(console_layer)
                .init();
        }
    }
}

/// Immutable runtime configuration, built once at startup and shared with
/// the request router.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    /// URL prefix mounted in front of every route ("/console"); requests
    /// outside the prefix answer 400
    pub base_url: Option<String>,
    /// Compose files, merged left to right
    pub compose_files: Vec<String>,
    /// Directory the compose files are resolved against
    pub working_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            debug: false,
            base_url: None,
            compose_files: vec![DEFAULT_COMPOSE_FILE.to_string()],
            working_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Normalize a configured base URL: leading slash on, trailing slash
    /// off, empty treated as unset.
    pub fn set_base_url(&mut self, base_url: Option<String>) {
        self.base_url = base_url.and_then(|raw| {
            let trimmed = raw.trim_matches('/');
            if trimmed.is_empty() {
                None
            } else {
                Some(format!("/{trimmed}"))
            }
        });
    }

    /// URL of the index page, honoring the base URL prefix
    pub fn index_url(&self) -> String {
        match &self.base_url {
            Some(base) => format!("{base}/"),
            None => "/".to_string(),
        }
    }

    /// Path segments of the base URL prefix
    pub fn base_segments(&self) -> Vec<String> {
        self.base_url
            .as_deref()
            .map(|base| {
                base.split('/')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolve host:port into a socket address for the listener
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::InvalidBindAddress { addr }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let mut config = AppConfig::default();
        config.set_base_url(Some("console/".to_string()));
        assert_eq!(config.base_url.as_deref(), Some("/console"));
        assert_eq!(config.index_url(), "/console/");
        assert_eq!(config.base_segments(), vec!["console".to_string()]);

        config.set_base_url(Some("/a/b/".to_string()));
        assert_eq!(config.base_url.as_deref(), Some("/a/b"));
        assert_eq!(
            config.base_segments(),
            vec!["a".to_string(), "b".to_string()]
        );

        config.set_base_url(Some("/".to_string()));
        assert_eq!(config.base_url, None);
        assert_eq!(config.index_url(), "/");
    }

    #[test]
    fn bind_addr_resolves_localhost() {
        let config = AppConfig::default();
        let addr = config.bind_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }
}
