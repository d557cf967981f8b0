use thiserror::Error;

/// Convoy-specific error types for better error handling
#[derive(Error, Debug)]
pub enum ConvoyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Generic error: {0}")]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found at path: {path}")]
    FileNotFound { path: String },

    #[error("Invalid config format: {reason}")]
    InvalidFormat { reason: String },

    #[error("Invalid bind address: {addr}")]
    InvalidBindAddress { addr: String },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },
}

/// Convenience type alias for Convoy results
pub type Result<T, E = ConvoyError> = std::result::Result<T, E>;
