//! Error types for the pull pipeline and the type normalizer.

use std::path::PathBuf;

use reqwest::StatusCode;

/// Failures while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid backend base URL '{value}': {reason}")]
    InvalidBackendBase { value: String, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures of a translation pull. Every variant is fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Request failed {status}: {method} {url}")]
    Fetch {
        method: &'static str,
        url: String,
        status: StatusCode,
    },

    #[error("Manifest missing languages/namespaces: {manifest}")]
    ManifestShape { manifest: String },

    #[error("Manifest entry '{entry}' is not a usable path component")]
    ManifestEntry { entry: String },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize bundle for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures of the type-export normalizer.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid type identifier '{0}'")]
    InvalidIdentifier(String),
}
