use std::path::PathBuf;
use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the vector store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not reach vector store at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("collection `{0}` not found")]
    NotFound(String),

    #[error("error while doing request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response had bad status code {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Problems with a fixture configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not open configuration file {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("could not parse configuration file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid fixture configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
