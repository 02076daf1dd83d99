use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, StoreError};
use crate::model::CollectionSpec;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 6333;
pub const DEFAULT_POINTS: usize = 100;
pub const DEFAULT_SCORE_MAX: u32 = 100;

/// Where the vector store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    /// Sent as the `api-key` header when non-empty
    pub api_key: String,
}

impl Endpoint {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, api_key: String::new() }
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = api_key.to_string();
        self
    }

    /// Base URL of the service. `host` may be a bare name or a full URL with a path prefix;
    /// the port always lands in the authority.
    pub fn base_url(&self) -> Result<Url, StoreError> {
        let raw = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("http://{}", self.host)
        };

        let mut url = Url::parse(&raw)
        .map_err(|e| StoreError::InvalidEndpoint(format!("{}: {}", raw, e)))?;
        if url.cannot_be_a_base() || url.set_port(Some(self.port)).is_err() {
            return Err(StoreError::InvalidEndpoint(raw));
        }
        Ok(url)
    }

    /// Printable form of the base URL, without a trailing slash.
    pub fn url(&self) -> String {
        match self.base_url() {
            Ok(url) => url.as_str().trim_end_matches('/').to_string(),
            Err(_) => format!("{}:{}", self.host, self.port),
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

/// Everything the seeder needs to know about what to generate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FixtureConfig {
    /// Collections, processed in this order
    pub collections: Vec<CollectionSpec>,

    /// Records per collection; ids run 0..points_per_collection
    pub points_per_collection: usize,

    /// Label set the payload `category` is drawn from
    pub categories: Vec<String>,

    /// Scores are drawn from [0, score_max)
    pub score_max: u32,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            collections: vec![
                CollectionSpec::new("product_embeddings", 128, "E-commerce product search vectors"),
                CollectionSpec::new("user_profiles", 256, "User embedding vectors for recommendations"),
                CollectionSpec::new("document_search", 384, "Document embeddings for semantic search"),
            ],
            points_per_collection: DEFAULT_POINTS,
            categories: vec!["A".into(), "B".into(), "C".into()],
            score_max: DEFAULT_SCORE_MAX,
        }
    }
}

impl FixtureConfig {
    /// Reads a JSON fixture file. Missing fields fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collections.is_empty() {
            return Err(ConfigError::Invalid("no collections declared".into()));
        }
        if self.points_per_collection == 0 {
            return Err(ConfigError::Invalid("points_per_collection must be positive".into()));
        }
        if self.categories.is_empty() {
            return Err(ConfigError::Invalid("category set is empty".into()));
        }
        if self.score_max == 0 {
            return Err(ConfigError::Invalid("score_max must be positive".into()));
        }

        let mut seen = HashSet::new();
        for spec in &self.collections {
            if spec.name.trim().is_empty() {
                return Err(ConfigError::Invalid("collection name is empty".into()));
            }
            if spec.size == 0 {
                return Err(ConfigError::Invalid(format!("collection `{}` has zero dimensionality", spec.name)));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigError::Invalid(format!("collection `{}` declared twice", spec.name)));
            }
        }
        Ok(())
    }
}
