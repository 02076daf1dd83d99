use std::fmt;
use serde::{Deserialize, Serialize};

/// Similarity metric a collection is configured for.
/// Serialized with the service's own spelling.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distance {
    #[default]
    Cosine,
    Euclid,
    Dot,
    Manhattan,
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Vector configuration sent on collection creation and read back from collection info.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorParams {
    pub size: usize,
    pub distance: Distance,
}

/// One fixture collection: what to create and how wide its vectors are.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CollectionSpec {
    /// Collection name on the service
    pub name: String,

    /// Vector dimensionality
    pub size: usize,

    /// Human readable note, never sent to the service
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub distance: Distance,
}

impl CollectionSpec {
    pub fn new(name: &str, size: usize, description: &str) -> Self {
        Self {
            name: name.to_string(),
            size,
            description: description.to_string(),
            distance: Distance::Cosine,
        }
    }

    pub fn vector_params(&self) -> VectorParams {
        VectorParams { size: self.size, distance: self.distance }
    }
}

/// Metadata stored next to each fixture vector
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Payload {
    pub name: String,
    pub category: String,
    pub score: f64,
}

/// A single record as submitted to the upsert endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Point {
    /// Sequential id, unique within its collection
    pub id: u64,

    /// Embedding, length == owning collection's size
    pub vector: Vec<f32>,

    pub payload: Payload,
}

/// Point id as the service reports it. Fixtures only ever write numeric ids,
/// but a collection touched by something else may hold UUIDs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Uuid(String),
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointId::Num(n) => write!(f, "{}", n),
            PointId::Uuid(s) => write!(f, "{}", s),
        }
    }
}
