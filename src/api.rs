// Wire types for the vector store's REST API.
// Every response is wrapped as {"result": ..., "status": ..., "time": ...}.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::model::{Point, PointId, VectorParams};

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: T,
}

/// Body of `GET /`
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct CollectionsResult {
    pub collections: Vec<CollectionDescription>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionDescription {
    pub name: String,
}

/// Result of `GET /collections/{name}`
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionInfo {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub points_count: Option<u64>,
    pub config: CollectionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    pub params: CollectionParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionParams {
    #[serde(default)]
    pub vectors: VectorsConfig,
}

/// Vector layout of an existing collection. Fixtures only create `Single`,
/// but a collection made by anything else may use named or sparse-only vectors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VectorsConfig {
    Single(VectorParams),
    Named(BTreeMap<String, VectorParams>),
    Other(serde_json::Value),
}

impl Default for VectorsConfig {
    // sparse-only collections report no dense vectors at all
    fn default() -> Self {
        VectorsConfig::Named(BTreeMap::new())
    }
}

impl VectorsConfig {
    pub fn single(&self) -> Option<VectorParams> {
        match self {
            VectorsConfig::Single(params) => Some(*params),
            _ => None,
        }
    }

    /// Short human readable summary, used in verification reports.
    pub fn describe(&self) -> String {
        match self {
            VectorsConfig::Single(p) => format!("{} x {}", p.size, p.distance),
            VectorsConfig::Named(named) if named.is_empty() => "no dense vectors".to_string(),
            VectorsConfig::Named(named) => {
                let names: Vec<&str> = named.keys().map(String::as_str).collect();
                format!("named vectors [{}]", names.join(", "))
            }
            VectorsConfig::Other(raw) => format!("unrecognised vectors config {}", raw),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateCollection<'a> {
    pub vectors: &'a VectorParams,
}

#[derive(Debug, Serialize)]
pub struct UpsertPoints<'a> {
    pub points: &'a [Point],
}

#[derive(Debug, Serialize)]
pub struct CountRequest {
    pub exact: bool,
}

#[derive(Debug, Deserialize)]
pub struct CountResult {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct ScrollRequest<'a> {
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<&'a PointId>,
    pub with_payload: bool,
    pub with_vector: bool,
}

/// One page of `POST /collections/{name}/points/scroll`
#[derive(Debug, Clone, Deserialize)]
pub struct ScrollPage {
    pub points: Vec<StoredPoint>,
    #[serde(default)]
    pub next_page_offset: Option<PointId>,
}

/// A point as read back from the service. Payload is left untyped.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredPoint {
    pub id: PointId,
    #[serde(default)]
    pub vector: Option<Vec<f32>>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}
