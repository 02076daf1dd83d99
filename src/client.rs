use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tracing::debug;

use crate::api::{
    ApiResponse, CollectionInfo, CollectionsResult, CountRequest, CountResult,
    CreateCollection, ScrollPage, ScrollRequest, ServiceInfo, UpsertPoints,
};
use crate::config::Endpoint;
use crate::error::StoreError;
use crate::model::{Point, PointId, VectorParams};

/// The operations the seeder needs from a vector database.
#[allow(async_fn_in_trait)]
pub trait VectorStore {
    async fn get_collection(&self, name: &str) -> Result<CollectionInfo, StoreError>;

    async fn delete_collection(&self, name: &str) -> Result<(), StoreError>;

    async fn create_collection(&self, name: &str, params: &VectorParams) -> Result<(), StoreError>;

    /// Insert-or-overwrite keyed by point id.
    async fn upsert(&self, name: &str, points: &[Point]) -> Result<(), StoreError>;

    async fn count(&self, name: &str) -> Result<u64, StoreError>;

    async fn scroll(&self, name: &str, offset: Option<&PointId>, limit: usize) -> Result<ScrollPage, StoreError>;

    async fn list_collections(&self) -> Result<Vec<String>, StoreError>;

    /// Only a "not found" answer means absent. Everything else is an error.
    async fn collection_exists(&self, name: &str) -> Result<bool, StoreError> {
        match self.get_collection(name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// REST client for a Qdrant-compatible service.
pub struct QdrantClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl QdrantClient {
    pub fn new(endpoint: &Endpoint) -> Result<Self, StoreError> {
        let base_url = endpoint.base_url()?;

        Ok(Self {
            client: Client::new(),
            base_url,
            api_key: endpoint.api_key.clone(),
        })
    }

    /// Builds the client and makes sure something answers at the endpoint.
    pub async fn connect(endpoint: &Endpoint) -> Result<(Self, ServiceInfo), StoreError> {
        let client = Self::new(endpoint)?;
        let info = client.root().await.map_err(|e| StoreError::Connect {
            url: endpoint.url(),
            reason: e.to_string(),
        })?;
        Ok((client, info))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn root(&self) -> Result<ServiceInfo, StoreError> {
        let res = self.request(Method::GET, &[]).send().await?;
        let res = check_status(res, None).await?;
        Ok(res.json().await?)
    }

    // --- REQUEST PLUMBING ---

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Base was checked in `new`, so the path is always mutable here.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!(%method, %url, "vector store request");

        let req = self.client.request(method, url);
        if !self.api_key.is_empty() {
            req.header("api-key", &self.api_key)
        } else {
            req
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, collection: Option<&str>) -> Result<T, StoreError> {
        let res = check_status(req.send().await?, collection).await?;
        let bytes = res.bytes().await?;
        let parsed: ApiResponse<T> = serde_json::from_slice(&bytes)?;
        Ok(parsed.result)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        collection: Option<&str>,
    ) -> Result<T, StoreError> {
        let req = self.request(method, segments).json(body);
        self.send(req, collection).await
    }
}

/// Turns non-2xx responses into errors. A 404 on a collection route becomes `NotFound`.
async fn check_status(res: Response, collection: Option<&str>) -> Result<Response, StoreError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(name) = collection {
            return Err(StoreError::NotFound(name.to_string()));
        }
    }

    let body = res.text().await.unwrap_or_default();
    Err(StoreError::Status { status, body })
}

impl VectorStore for QdrantClient {
    async fn get_collection(&self, name: &str) -> Result<CollectionInfo, StoreError> {
        let req = self.request(Method::GET, &["collections", name]);
        self.send(req, Some(name)).await
    }

    // Only the status matters here; the collection's schema is never decoded.
    async fn collection_exists(&self, name: &str) -> Result<bool, StoreError> {
        let req = self.request(Method::GET, &["collections", name]);
        match self.send::<IgnoredAny>(req, Some(name)).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn delete_collection(&self, name: &str) -> Result<(), StoreError> {
        let req = self.request(Method::DELETE, &["collections", name]);
        let _: serde_json::Value = self.send(req, Some(name)).await?;
        Ok(())
    }

    async fn create_collection(&self, name: &str, params: &VectorParams) -> Result<(), StoreError> {
        let body = CreateCollection { vectors: params };
        let _: serde_json::Value = self.send_json(Method::PUT, &["collections", name], &body, None).await?;
        Ok(())
    }

    async fn upsert(&self, name: &str, points: &[Point]) -> Result<(), StoreError> {
        let body = UpsertPoints { points };
        let req = self.request(Method::PUT, &["collections", name, "points"])
        .query(&[("wait", "true")])
        .json(&body);
        let _: serde_json::Value = self.send(req, Some(name)).await?;
        Ok(())
    }

    async fn count(&self, name: &str) -> Result<u64, StoreError> {
        let body = CountRequest { exact: true };
        let res: CountResult = self.send_json(Method::POST, &["collections", name, "points", "count"], &body, Some(name)).await?;
        Ok(res.count)
    }

    async fn scroll(&self, name: &str, offset: Option<&PointId>, limit: usize) -> Result<ScrollPage, StoreError> {
        let body = ScrollRequest { limit, offset, with_payload: true, with_vector: true };
        self.send_json(Method::POST, &["collections", name, "points", "scroll"], &body, Some(name)).await
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let req = self.request(Method::GET, &["collections"]);
        let res: CollectionsResult = self.send(req, None).await?;
        Ok(res.collections.into_iter().map(|c| c.name).collect())
    }
}
