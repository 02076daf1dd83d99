//! In-process stand-in for the Qdrant REST API, enough of it for seeding and verification.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Deserialize;
use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

pub struct FakeCollection {
    pub size: u64,
    pub distance: String,
    pub points: BTreeMap<u64, Value>,
    /// Served verbatim as `config.params.vectors` instead of size/distance
    pub raw_vectors: Option<Value>,
}

impl FakeCollection {
    pub fn dense(size: u64, distance: &str) -> Self {
        Self { size, distance: distance.into(), points: BTreeMap::new(), raw_vectors: None }
    }

    /// A collection whose vectors config is not a single dense vector.
    pub fn with_vectors(vectors: Value) -> Self {
        Self { raw_vectors: Some(vectors), ..Self::dense(0, "Cosine") }
    }
}

#[derive(Default)]
pub struct Inner {
    pub collections: BTreeMap<String, FakeCollection>,
    /// `GET /collections/{name}` answers 500 for this name
    pub fail_lookup: Option<String>,
    /// When set, requests without a matching `api-key` header get 403
    pub api_key: Option<String>,
    /// "METHOD target" for every request that reached a handler
    pub log: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeQdrant {
    inner: Arc<Mutex<Inner>>,
}

impl FakeQdrant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn point_ids(&self, name: &str) -> Vec<u64> {
        self.state().collections.get(name).map(|c| c.points.keys().copied().collect()).unwrap_or_default()
    }

    /// Starts serving on an ephemeral localhost port.
    pub fn spawn(&self) -> SocketAddr {
        let (addr, server) = warp::serve(routes(self.clone())).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }
}

#[derive(Debug)]
struct Unauthorized;

impl warp::reject::Reject for Unauthorized {}

#[derive(Deserialize)]
struct CreateBody {
    vectors: VectorsBody,
}

#[derive(Deserialize)]
struct VectorsBody {
    size: u64,
    distance: String,
}

#[derive(Deserialize)]
struct UpsertBody {
    points: Vec<Value>,
}

#[derive(Deserialize)]
struct ScrollBody {
    limit: usize,
    offset: Option<u64>,
}

fn reply(status: StatusCode, body: Value) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(&body), status)
}

fn ok(result: Value) -> WithStatus<Json> {
    reply(StatusCode::OK, json!({ "result": result, "status": "ok", "time": 0.0001 }))
}

fn error(status: StatusCode, message: String) -> WithStatus<Json> {
    reply(status, json!({ "status": { "error": message }, "time": 0.0001 }))
}

fn not_found(name: &str) -> WithStatus<Json> {
    error(StatusCode::NOT_FOUND, format!("Not found: Collection `{}` doesn't exist!", name))
}

fn with_fake(fake: FakeQdrant) -> impl Filter<Extract = (FakeQdrant,), Error = Infallible> + Clone {
    warp::any().map(move || fake.clone())
}

fn routes(fake: FakeQdrant) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let auth = warp::header::optional::<String>("api-key")
    .and(with_fake(fake.clone()))
    .and_then(|key: Option<String>, fake: FakeQdrant| async move {
        let expected = fake.state().api_key.clone();
        match expected {
            Some(expected) if key.as_deref() != Some(expected.as_str()) => Err(warp::reject::custom(Unauthorized)),
            _ => Ok(()),
        }
    })
    .untuple_one();

    // GET /
    let root = warp::get()
    .and(warp::path::end())
    .and(with_fake(fake.clone()))
    .map(|fake: FakeQdrant| {
        fake.state().log.push("GET /".into());
        reply(StatusCode::OK, json!({ "title": "qdrant - vector search engine", "version": "1.9.0" }))
    });

    // GET /collections
    let list = warp::get()
    .and(warp::path!("collections"))
    .and(with_fake(fake.clone()))
    .map(|fake: FakeQdrant| {
        let names: Vec<Value> = fake.state().collections.keys().map(|n| json!({ "name": n })).collect();
        ok(json!({ "collections": names }))
    });

    // GET /collections/{name}
    let get = warp::get()
    .and(warp::path!("collections" / String))
    .and(with_fake(fake.clone()))
    .map(|name: String, fake: FakeQdrant| {
        let mut state = fake.state();
        state.log.push(format!("GET {}", name));
        if state.fail_lookup.as_deref() == Some(name.as_str()) {
            return error(StatusCode::INTERNAL_SERVER_ERROR, "Service internal error".into());
        }
        match state.collections.get(&name) {
            Some(col) => {
                let vectors = col.raw_vectors.clone()
                .unwrap_or_else(|| json!({ "size": col.size, "distance": col.distance }));
                ok(json!({
                    "status": "green",
                    "points_count": col.points.len(),
                    "config": { "params": { "vectors": vectors } }
                }))
            }
            None => not_found(&name),
        }
    });

    // PUT /collections/{name}
    let create = warp::put()
    .and(warp::path!("collections" / String))
    .and(warp::body::json())
    .and(with_fake(fake.clone()))
    .map(|name: String, body: CreateBody, fake: FakeQdrant| {
        let mut state = fake.state();
        state.log.push(format!("CREATE {}", name));
        if state.collections.contains_key(&name) {
            return error(StatusCode::CONFLICT, format!("Wrong input: Collection `{}` already exists!", name));
        }
        state.collections.insert(name, FakeCollection::dense(body.vectors.size, &body.vectors.distance));
        ok(json!(true))
    });

    // DELETE /collections/{name}
    let delete = warp::delete()
    .and(warp::path!("collections" / String))
    .and(with_fake(fake.clone()))
    .map(|name: String, fake: FakeQdrant| {
        let mut state = fake.state();
        state.log.push(format!("DELETE {}", name));
        ok(json!(state.collections.remove(&name).is_some()))
    });

    // PUT /collections/{name}/points
    let upsert = warp::put()
    .and(warp::path!("collections" / String / "points"))
    .and(warp::body::json())
    .and(with_fake(fake.clone()))
    .map(|name: String, body: UpsertBody, fake: FakeQdrant| {
        let mut state = fake.state();
        state.log.push(format!("UPSERT {} {}", name, body.points.len()));
        let Some(col) = state.collections.get_mut(&name) else {
            return not_found(&name);
        };
        for point in body.points {
            let id = point["id"].as_u64().unwrap_or(u64::MAX);
            let len = point["vector"].as_array().map_or(0, Vec::len) as u64;
            if len != col.size {
                return error(
                    StatusCode::BAD_REQUEST,
                    format!("Wrong input: Vector dimension error: expected dim: {}, got {}", col.size, len),
                );
            }
            col.points.insert(id, point);
        }
        ok(json!({ "operation_id": 0, "status": "completed" }))
    });

    // POST /collections/{name}/points/count
    let count = warp::post()
    .and(warp::path!("collections" / String / "points" / "count"))
    .and(with_fake(fake.clone()))
    .map(|name: String, fake: FakeQdrant| {
        let state = fake.state();
        let reply = match state.collections.get(&name) {
            Some(col) => ok(json!({ "count": col.points.len() })),
            None => not_found(&name),
        };
        reply
    });

    // POST /collections/{name}/points/scroll
    let scroll = warp::post()
    .and(warp::path!("collections" / String / "points" / "scroll"))
    .and(warp::body::json())
    .and(with_fake(fake.clone()))
    .map(|name: String, body: ScrollBody, fake: FakeQdrant| {
        let state = fake.state();
        let Some(col) = state.collections.get(&name) else {
            return not_found(&name);
        };
        let mut page: Vec<(u64, Value)> = col.points
        .range(body.offset.unwrap_or(0)..)
        .take(body.limit + 1)
        .map(|(id, p)| (*id, p.clone()))
        .collect();
        let next = if page.len() > body.limit { page.pop().map(|(id, _)| id) } else { None };
        let points: Vec<Value> = page.into_iter().map(|(_, p)| p).collect();
        ok(json!({ "points": points, "next_page_offset": next }))
    });

    auth
    .and(root.or(list).or(get).or(create).or(delete).or(upsert).or(count).or(scroll))
    .recover(handle_rejection)
}

async fn handle_rejection(err: Rejection) -> Result<WithStatus<Json>, Infallible> {
    if err.find::<Unauthorized>().is_some() {
        return Ok(error(StatusCode::FORBIDDEN, "Invalid api-key".into()));
    }
    if err.is_not_found() {
        return Ok(error(StatusCode::NOT_FOUND, "Not found".into()));
    }
    Ok(error(StatusCode::BAD_REQUEST, format!("{:?}", err)))
}
