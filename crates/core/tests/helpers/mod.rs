//! Test doubles for controller and client tests.
//!
//! `ScriptedBackend` answers searches in-process with canned replies and
//! optional delays. `spawn_api` starts a small axum server on a random local
//! port that speaks the used-cars search API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use carsearch_core::{CarRecord, SearchBackend, SearchError, SearchRequest, SearchResponse};
use serde_json::json;

// ---------------------------------------------------------------------------
// Fixture records
// ---------------------------------------------------------------------------

pub fn car(id: u64, brand: &str, model: &str, year: i32, price: Option<f64>) -> CarRecord {
    CarRecord { id: Some(id), brand: brand.into(), model: model.into(), year, price }
}

pub fn civic() -> CarRecord {
    car(1, "Honda", "Civic", 2020, Some(95000.0))
}

pub fn corolla() -> CarRecord {
    car(2, "Toyota", "Corolla", 2019, Some(89000.0))
}

pub fn inventory() -> Vec<CarRecord> {
    vec![
        civic(),
        corolla(),
        car(3, "Honda", "Fit", 2012, None),
        car(4, "Volkswagen", "Gol", 2010, Some(0.0)),
        car(5, "Fiat", "Uno <Mille>", 2004, Some(14500.0)),
    ]
}

pub fn card_count(html: &str) -> usize {
    html.matches("class=\"car-card\"").count()
}

// ---------------------------------------------------------------------------
// Scripted in-process backend
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub enum Outcome {
    Found(Vec<CarRecord>),
    /// Count reported independently of the records.
    Miscounted(u64, Vec<CarRecord>),
    /// `count: 0` with no results list at all.
    Absent,
    Status(u16),
    Garbled,
    Panic,
}

#[derive(Clone)]
pub struct Reply {
    outcome: Outcome,
    delay: Duration,
}

impl Reply {
    pub fn found(results: Vec<CarRecord>) -> Self {
        Self { outcome: Outcome::Found(results), delay: Duration::ZERO }
    }

    pub fn with(outcome: Outcome) -> Self {
        Self { outcome, delay: Duration::ZERO }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Replies keyed by query; unknown queries get an empty result set.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: HashMap<String, Reply>,
    calls: AtomicUsize,
    seen: std::sync::Mutex<Vec<SearchRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, query: &str, reply: Reply) -> Self {
        self.replies.insert(query.to_string(), reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SearchRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl SearchBackend for ScriptedBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());

        let reply = self
            .replies
            .get(&request.query)
            .cloned()
            .unwrap_or_else(|| Reply::found(vec![]));
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }

        match reply.outcome {
            Outcome::Found(results) => Ok(SearchResponse {
                count: results.len() as u64,
                results: Some(results),
                method: Some(request.method.clone()),
                query: Some(request.query.clone()),
            }),
            Outcome::Miscounted(count, results) => {
                Ok(SearchResponse { count, results: Some(results), method: None, query: None })
            }
            Outcome::Absent => Ok(SearchResponse { count: 0, results: None, method: None, query: None }),
            Outcome::Status(code) => Err(SearchError::Status(
                reqwest::StatusCode::from_u16(code).unwrap(),
            )),
            Outcome::Garbled => {
                Err(serde_json::from_str::<SearchResponse>("{\"count\":").unwrap_err().into())
            }
            Outcome::Panic => panic!("backend exploded"),
        }
    }
}

// ---------------------------------------------------------------------------
// In-process HTTP API
// ---------------------------------------------------------------------------

fn matches(car: &CarRecord, q: &str) -> bool {
    let q = q.to_lowercase();
    car.brand.to_lowercase().contains(&q) || car.model.to_lowercase().contains(&q)
}

async fn api_search(
    Path(method): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    match method.as_str() {
        "sequential" | "indexed" | "hash" => {}
        "boom" => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "kaput" })))
                .into_response()
        }
        "garbled" => return (StatusCode::OK, "{\"count\": 1, \"results\": [").into_response(),
        "nulled" => {
            return Json(json!({ "method": method, "count": 0, "results": null })).into_response()
        }
        _ => {
            return (StatusCode::NOT_FOUND, Json(json!({ "error": "Endpoint não encontrado" })))
                .into_response()
        }
    }

    let results: Vec<CarRecord> = inventory().into_iter().filter(|c| matches(c, &q)).collect();
    let count = results.len();
    Json(json!({
        "method": method,
        "query": q,
        "results": results,
        "count": count,
    }))
    .into_response()
}

async fn api_catalog(Query(params): Query<HashMap<String, String>>) -> Response {
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page: usize =
        params.get("per_page").and_then(|p| p.parse().ok()).unwrap_or(20).clamp(1, 100);
    let cars = inventory();
    let total = cars.len();
    let start = page.saturating_sub(1) * per_page;
    let results: Vec<CarRecord> = cars.into_iter().skip(start).take(per_page).collect();
    Json(json!({
        "results": results,
        "total": total,
        "page": page,
        "per_page": per_page,
        "total_pages": total.div_ceil(per_page),
    }))
    .into_response()
}

/// Start the API on `127.0.0.1:0` and return its base URL.
pub async fn spawn_api() -> String {
    let app = Router::new()
        .route("/api/search/{method}", get(api_search))
        .route("/api/catalog", get(api_catalog));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
