#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use hazardscreen::AppConfig;
use lopdf::content::Content;
use lopdf::{Document, Object};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CENSUS_PATH: &str = "/geocoder/locations/onelineaddress";
pub const NOMINATIM_PATH: &str = "/search";
pub const FAULT_LAYER_PATH: &str = "/arcgis/rest/services/AP/MapServer/0";
pub const LIQUEFACTION_LAYER_PATH: &str = "/arcgis/rest/services/LIQ/MapServer/0";
pub const LANDSLIDE_LAYER_PATH: &str = "/arcgis/rest/services/LS/MapServer/0";

#[derive(Clone)]
pub enum MockBody {
    Json(Value),
    Text(&'static str),
}

#[derive(Clone)]
struct MockState {
    hits: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    headers: Arc<Mutex<Vec<HeaderMap>>>,
    status: StatusCode,
    body: MockBody,
    delay: Duration,
}

/// An in-process HTTP service answering GET `route` with a canned response.
pub struct MockService {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    headers: Arc<Mutex<Vec<HeaderMap>>>,
}

impl MockService {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> HashMap<String, String> {
        self.queries
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("service was never called")
    }

    pub fn last_headers(&self) -> HeaderMap {
        self.headers
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("service was never called")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn respond(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.queries.lock().unwrap().push(params);
    state.headers.lock().unwrap().push(headers);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    match state.body {
        MockBody::Json(body) => (state.status, Json(body)).into_response(),
        MockBody::Text(body) => (state.status, body).into_response(),
    }
}

pub async fn mock_service(route: &str, status: StatusCode, body: MockBody) -> MockService {
    delayed_mock_service(route, status, body, Duration::ZERO).await
}

/// Like `mock_service`, but each response is held back for `delay`.
pub async fn delayed_mock_service(
    route: &str,
    status: StatusCode,
    body: MockBody,
    delay: Duration,
) -> MockService {
    let hits = Arc::new(AtomicUsize::new(0));
    let queries = Arc::new(Mutex::new(Vec::new()));
    let headers = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        hits: hits.clone(),
        queries: queries.clone(),
        headers: headers.clone(),
        status,
        body,
        delay,
    };
    let router = Router::new().route(route, get(respond)).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockService {
        base_url: format!("http://{}", addr),
        hits,
        queries,
        headers,
    }
}

pub async fn census(status: StatusCode, body: MockBody) -> MockService {
    mock_service(CENSUS_PATH, status, body).await
}

pub async fn slow_census(delay: Duration, body: MockBody) -> MockService {
    delayed_mock_service(CENSUS_PATH, StatusCode::OK, body, delay).await
}

pub async fn nominatim(status: StatusCode, body: MockBody) -> MockService {
    mock_service(NOMINATIM_PATH, status, body).await
}

/// ArcGIS layer mock; the layer endpoint is `service.url(layer_path)`.
pub async fn arcgis_layer(layer_path: &str, status: StatusCode, body: MockBody) -> MockService {
    mock_service(&format!("{}/query", layer_path), status, body).await
}

pub fn census_match(lon: f64, lat: f64) -> MockBody {
    MockBody::Json(json!({
        "result": {
            "addressMatches": [
                {"matchedAddress": "123 MAIN ST, CITY, CA", "coordinates": {"x": lon, "y": lat}}
            ]
        }
    }))
}

pub fn census_no_match() -> MockBody {
    MockBody::Json(json!({"result": {"addressMatches": []}}))
}

pub fn nominatim_match(lon: f64, lat: f64) -> MockBody {
    MockBody::Json(json!([
        {"lat": lat.to_string(), "lon": lon.to_string(), "display_name": "Main Street, City"}
    ]))
}

pub fn arcgis_features(attributes: Vec<Value>) -> MockBody {
    let features: Vec<Value> = attributes
        .into_iter()
        .map(|a| json!({ "attributes": a }))
        .collect();
    MockBody::Json(json!({ "features": features }))
}

/// Configuration pointing the geocoders at mock services; a `None` provider
/// is disabled. All hazard layers start unconfigured.
pub fn config(census: Option<&MockService>, nominatim: Option<&MockService>) -> AppConfig {
    let mut config = AppConfig::default();
    config.geocoder.use_census = census.is_some();
    config.geocoder.use_nominatim = nominatim.is_some();
    config.geocoder.timeout_secs = 5;
    config.layers.timeout_secs = 5;
    if let Some(service) = census {
        config.geocoder.census_url = service.url(CENSUS_PATH);
    }
    if let Some(service) = nominatim {
        config.geocoder.nominatim_url = service.url(NOMINATIM_PATH);
    }
    config
}

fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x95 => '•',
            0x96 => '–',
            0x97 => '—',
            other => other as char,
        })
        .collect()
}

/// Text shown on the report's single page, one entry per line.
pub fn report_lines(pdf: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(pdf).expect("valid PDF");
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1, "report must be a single page");
    let page_id = *pages.values().next().unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

    content
        .operations
        .into_iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.into_iter().next() {
            Some(Object::String(bytes, _)) => Some(decode_win_ansi(&bytes)),
            _ => None,
        })
        .collect()
}
