use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use search_core::index::TermFrequency;
use search_core::loader::{ingest, load_documents, DocumentInput};
use search_core::paginator::paginate;
use search_core::request_queue::RequestQueue;
use search_core::{DocId, Document, DocumentStatus, EngineConfig, SearchError, SearchServer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}
fn default_page_size() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub page: usize,
    pub num_pages: usize,
    pub results: Vec<Document>,
}

#[derive(Deserialize)]
pub struct MatchParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub doc_id: DocId,
    pub terms: Vec<String>,
    pub status: DocumentStatus,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub document_count: usize,
    pub document_ids: Vec<DocId>,
    pub no_result_requests: usize,
}

/// The engine and its request log live behind one lock.
pub struct Engine {
    pub server: SearchServer,
    pub requests: RequestQueue,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<Engine>>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(server: SearchServer, admin_token: Option<String>) -> Self {
        let engine = Engine { server, requests: RequestQueue::new() };
        Self { engine: Arc::new(Mutex::new(engine)), admin_token }
    }
}

pub struct AppConfig {
    pub engine: EngineConfig,
    /// Documents to load at startup.
    pub input: Option<PathBuf>,
    pub admin_token: Option<String>,
}

pub enum ApiError {
    Search(SearchError),
    Unauthorized(&'static str),
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self { ApiError::Search(err) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Search(err) => {
                let status = match err {
                    SearchError::DuplicateId(_) => StatusCode::CONFLICT,
                    SearchError::UnknownId(_) => StatusCode::NOT_FOUND,
                    SearchError::MalformedQuery(_) | SearchError::InvalidWord(_) => StatusCode::BAD_REQUEST,
                };
                (status, err.to_string())
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    let mut server = SearchServer::new(config.engine)?;
    if let Some(input) = &config.input {
        let docs = load_documents(input)?;
        ingest(&mut server, &docs)?;
    }
    Ok(router(AppState::new(server, config.admin_token)))
}

pub fn router(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .route("/documents", post(add_handler))
        .route("/documents/dedupe", post(dedupe_handler))
        .route("/documents/:doc_id", delete(remove_handler))
        .route("/documents/:doc_id/match", get(match_handler))
        .route("/documents/:doc_id/terms", get(terms_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let docs = {
        let mut engine = state.engine.lock();
        let Engine { server, requests } = &mut *engine;
        let status = params.status.unwrap_or_default();
        requests.add_find_request_with_status(server, &params.q, status)?
    };
    let pages = paginate(&docs, params.page_size);
    let results = pages.get(params.page).map(|p| p.items().to_vec()).unwrap_or_default();
    Ok(Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total_hits: docs.len(),
        page: params.page,
        num_pages: pages.len(),
        results,
    }))
}

pub async fn match_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
    Query(params): Query<MatchParams>,
) -> Result<Json<MatchResponse>, ApiError> {
    let (terms, status) = state.engine.lock().server.match_document(&params.q, doc_id)?;
    Ok(Json(MatchResponse { doc_id, terms, status }))
}

pub async fn terms_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
) -> Json<BTreeMap<String, TermFrequency>> {
    Json(state.engine.lock().server.term_frequencies(doc_id).clone())
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let engine = state.engine.lock();
    Json(StatsResponse {
        document_count: engine.server.document_count(),
        document_ids: engine.server.document_ids().to_vec(),
        no_result_requests: engine.requests.no_result_requests(),
    })
}

// --- Admin endpoints ---
async fn add_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(doc): Json<DocumentInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    authorize(&state, &headers)?;
    state
        .engine
        .lock()
        .server
        .add_document(doc.id, &doc.text, doc.status, &doc.ratings)?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "doc_id": doc.id }))))
}

async fn remove_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(doc_id): Path<DocId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&state, &headers)?;
    state.engine.lock().server.remove_document(doc_id)?;
    Ok(Json(serde_json::json!({ "removed": doc_id })))
}

async fn dedupe_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&state, &headers)?;
    let removed = state.engine.lock().server.remove_duplicates();
    Ok(Json(serde_json::json!({ "removed": removed })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err(ApiError::Unauthorized("ADMIN_TOKEN not set")),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("invalid admin token"))
    }
}
