//! HTTP API server.
//!
//! Routes:
//! - `GET /` — minimal search-form front end
//! - `GET /health` — liveness probe
//! - `POST /api/search` — per-category results for one or more queries
//! - `POST /api/crawl`, `GET /api/crawl?query=…` — crawl + cited answer
//!
//! Handlers validate before doing any work and answer errors with a
//! uniform `{"error": "…"}` body.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use blaster_search::config::MAX_QUERIES;
use blaster_search::{search_queries, QueryResults, SearchCategory, SearchProviders};
use serde::Deserialize;
use std::sync::Arc;

use crate::answer::{answer_query, Answer};
use crate::config::BlasterConfig;
use crate::llm::{DeepSeekClient, DeepSeekConfig};

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<BlasterConfig>,
    providers: Arc<SearchProviders>,
    llm: Option<Arc<DeepSeekClient>>,
}

impl AppState {
    /// Build state from configuration: providers from credentials, the
    /// LLM client only when an API key is present.
    pub fn from_config(config: BlasterConfig) -> anyhow::Result<Self> {
        let providers = SearchProviders::new(
            config.credentials.unsplash_access_key.clone(),
            config.credentials.pexels_api_key.clone(),
            config.credentials.twitter_bearer_token.clone(),
        );

        let llm = match config.credentials.deepseek_api_key.as_deref() {
            Some(key) => {
                let llm_config = DeepSeekConfig {
                    api_key: key.to_owned(),
                    base_url: config.llm.base_url.clone(),
                    model: config.llm.model.clone(),
                    max_tokens: config.llm.max_tokens,
                    temperature: config.llm.temperature,
                };
                Some(Arc::new(DeepSeekClient::new(llm_config)?))
            }
            None => {
                tracing::info!("no DeepSeek API key configured, using extractive answers");
                None
            }
        };

        Ok(Self {
            config: Arc::new(config),
            providers: Arc::new(providers),
            llm,
        })
    }
}

/// Body for `POST /api/search`: either one `query` or up to five `queries`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    queries: Option<Vec<String>>,
    #[serde(default)]
    categories: Option<Vec<SearchCategory>>,
}

/// Body for `POST /api/crawl` and query string for `GET /api/crawl`.
#[derive(Debug, Deserialize)]
pub struct CrawlRequest {
    #[serde(default)]
    query: Option<String>,
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/search", post(api_search))
        .route("/api/crawl", post(api_crawl_post).get(api_crawl_get))
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn run(config: BlasterConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(config)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("blaster listening on http://{local_addr}");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

fn error_body(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

/// Normalise the `query`/`queries` pair into a validated list.
fn resolve_queries(request: &SearchRequest) -> Result<Vec<String>, String> {
    let mut queries: Vec<String> = match (&request.query, &request.queries) {
        (Some(q), None) => vec![q.clone()],
        (None, Some(qs)) => qs.clone(),
        (Some(_), Some(_)) => {
            return Err("provide either query or queries, not both".into());
        }
        (None, None) => return Err("query or queries is required".into()),
    };

    queries = queries
        .iter()
        .map(|q| q.trim().to_owned())
        .filter(|q| !q.is_empty())
        .collect();

    if queries.is_empty() {
        return Err("query must not be empty".into());
    }
    if queries.len() > MAX_QUERIES {
        return Err(format!("at most {MAX_QUERIES} queries per request"));
    }
    Ok(queries)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn api_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> impl IntoResponse {
    let queries = match resolve_queries(&request) {
        Ok(queries) => queries,
        Err(message) => return error_body(StatusCode::BAD_REQUEST, message).into_response(),
    };

    let categories = request
        .categories
        .unwrap_or_else(|| SearchCategory::all().to_vec());
    if categories.is_empty() {
        return error_body(StatusCode::BAD_REQUEST, "categories must not be empty")
            .into_response();
    }

    let search_config = state.config.search_config();
    match search_queries(&state.providers, &queries, &categories, &search_config).await {
        Ok(results) => Json(SearchResponsePayload { results }).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "search request failed");
            error_body(StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
    }
}

#[derive(serde::Serialize)]
struct SearchResponsePayload {
    results: Vec<QueryResults>,
}

async fn api_crawl_post(
    State(state): State<AppState>,
    Json(request): Json<CrawlRequest>,
) -> impl IntoResponse {
    crawl_and_answer(state, request.query.unwrap_or_default()).await
}

async fn api_crawl_get(
    State(state): State<AppState>,
    Query(request): Query<CrawlRequest>,
) -> impl IntoResponse {
    crawl_and_answer(state, request.query.unwrap_or_default()).await
}

async fn crawl_and_answer(state: AppState, query: String) -> axum::response::Response {
    if query.trim().is_empty() {
        return error_body(StatusCode::BAD_REQUEST, "query is required").into_response();
    }

    let result: Result<Answer, _> = answer_query(
        &query,
        &state.providers,
        state.llm.as_deref(),
        &state.config,
    )
    .await;

    match result {
        Ok(answer) => Json(answer).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "crawl request failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// Embedded single-page front end: a form that posts to the API and
/// renders the JSON response.
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Blaster</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 720px; margin: 4rem auto; padding: 0 1rem; }
  h1 { text-align: center; letter-spacing: 0.1em; }
  form { display: flex; gap: 0.5rem; }
  input[type=text] { flex: 1; padding: 0.6rem; font-size: 1rem; }
  button { padding: 0.6rem 1.2rem; }
  pre { background: #f4f4f4; padding: 1rem; overflow-x: auto; white-space: pre-wrap; }
</style>
</head>
<body>
<h1>BLASTER</h1>
<form id="f">
  <input type="text" id="q" placeholder="Search the web…" autofocus>
  <button type="submit">Search</button>
  <button type="button" id="answer">Answer</button>
</form>
<pre id="out"></pre>
<script>
const out = document.getElementById('out');
async function call(path, body) {
  out.textContent = '…';
  const res = await fetch(path, {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify(body),
  });
  out.textContent = JSON.stringify(await res.json(), null, 2);
}
document.getElementById('f').addEventListener('submit', (e) => {
  e.preventDefault();
  call('/api/search', {query: document.getElementById('q').value});
});
document.getElementById('answer').addEventListener('click', () => {
  call('/api/crawl', {query: document.getElementById('q').value});
});
</script>
</body>
</html>
"#;
