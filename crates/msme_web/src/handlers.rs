use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use msme_agents::{detect_intent, AnalysisContext};
use msme_core::store::Filter;
use msme_core::{Company, Error, Intent};
use msme_ingest::{CsvLoader, LoadReport};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::AppState;

/// Error wrapper mapping component failures to HTTP statuses. Nothing
/// here terminates the process; degraded dependencies become 503s.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NewsFetch(_) | Error::Agent(_) | Error::Configuration(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
        } else {
            warn!(error = %self.0, status = %status, "request degraded");
        }
        (status, Json(json!({"error": self.0.to_string()}))).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

pub async fn load_data(State(state): State<Arc<AppState>>) -> ApiResult {
    let mut report = LoadReport::default();
    for path in &state.config.company_csv_paths {
        report.merge(CsvLoader::load(&state.repo, path).await?);
    }
    Ok(Json(json!({
        "loaded": report.loaded,
        "skipped": report.skipped,
    })))
}

#[derive(Debug, Deserialize)]
pub struct FetchNewsRequest {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

pub async fn fetch_news(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FetchNewsRequest>,
) -> ApiResult {
    let query = body
        .query
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| "MSME business manufacturing".to_string());
    let country = body.country.unwrap_or_else(|| "in".to_string());

    let (articles, stored) = state.news.ingest(&state.repo, &query, &country).await?;
    Ok(Json(json!({
        "articles": articles,
        "stored": stored,
    })))
}

pub async fn praison_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let runtime = state.orchestrator.runtime();
    // A successful probe clears an earlier degradation.
    if runtime.configured() && !runtime.available() {
        runtime.probe().await;
    }
    let available = runtime.available();
    Json(json!({
        "available": available,
        "openai_key_configured": runtime.configured(),
        "agents": if available {
            msme_core::AgentRole::all().iter().map(|r| r.name()).collect::<Vec<_>>()
        } else {
            Vec::new()
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    query: String,
}

pub async fn chat(State(state): State<Arc<AppState>>, Json(body): Json<ChatRequest>) -> ApiResult {
    let query = body.query.trim().to_string();
    if query.is_empty() {
        return Err(Error::Validation("no query provided".to_string()).into());
    }

    if let Some(cached) = state
        .repo
        .cached_response(&query, state.config.cache_ttl)
        .await?
    {
        // An agent-path entry is stale once the runtime degrades; a
        // recomputed answer must say used_fallback: true.
        let agent_backed = cached.get("used_fallback").and_then(Value::as_bool) == Some(false);
        if agent_backed && !state.orchestrator.runtime().available() {
            info!(query, "cached agent response is stale in fallback mode, recomputing");
        } else {
            info!(query, "serving cached chat response");
            return Ok(Json(cached));
        }
    }

    let intent = detect_intent(&query);
    let companies = state.repo.companies(&Filter::new(), 50).await?;
    let mut articles = state.repo.latest_articles(10).await?;

    // Auto-fetch when a news question finds a nearly empty store.
    if intent == Intent::News && articles.len() < 3 && state.news.configured() {
        if let Err(e) = state.news.ingest(&state.repo, &query, "in").await {
            warn!(error = %e, "auto-fetch failed, continuing with stored articles");
        }
        articles = state.repo.latest_articles(10).await?;
    }

    let ctx = AnalysisContext {
        query: &query,
        companies: &companies,
        articles: &articles,
    };
    let outcome = state.orchestrator.analyze(intent, &ctx).await;
    let charts = msme_charts::select(intent, &outcome.insights, &outcome.ranked_companies, &articles);

    let top_companies: Vec<&Company> = outcome.ranked_companies.iter().take(5).collect();
    let response = json!({
        "narrative": outcome.narrative,
        "scores": {
            "financial_health": outcome.financial_health,
            "sentiment": outcome.sentiment,
            "confidence": outcome.confidence,
        },
        "chart_specs": charts,
        "companies": top_companies,
        "articles": articles,
        "intent": intent,
        "used_fallback": outcome.used_fallback,
    });

    state.repo.store_response(&query, &response).await?;
    Ok(Json(response))
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardFilters {
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    export: Option<String>,
    #[serde(default)]
    min_score: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardRequest {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    filters: Option<DashboardFilters>,
}

fn performance_score(company: &Company) -> u32 {
    match company.performance.as_deref() {
        Some("Strong") => 80,
        Some("Good") => 60,
        Some("Medium") => 40,
        Some("Developing") => 20,
        _ => 0,
    }
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DashboardRequest>,
) -> ApiResult {
    let query = body.query.unwrap_or_else(|| "General Analysis".to_string());
    let filters = body.filters.unwrap_or_default();

    let mut filter = Filter::new();
    if let Some(location) = &filters.location {
        filter = filter.contains("location", location);
    }
    if let Some(sector) = &filters.sector {
        filter = filter.contains("sector", sector);
    }
    if let Some(export) = &filters.export {
        filter = filter.contains("export_markets", export);
    }

    let mut companies = state.repo.companies(&filter, 100).await?;
    if let Some(min_score) = filters.min_score {
        companies.retain(|c| performance_score(c) >= min_score);
    }
    let articles = state.repo.latest_articles(10).await?;

    let ctx = AnalysisContext {
        query: &query,
        companies: &companies,
        articles: &articles,
    };
    let outcome = state.orchestrator.analyze(Intent::Dashboard, &ctx).await;
    let charts = msme_charts::select(Intent::Dashboard, &outcome.insights, &companies, &articles);

    Ok(Json(json!({
        "charts": charts,
        "companies": companies,
        "narrative": outcome.narrative,
        "used_fallback": outcome.used_fallback,
    })))
}

pub async fn dashboard_filters(State(state): State<Arc<AppState>>) -> ApiResult {
    let companies = state.repo.all_companies().await?;

    let mut locations: Vec<String> = companies
        .iter()
        .map(|c| c.location.clone())
        .filter(|l| !l.is_empty())
        .collect();
    let mut sectors: Vec<String> = companies
        .iter()
        .map(|c| c.sector.clone())
        .filter(|s| !s.is_empty())
        .collect();
    let mut export_markets: Vec<String> = companies
        .iter()
        .flat_map(|c| c.export_markets.iter().cloned())
        .collect();

    for list in [&mut locations, &mut sectors, &mut export_markets] {
        list.sort();
        list.dedup();
    }

    Ok(Json(json!({
        "filters": {
            "locations": locations,
            "sectors": sectors,
            "export_markets": export_markets,
        }
    })))
}

pub async fn companies(State(state): State<Arc<AppState>>) -> ApiResult {
    let companies = state.repo.all_companies().await?;
    Ok(Json(json!({ "companies": companies, "total": companies.len() })))
}

pub async fn latest_news(State(state): State<Arc<AppState>>) -> ApiResult {
    let articles = state.repo.latest_articles(10).await?;
    Ok(Json(json!({ "articles": articles })))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.repo.store().ping().await {
        Ok(()) => {
            let counts = json!({
                "companies": state.repo.company_count().await.ok(),
                "news_articles": state.repo.article_count().await.ok(),
            });
            Json(json!({
                "store_connected": true,
                "db_name": state.config.db_name,
                "agent_available": state.orchestrator.runtime().available(),
                "counts": counts,
            }))
            .into_response()
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"store_connected": false, "error": e.to_string()})),
        )
            .into_response(),
    }
}
