use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AnalysisId, HistorySort};
use super::repository::AnalysisRepository;
use super::service::{AnalysisService, AnalysisServiceError};
use crate::analysis::CollectedSignals;
use crate::config::MAX_HISTORY_LIMIT;
use crate::error::AppError;

/// Router builder exposing analysis, scoring and history endpoints.
pub fn analysis_router<R>(service: Arc<AnalysisService<R>>) -> Router
where
    R: AnalysisRepository + 'static,
{
    Router::new()
        .route("/api/analyze", post(analyze_handler::<R>))
        .route("/api/score", post(score_handler::<R>))
        .route(
            "/api/history",
            get(history_handler::<R>).delete(clear_history_handler::<R>),
        )
        .route(
            "/api/analysis/:analysis_id",
            get(analysis_handler::<R>).delete(delete_analysis_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeRequest {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HistoryParams {
    search: Option<String>,
    sort: Option<HistorySort>,
    limit: Option<usize>,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

fn service_error_response(error: AnalysisServiceError) -> Response {
    AppError::from(error).into_response()
}

pub(crate) async fn analyze_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    let Some(url) = request.url.filter(|url| !url.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "URL is required");
    };

    match service.analyze(&url).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    Json(signals): Json<CollectedSignals>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    let assessment = service.score(&signals);
    (StatusCode::OK, Json(assessment)).into_response()
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    Query(params): Query<HistoryParams>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    let mut query = service.default_query();
    if let Some(search) = params.search {
        query = query.with_search(search);
    }
    if let Some(sort) = params.sort {
        query = query.with_sort(sort);
    }
    if let Some(limit) = params.limit {
        query.limit = limit.clamp(1, MAX_HISTORY_LIMIT);
    }

    match service.history(&query) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn clear_history_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match service.clear() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn analysis_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    Path(analysis_id): Path<String>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match service.get(&AnalysisId(analysis_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn delete_analysis_handler<R>(
    State(service): State<Arc<AnalysisService<R>>>,
    Path(analysis_id): Path<String>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match service.delete(&AnalysisId(analysis_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => service_error_response(err),
    }
}
