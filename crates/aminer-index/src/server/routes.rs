//! HTTP routes over the query service.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::QueryError;
use crate::formatters::{
    author_detail_json, format_author_markdown, format_subject_markdown, subject_hits_json,
};
use crate::models::{AuthorDetailInput, ResponseFormat, SubjectSearchInput};
use crate::query::QueryService;

/// Create the HTTP router.
pub fn create_router(service: QueryService) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/search", get(search))
        .route("/getinfo", get(get_info))
        .route("/subjects", get(list_subjects))
        .route("/cache/invalidate", post(invalidate_cache))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(service))
}

/// A query failure rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(QueryError);

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            QueryError::NotFound { .. } => StatusCode::NOT_FOUND,
            QueryError::Validation { .. } => StatusCode::BAD_REQUEST,
            QueryError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            QueryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Query failed");
        }

        let body = serde_json::json!({ "error": self.0.to_user_message() });
        (status, Json(body)).into_response()
    }
}

fn markdown(body: String) -> Response {
    ([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], body).into_response()
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "aminer-index",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Ready once an ingestion run has completed and no later run is underway.
async fn readiness_check(State(service): State<Arc<QueryService>>) -> Result<Response, ApiError> {
    let response = match service.manifest().await? {
        Some(manifest) => Json(serde_json::json!({
            "status": "ready",
            "service": "aminer-index",
            "version": env!("CARGO_PKG_VERSION"),
            "manifest": manifest
        }))
        .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "not ready",
                "reason": "no completed ingestion"
            })),
        )
            .into_response(),
    };
    Ok(response)
}

async fn search(
    State(service): State<Arc<QueryService>>,
    Query(input): Query<SubjectSearchInput>,
) -> Result<Response, ApiError> {
    let subject = input.validated_subject()?;
    tracing::debug!(subject, limit = ?input.limit, "Subject search");

    let hits = service.search_subject(subject, input.limit).await?;
    Ok(match input.format {
        ResponseFormat::Markdown => markdown(format_subject_markdown(subject, &hits)),
        ResponseFormat::Json => Json(subject_hits_json(subject, &hits)).into_response(),
    })
}

async fn get_info(
    State(service): State<Arc<QueryService>>,
    Query(input): Query<AuthorDetailInput>,
) -> Result<Response, ApiError> {
    let id = input.validated_index()?;
    tracing::debug!(id, "Author detail");

    let detail = service.get_author_detail(id).await?;
    Ok(match input.format {
        ResponseFormat::Markdown => markdown(format_author_markdown(&detail)),
        ResponseFormat::Json => Json(author_detail_json(&detail)).into_response(),
    })
}

async fn list_subjects(State(service): State<Arc<QueryService>>) -> Result<Response, ApiError> {
    let subjects = service.list_subjects().await?;
    Ok(Json(serde_json::json!({
        "total": subjects.len(),
        "subjects": subjects
    }))
    .into_response())
}

async fn invalidate_cache(State(service): State<Arc<QueryService>>) -> impl IntoResponse {
    service.invalidate_cache();
    Json(serde_json::json!({ "status": "invalidated" }))
}
