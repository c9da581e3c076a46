use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;

use crate::pipeline::{Pipeline, PipelineError};

use super::models::{SearchParams, SearchResponse};

pub const WELCOME_TEXT: &str = "Welcome to gleaner";

impl PipelineError {
    pub fn status(&self) -> StatusCode {
        match self {
            PipelineError::BadRequest => StatusCode::BAD_REQUEST,
            PipelineError::Search(_) | PipelineError::Fetch(_) | PipelineError::Summarize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

pub async fn welcome_handler() -> &'static str {
    WELCOME_TEXT
}

pub async fn health_handler() -> &'static str {
    "ok"
}

pub async fn search_handler(
    State(pipeline): State<Arc<Pipeline>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, PipelineError> {
    let start = Instant::now();
    let query = params.query.unwrap_or_default();

    let response = pipeline.run(&query).await.map_err(|e| {
        tracing::warn!(
            status = e.status().as_u16(),
            stage = %e.stage(),
            "search request failed: {}",
            e
        );
        e
    })?;

    tracing::info!(
        links = response.links.len(),
        processing_time_ms = start.elapsed().as_millis() as u64,
        "search request served"
    );
    Ok(Json(response))
}
