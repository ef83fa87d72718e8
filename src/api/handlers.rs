use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::enrich::{AccessEvent, MetricSink, Tagger};
use crate::query::{compile, QueryDescriptor, TrafficParams};
use crate::storage::{AccessLogRow, LogStore, TrafficRow};

pub struct AppState {
    pub tagger: Tagger,
    pub store: Arc<dyn LogStore>,
    pub sink: Arc<dyn MetricSink>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct TrafficResponse {
    pub rows: Vec<TrafficRow>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct IngestResponse {
    pub accepted: usize,
}

/// Run one traffic aggregation
pub async fn get_traffic(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrafficParams>,
) -> Result<Json<TrafficResponse>, (StatusCode, Json<ErrorResponse>)> {
    let descriptor = QueryDescriptor::from_params(&params).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    let sql = compile(&descriptor);
    tracing::debug!(%sql, "Compiled traffic query");

    match state.store.traffic(&sql).await {
        Ok(rows) => {
            let total = rows.len();
            Ok(Json(TrafficResponse { rows, total }))
        }
        Err(e) => {
            // the cause stays server-side; callers get a generic failure
            tracing::error!("Traffic query failed: {e:#}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Query was unsuccessful".to_string(),
                }),
            ))
        }
    }
}

/// Enrich and persist a batch of access events
pub async fn ingest_events(
    State(state): State<Arc<AppState>>,
    Json(events): Json<Vec<AccessEvent>>,
) -> Result<Json<IngestResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut accepted = 0;

    for event in &events {
        let point = state.tagger.point(event);
        let row = AccessLogRow::from_event(event, &point.tags);

        if let Err(e) = state.store.insert(row).await {
            tracing::error!("Failed to store enriched event: {e:#}");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to store events".to_string(),
                }),
            ));
        }

        // sink delivery is best-effort; the row is already stored
        if let Err(e) = state.sink.write(point).await {
            tracing::warn!("Metric sink rejected point: {e:#}");
        }

        accepted += 1;
    }

    Ok(Json(IngestResponse { accepted }))
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
