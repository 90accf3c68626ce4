use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::metrics::gather_metrics;
use crate::model::{EventRecord, TrackedAlert};
use crate::server::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn metrics() -> String {
    gather_metrics()
}

/// Ingest payload for `POST /weatheralerts/log`. Everything is optional;
/// the poller is the usual producer but the endpoint tolerates sparse
/// hand-made payloads the way the original dashboard did.
#[derive(Debug, Deserialize)]
pub struct LogEventPayload {
    pub timestamp: Option<DateTime<Utc>>,
    pub county: Option<String>,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub description: String,
}

pub async fn log_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LogEventPayload>,
) -> StatusCode {
    if state.blocklist.blocks(&payload.event) {
        info!("Blocked log event: {}", payload.event);
        return StatusCode::NO_CONTENT;
    }

    let record = EventRecord {
        timestamp: payload.timestamp.unwrap_or_else(Utc::now),
        county: payload.county.unwrap_or_else(|| "UNKNOWN".to_string()),
        event: payload.event,
        description: payload.description,
    };
    info!("Received log event: {record:?}");

    let mut log = state.event_log.lock().expect("event log poisoned");
    log.prune(Utc::now());
    log.append(record);
    StatusCode::NO_CONTENT
}

/// Event record as exposed by `GET /weatheralerts/logs.json`: the stored
/// record plus the configured display label for its zone.
#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub county: String,
    pub county_label: String,
    pub event: String,
    pub description: String,
}

pub async fn logs_json(State(state): State<Arc<AppState>>) -> Json<Vec<LogEntry>> {
    let mut log = state.event_log.lock().expect("event log poisoned");
    log.prune(Utc::now());
    let entries = log
        .entries()
        .iter()
        .map(|record| LogEntry {
            timestamp: record.timestamp,
            county: record.county.clone(),
            county_label: state
                .zone_labels
                .get(&record.county)
                .cloned()
                .unwrap_or_else(|| record.county.clone()),
            event: record.event.clone(),
            description: record.description.clone(),
        })
        .collect();
    Json(entries)
}

/// Point-in-time view of the last persisted snapshot. Served from the
/// state store rather than re-fetching the feed per request.
pub async fn api_alerts(State(state): State<Arc<AppState>>) -> Json<Vec<TrackedAlert>> {
    Json(state.store.load())
}
