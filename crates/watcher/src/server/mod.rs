mod event_log;
mod routes;

pub use event_log::EventLog;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::source::EventBlocklist;
use crate::store::StateStore;

/// Shared state for the dashboard handlers. The state store is read as a
/// point-in-time snapshot and never mutated here; the event log is owned
/// by the server and fed through `POST /weatheralerts/log`.
pub struct AppState {
    pub store: Arc<dyn StateStore>,
    pub blocklist: EventBlocklist,
    /// Zone code to display label, for decorating log entries.
    pub zone_labels: HashMap<String, String>,
    pub event_log: Mutex<EventLog>,
}

pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: &Config, store: Arc<dyn StateStore>) -> Self {
        let state = Arc::new(AppState {
            store,
            blocklist: EventBlocklist::new(&config.alerting.global_blocked_events),
            zone_labels: config.alerting.zone_labels.clone(),
            event_log: Mutex::new(EventLog::new()),
        });
        Self { state }
    }

    pub fn build_router(self) -> Router {
        Router::new()
            .route("/health", get(routes::health))
            .route("/metrics", get(routes::metrics))
            .route("/weatheralerts/log", post(routes::log_event))
            .route("/weatheralerts/logs.json", get(routes::logs_json))
            .route("/api/alerts", get(routes::api_alerts))
            // Dashboard data must never be served stale by intermediaries.
            .layer(SetResponseHeaderLayer::overriding(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state)
    }

    pub async fn start(self, addr: &str) -> crate::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.build_router())
            .await
            .map_err(crate::Error::Io)?;
        Ok(())
    }
}
