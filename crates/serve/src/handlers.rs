//! HTTP handlers for the QuestSearch server

use std::{sync::Arc, time::Instant};

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use questsearch_core::{ApiResponse, Environment, QuestionStore, SearchPolicy, SearchService};
use serde::{Deserialize, Serialize};

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "QuestSearch API";

/// Plain-text banner served at `/`
pub const BANNER: &str = "QuestSearch Backend API";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub search: SearchService,
    pub environment: Environment,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn QuestionStore>, policy: SearchPolicy, environment: Environment) -> Self {
        Self {
            search: SearchService::new(store, policy),
            environment,
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &Arc<dyn QuestionStore> {
        self.search.store()
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub database: String,
    pub backend: String,
    pub environment: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check: 200 when the store answers a ping, 503 otherwise
pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let ping = state.store().ping().await;

    let (code, status, database, error) = match ping {
        Ok(()) => (StatusCode::OK, "healthy", "connected", None),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "unhealthy",
                "disconnected",
                (!state.environment.is_production()).then(|| e.to_string()),
            )
        }
    };

    let body = HealthResponse {
        status: status.to_string(),
        service: SERVICE_NAME.to_string(),
        database: database.to_string(),
        backend: state.store().backend_name().to_string(),
        environment: state.environment.to_string(),
        version: crate::VERSION.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
        error,
    };

    (code, Json(body))
}

/// Root banner
pub async fn handle_root() -> &'static str {
    BANNER
}

/// Fallback for unknown routes
pub async fn handle_not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!("No route for {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::failure(
            format!("Route {} not found", uri.path()),
            None,
        )),
    )
}
