// Liveness and readiness endpoint handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::handlers::AppState;
use crate::health::DependencyStatus;

/// Handler for GET /healthz - liveness only, no dependency probes
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub checks: ReadyChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyChecks {
    pub database: DependencyStatus,
    pub cache: DependencyStatus,
    pub queue: DependencyStatus,
}

/// Handler for GET /ready - aggregated readiness over configured dependencies
///
/// The database and cache are checked through the live managers; the queue
/// has no long-lived handle and is probed transiently.
pub async fn readiness(State(state): State<AppState>) -> Response {
    let database = if state.db.health_check().await {
        DependencyStatus::Healthy
    } else {
        DependencyStatus::Unhealthy
    };

    #[cfg(feature = "cache-redis")]
    let cache = match &state.cache {
        Some(manager) => {
            if manager.health_check().await {
                DependencyStatus::Healthy
            } else {
                DependencyStatus::Unhealthy
            }
        }
        // Configured but never connected (unreachable at startup)
        None if state.checker.infra().redis_url.is_some() => DependencyStatus::Unhealthy,
        None => DependencyStatus::NotConfigured,
    };
    #[cfg(not(feature = "cache-redis"))]
    let cache = if state.checker.infra().redis_url.is_some() {
        DependencyStatus::NotAvailable
    } else {
        DependencyStatus::NotConfigured
    };

    let queue = state.checker.check_queue().await.status;

    let ready = ![database, cache, queue]
        .iter()
        .any(|status| status.degrades_overall());

    let body = ReadyResponse {
        status: if ready { "ready" } else { "not_ready" },
        checks: ReadyChecks {
            database,
            cache,
            queue,
        },
    };
    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(body)).into_response()
}
