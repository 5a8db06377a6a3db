//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses, keyed `store:<entity>`
    pub dependencies: BTreeMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check (readiness probe)
///
/// Returns 200 OK when every store answers a count, 503 Service Unavailable
/// otherwise.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let mut dependencies = BTreeMap::new();
    let mut all_ready = true;

    for probe in state.stores().probe().await {
        let status = match probe.result {
            Ok(_) => DependencyStatus {
                healthy: true,
                message: Some(format!("{} store reachable", probe.backend)),
            },
            Err(e) => {
                tracing::error!(entity = probe.entity, backend = probe.backend, "Store health check failed: {}", e);
                all_ready = false;
                DependencyStatus {
                    healthy: false,
                    message: Some(format!("{} store unavailable", probe.backend)),
                }
            }
        };
        dependencies.insert(format!("store:{}", probe.entity), status);
    }

    let status = if all_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = ReadinessResponse {
        ready: all_ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    (status, Json(response))
}
