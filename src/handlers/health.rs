//! Health check handlers
//!
//! Provides application health status check endpoints

use crate::handlers::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version information
    pub version: String,
    /// Timestamp
    pub timestamp: String,
    /// Details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

/// Check result
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDetails {
    /// Loaded model identifier
    pub model: String,
    /// Candidate labels in priority order
    pub candidate_labels: Vec<String>,
    /// Low-confidence threshold
    pub confidence_threshold: f64,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Memory usage (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<MemoryUsage>,
}

/// Memory usage information
#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryUsage {
    /// Used memory in bytes
    pub used_bytes: u64,
    /// Total memory in bytes
    pub total_bytes: u64,
    /// Usage percentage
    pub usage_percent: f64,
}

/// Basic health check
///
/// Returns basic service status information
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing health check");
    Json(build_response(&state, "healthy"))
}

/// Readiness check
///
/// GET /health/ready
/// The model is loaded before the server binds, so a running server is ready
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing readiness check");
    Json(build_response(&state, "ready"))
}

/// Liveness check
///
/// GET /health/live
/// Does not check external dependencies
pub async fn liveness_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing liveness check");
    Json(build_response(&state, "alive"))
}

fn build_response(state: &AppState, status: &str) -> HealthResponse {
    let config = state.classifier.config();

    HealthResponse {
        status: status.to_string(),
        service: crate::NAME.to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        details: Some(HealthDetails {
            model: state.classifier.model_name().to_string(),
            candidate_labels: config.candidate_labels.clone(),
            confidence_threshold: config.confidence_threshold,
            uptime_seconds: state.started_at.elapsed().as_secs(),
            memory_usage: get_memory_usage(),
        }),
    }
}

/// Get memory usage information
fn get_memory_usage() -> Option<MemoryUsage> {
    #[cfg(target_os = "linux")]
    {
        // Read /proc/self/status to get memory information
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            return parse_proc_status(&status);
        }
    }

    None
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_proc_status(status: &str) -> Option<MemoryUsage> {
    let read_kb = |prefix: &str| {
        status
            .lines()
            .find(|line| line.starts_with(prefix))
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|kb| kb.parse::<u64>().ok())
            .map(|kb| kb * 1024)
    };

    let used = read_kb("VmRSS:")?;
    let total = read_kb("VmSize:")?;
    let usage_percent = if total > 0 {
        (used as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    Some(MemoryUsage {
        used_bytes: used,
        total_bytes: total,
        usage_percent,
    })
}
