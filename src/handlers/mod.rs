//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod classify;
pub mod health;
pub mod ui;

use crate::config::settings::{SecurityConfig, Settings};
use crate::middleware::logging::request_logging_middleware;
use crate::models::classification::ClassificationResponse;
use crate::services::{HistoryStore, MessageClassifier, ZeroShotClassifier};
use crate::utils::error::{handle_error, ClassificationError};
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as CorsAny, CorsLayer},
    trace::TraceLayer,
};

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    pub classifier: MessageClassifier,
    pub history: HistoryStore,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings, model: Arc<dyn ZeroShotClassifier>) -> Self {
        let classifier = MessageClassifier::new(model, settings.classification.clone());
        Self {
            settings,
            classifier,
            history: HistoryStore::new(),
            started_at: Instant::now(),
        }
    }
}

/// Create application router
///
/// `model` is the handle loaded at start-up; tests pass a double.
pub async fn create_router(settings: Settings, model: Arc<dyn ZeroShotClassifier>) -> Result<Router> {
    let debug_mode = settings.debug_mode;
    let body_limit = settings.request.max_request_size;
    let cors = if settings.security.cors_enabled {
        Some(cors_layer(&settings.security)?)
    } else {
        None
    };

    // Create application state
    let app_state = Arc::new(AppState::new(settings, model));

    // Create middleware stack
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_logging_middleware))
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
            panic_response(panic, debug_mode)
        }));

    // Create routes
    let mut router = Router::new()
        .route("/", get(ui::index).post(ui::submit))
        .route("/classify", post(classify::handle_classify))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
        .layer(middleware_stack);

    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    Ok(router)
}

fn cors_layer(security: &SecurityConfig) -> Result<CorsLayer> {
    let origin = if security.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins = security
            .allowed_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin: {}", o)))
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(CorsAny)
        .allow_headers(CorsAny))
}

/// Render a handler panic as the error-shaped classification body
fn panic_response(panic: Box<dyn Any + Send + 'static>, debug_mode: bool) -> Response {
    let cause = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    let err = ClassificationError::unexpected("Request handler panicked").with_detail("error", cause);
    let error_result = handle_error(&err, debug_mode);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ClassificationResponse::from_error(error_result)),
    )
        .into_response()
}
