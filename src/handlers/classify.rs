//! Classification API handler
//!
//! POST /classify

use crate::config::Settings;
use crate::handlers::AppState;
use crate::models::classification::{ClassificationRequest, ClassificationResponse};
use crate::utils::error::{handle_error, ClassificationError};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;

/// Handle classification requests
///
/// Always answers with a classification-shaped body. Failures carry
/// `classification = "Error"`, `confidence = 0.0` and the `ErrorResult` in
/// `details`, with status 200 unless strict error statuses are enabled.
pub async fn handle_classify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClassificationRequest>, JsonRejection>,
) -> Response {
    let outcome = match payload {
        Ok(Json(request)) => state.classifier.classify(&request.message).await,
        Err(rejection) => Err(ClassificationError::invalid_input(
            "Request body must be a JSON object with a 'message' string",
        )
        .with_detail("error", rejection.body_text())),
    };

    match outcome {
        Ok(result) => {
            debug!("Request processing completed");
            Json(ClassificationResponse::from(result)).into_response()
        }
        Err(err) => error_response(&state.settings, &err),
    }
}

/// Map an error through `handle_error` into the HTTP response
pub fn error_response(settings: &Settings, err: &ClassificationError) -> Response {
    let status = if settings.server.strict_error_status {
        err.status_code()
    } else {
        StatusCode::OK
    };

    let error_result = handle_error(err, settings.debug_mode);
    (status, Json(ClassificationResponse::from_error(error_result))).into_response()
}
