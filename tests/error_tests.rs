//! Error handling module tests

mod common;

use axum::http::StatusCode;
use message_classifier::models::ClassificationResponse;
use common::LogCapture;
use message_classifier::utils::error::*;

#[test]
fn test_error_status_codes() {
    let test_cases = vec![
        (ClassificationError::model_loading("test"), StatusCode::SERVICE_UNAVAILABLE),
        (ClassificationError::invalid_input("test"), StatusCode::BAD_REQUEST),
        (ClassificationError::api("test"), StatusCode::BAD_GATEWAY),
        (ClassificationError::configuration("test"), StatusCode::INTERNAL_SERVER_ERROR),
        (ClassificationError::unexpected("test"), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, expected_status) in test_cases {
        assert_eq!(error.status_code(), expected_status);
    }
}

#[test]
fn test_error_wire_tags() {
    let test_cases = vec![
        (ErrorKind::ModelLoading, "ModelLoadingError"),
        (ErrorKind::InvalidInput, "InvalidInputError"),
        (ErrorKind::Api, "APIError"),
        (ErrorKind::Configuration, "ConfigurationError"),
        (ErrorKind::Unexpected, "UnexpectedError"),
    ];

    for (kind, expected) in test_cases {
        assert_eq!(kind.as_str(), expected);
        assert_eq!(serde_json::to_value(kind).unwrap(), expected);
        let parsed: ErrorKind = serde_json::from_value(serde_json::json!(expected)).unwrap();
        assert_eq!(parsed, kind);
    }
}

#[test]
fn test_error_display_is_message() {
    let error = ClassificationError::invalid_input("Message cannot be empty").with_detail("length", 0);
    assert_eq!(error.to_string(), "Message cannot be empty");
    assert_eq!(error.details()["length"], 0);
}

#[test]
fn test_handle_error_keeps_tag_and_details() {
    let error = ClassificationError::api("Upstream refused")
        .with_detail("status", 503)
        .with_detail("url", "http://localhost/models/x");

    let result = handle_error(&error, true);

    assert_eq!(result.error_kind, ErrorKind::Api);
    assert_eq!(result.message, "Upstream refused");
    assert_eq!(result.details["status"], 503);
    assert_eq!(result.details["url"], "http://localhost/models/x");
    assert!(result.debug_mode);
}

#[test]
fn test_handle_error_maps_foreign_errors() {
    let parse_error = "abc".parse::<u32>().unwrap_err();
    let result = handle_error(&parse_error, false);

    assert_eq!(result.error_kind, ErrorKind::Unexpected);
    assert_eq!(result.message, parse_error.to_string());
    assert!(result.details.is_empty());

    let anyhow_error = anyhow::anyhow!("socket closed");
    let result = handle_error(&*anyhow_error, false);
    assert_eq!(result.error_kind, ErrorKind::Unexpected);
    assert_eq!(result.message, "socket closed");
}

#[test]
fn test_handle_error_twice_is_identical() {
    let error = ClassificationError::unexpected("Error during classification: boom")
        .with_detail("error", "boom");

    let first = handle_error(&error, false);
    let second = handle_error(&error, false);
    assert_eq!(first, second);
}

#[test]
fn test_error_result_serialization() {
    let error = ClassificationError::invalid_input("Message cannot be empty");
    let response = ClassificationResponse::from_error(handle_error(&error, false));

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "classification": "Error",
            "confidence": 0.0,
            "details": {
                "error": "InvalidInputError",
                "message": "Message cannot be empty",
                "details": {},
                "debug_mode": false
            }
        })
    );

    let parsed: ClassificationResponse = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.error().unwrap().error_kind, ErrorKind::InvalidInput);
}

#[test]
fn test_handle_error_logs_critical_with_stack_trace_each_call() {
    let logs = LogCapture::new();
    let error = ClassificationError::unexpected("boom").with_detail("error", "x");

    tracing::subscriber::with_default(logs.subscriber(), || {
        handle_error(&error, false);
        handle_error(&error, false);
    });

    let output = logs.contents();
    assert_eq!(output.matches("severity=\"CRITICAL\"").count(), 2, "{}", output);
    assert_eq!(output.matches("UnexpectedError: boom").count(), 2, "{}", output);
    assert!(output.contains(r#"details={"error":"x"}"#), "{}", output);

    // A frame list follows the message even without RUST_BACKTRACE
    assert!(output.contains("0: "), "{}", output);
    assert!(output.lines().count() > 4, "{}", output);
}
