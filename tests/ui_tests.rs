//! Web form tests

mod common;

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        Request, StatusCode,
    },
    response::Response,
    Router,
};
use common::*;
use message_classifier::handlers::ui::SESSION_COOKIE;
use tower::ServiceExt;

async fn get_index(app: Router, cookie: Option<&str>) -> Response {
    let mut request = Request::builder().uri("/");
    if let Some(cookie) = cookie {
        request = request.header(COOKIE, cookie);
    }
    app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap()
}

async fn submit_form(app: Router, form: &str, cookie: Option<&str>) -> Response {
    let mut request = Request::builder()
        .method("POST")
        .uri("/")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        request = request.header(COOKIE, cookie);
    }
    app.oneshot(request.body(Body::from(form.to_string())).unwrap())
        .await
        .unwrap()
}

/// `name=value` pair from the Set-Cookie header
fn session_cookie(response: &Response) -> String {
    let header = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    header.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_index_renders_form_and_sets_cookie() {
    let app = test_app(create_test_settings(&[]), FakeClassifier::ranked(vec![("Normal", 0.9)])).await;

    let response = get_index(app, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = session_cookie(&response);
    assert!(cookie.starts_with(&format!("{}=", SESSION_COOKIE)));

    let page = body_text(response).await;
    assert!(page.contains("Clasificador de Mensajes"));
    assert!(page.contains("<form method=\"post\" action=\"/\">"));
    assert!(page.contains("Urgente, Moderado, Normal"));
    assert!(page.contains("Umbral de confianza:</strong> 50%"));
    assert!(page.contains("fake/zero-shot"));
    assert!(!page.contains("Historial de Clasificaciones"));
}

#[tokio::test]
async fn test_known_session_keeps_cookie() {
    let app = test_app(create_test_settings(&[]), FakeClassifier::ranked(vec![("Normal", 0.9)])).await;
    let cookie = format!("{}=6f1c8a4e-2b8d-4c9a-9f3e-1a2b3c4d5e6f", SESSION_COOKIE);

    let response = get_index(app, Some(&cookie)).await;
    assert!(response.headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_submit_renders_colored_result() {
    for (label, color) in [("Urgente", "red"), ("Moderado", "orange"), ("Normal", "green")] {
        let model = FakeClassifier::ranked(vec![(label, 0.9)]);
        let app = test_app(create_test_settings(&[]), model).await;

        let response = submit_form(app, "message=Hay+un+incendio", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_text(response).await;
        assert!(page.contains(&format!("background-color: {}; opacity: 1;", color)));
        assert!(page.contains(&format!("Categoría: {} | Confianza: 90.0%", label)));
        assert!(!page.contains("La confianza es baja"));
    }
}

#[tokio::test]
async fn test_submit_low_confidence_warning() {
    let model = FakeClassifier::ranked(vec![("Moderado", 0.3), ("Normal", 0.2)]);
    let app = test_app(create_test_settings(&[]), model).await;

    let page = body_text(submit_form(app, "message=Quiz%C3%A1s", None).await).await;

    assert!(page.contains("background-color: orange; opacity: 0.4;"));
    assert!(page.contains("La confianza es baja (30.0%)"));
}

#[tokio::test]
async fn test_submit_error_banner() {
    let model = FakeClassifier::ranked(vec![("Normal", 0.9)]);
    let app = test_app(create_test_settings(&[]), model.clone()).await;

    let page = body_text(submit_form(app, "message=+++", None).await).await;

    assert!(page.contains("🚨 Error: Message cannot be empty"));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_submit_model_failure_banner() {
    let app = test_app(create_test_settings(&[]), FakeClassifier::failing("timeout")).await;

    let page = body_text(submit_form(app, "message=Hola", None).await).await;
    assert!(page.contains("🚨 Error: Error during classification: timeout"));
}

#[tokio::test]
async fn test_history_accumulates_per_session() {
    let settings = create_test_settings(&[]);
    let model = FakeClassifier::ranked(vec![("Urgente", 0.8)]);
    let app = test_app(settings, model).await;

    let first = submit_form(app.clone(), "message=Primero", None).await;
    let cookie = session_cookie(&first);

    let long = "x".repeat(60);
    let page = body_text(submit_form(app.clone(), &format!("message={}", long), Some(&cookie)).await).await;

    assert!(page.contains("Historial de Clasificaciones"));
    assert!(page.contains("Urgente (80.0%): Primero</li>"));
    assert!(page.contains(&format!("Urgente (80.0%): {}...</li>", "x".repeat(50))));

    // Newest first
    let newest = page.find(&format!("{}...</li>", "x".repeat(50))).unwrap();
    let oldest = page.find("Primero</li>").unwrap();
    assert!(newest < oldest);

    // Another session sees nothing
    let page = body_text(get_index(app, None).await).await;
    assert!(!page.contains("Historial de Clasificaciones"));
}

#[tokio::test]
async fn test_failed_submission_not_recorded() {
    let app = test_app(create_test_settings(&[]), FakeClassifier::failing("boom")).await;
    let cookie = format!("{}=6f1c8a4e-2b8d-4c9a-9f3e-1a2b3c4d5e6f", SESSION_COOKIE);

    let page = body_text(submit_form(app, "message=Hola", Some(&cookie)).await).await;
    assert!(!page.contains("Historial de Clasificaciones"));
}
