//! Shared test fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request},
    response::Response,
    Router,
};
use message_classifier::config::Settings;
use message_classifier::handlers::create_router;
use message_classifier::models::RankedLabels;
use message_classifier::services::ZeroShotClassifier;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// What the fake model does when called
#[derive(Debug, Clone)]
pub enum FakeOutput {
    Ranked(Vec<(&'static str, f64)>),
    Fail(&'static str),
    Panic,
}

/// Counting model double
pub struct FakeClassifier {
    output: FakeOutput,
    calls: AtomicUsize,
    last_text: Mutex<Option<String>>,
}

impl FakeClassifier {
    pub fn new(output: FakeOutput) -> Arc<Self> {
        Arc::new(Self {
            output,
            calls: AtomicUsize::new(0),
            last_text: Mutex::new(None),
        })
    }

    pub fn ranked(pairs: Vec<(&'static str, f64)>) -> Arc<Self> {
        Self::new(FakeOutput::Ranked(pairs))
    }

    pub fn failing(message: &'static str) -> Arc<Self> {
        Self::new(FakeOutput::Fail(message))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_text(&self) -> Option<String> {
        self.last_text.lock().unwrap().clone()
    }
}

#[async_trait]
impl ZeroShotClassifier for FakeClassifier {
    fn name(&self) -> &str {
        "fake/zero-shot"
    }

    async fn classify(&self, text: &str, _candidate_labels: &[String]) -> anyhow::Result<RankedLabels> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text.lock().unwrap() = Some(text.to_string());

        match &self.output {
            FakeOutput::Ranked(pairs) => Ok(RankedLabels {
                labels: pairs.iter().map(|(l, _)| l.to_string()).collect(),
                scores: pairs.iter().map(|(_, s)| *s).collect(),
            }),
            FakeOutput::Fail(message) => Err(anyhow::anyhow!(*message)),
            FakeOutput::Panic => panic!("model exploded"),
        }
    }
}

/// Create test settings with default values plus `vars`
pub fn create_test_settings(vars: &[(&str, &str)]) -> Settings {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|key| vars.get(key).cloned()).expect("Failed to create test settings")
}

pub async fn test_app(settings: Settings, model: Arc<FakeClassifier>) -> Router {
    create_router(settings, model).await.expect("Failed to create router")
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// In-memory sink for formatted log lines
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscriber writing plain-text events at debug and above into this capture
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let sink = self.clone();
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
