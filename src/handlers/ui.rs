//! Web form handlers
//!
//! GET / renders the form, POST / classifies the submitted message and renders
//! the result together with the session history

use crate::handlers::AppState;
use crate::models::classification::{severity_color, ClassificationResult};
use crate::services::HistoryEntry;
use crate::utils::error::{handle_error, ClassificationError, ErrorResult};
use axum::{
    extract::{rejection::FormRejection, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    response::{Html, IntoResponse, Response},
    Form,
};
use html_escape::encode_text;
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;
use uuid::Uuid;

/// Cookie holding the history session id
pub const SESSION_COOKIE: &str = "mc_session";

/// Characters of each message shown in the history list
const HISTORY_PREVIEW_CHARS: usize = 50;

/// Submitted form fields
#[derive(Debug, Deserialize)]
pub struct ClassifyForm {
    #[serde(default)]
    pub message: String,
}

/// Outcome of a form submission
#[derive(Debug, Clone)]
pub enum FormOutcome {
    Success(ClassificationResult),
    Failure(ErrorResult),
}

/// Everything the page shows
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub candidate_labels: &'a [String],
    pub confidence_threshold: f64,
    pub model: &'a str,
    pub message: &'a str,
    pub outcome: Option<FormOutcome>,
    pub history: Vec<HistoryEntry>,
}

/// GET /
pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (session_id, is_new) = session_from_headers(&headers);
    let config = state.classifier.config();

    let page = render_page(&PageView {
        candidate_labels: &config.candidate_labels,
        confidence_threshold: config.confidence_threshold,
        model: state.classifier.model_name(),
        message: "",
        outcome: None,
        history: state.history.entries(session_id),
    });

    with_session_cookie(Html(page).into_response(), session_id, is_new)
}

/// POST /
pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<ClassifyForm>, FormRejection>,
) -> Response {
    let (session_id, is_new) = session_from_headers(&headers);
    let debug_mode = state.settings.debug_mode;

    let (message, classified) = match form {
        Ok(Form(form)) => {
            let classified = state.classifier.classify(&form.message).await;
            (form.message, classified)
        }
        Err(rejection) => (
            String::new(),
            Err(ClassificationError::invalid_input("Form must contain a 'message' field")
                .with_detail("error", rejection.body_text())),
        ),
    };

    let outcome = match classified {
        Ok(result) => {
            let max_length = state.classifier.config().max_length;
            state
                .history
                .append(session_id, history_entry(&message, &result, max_length));
            FormOutcome::Success(result)
        }
        Err(err) => FormOutcome::Failure(handle_error(&err, debug_mode)),
    };

    let config = state.classifier.config();
    let page = render_page(&PageView {
        candidate_labels: &config.candidate_labels,
        confidence_threshold: config.confidence_threshold,
        model: state.classifier.model_name(),
        message: &message,
        outcome: Some(outcome),
        history: state.history.entries(session_id),
    });

    with_session_cookie(Html(page).into_response(), session_id, is_new)
}

/// History record of a successful classification
///
/// Keeps only the text the model saw, at most `max_length` characters.
pub fn history_entry(message: &str, result: &ClassificationResult, max_length: usize) -> HistoryEntry {
    HistoryEntry {
        timestamp: chrono::Utc::now(),
        message: message.chars().take(max_length).collect(),
        classification: result.classification.clone(),
        confidence: result.confidence,
    }
}

/// Read the session id from the cookie, or start a new session
pub fn session_from_headers(headers: &HeaderMap) -> (Uuid, bool) {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(|id| (id, false))
        .unwrap_or_else(|| (Uuid::new_v4(), true))
}

fn with_session_cookie(mut response: Response, session_id: Uuid, is_new: bool) -> Response {
    if is_new {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, session_id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(SET_COOKIE, value);
        }
    }
    response
}

/// Render the full page
pub fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::new();

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Clasificador de Mensajes</title>\n\
         <style>\n\
         body { font-family: sans-serif; display: flex; gap: 2rem; margin: 2rem; }\n\
         main { flex: 1; max-width: 40rem; }\n\
         aside { width: 16rem; }\n\
         textarea { width: 100%; height: 12rem; }\n\
         .result { padding: 15px; border-radius: 8px; color: white; font-weight: bold; }\n\
         .warning { background: #fff3cd; padding: 10px; border-radius: 8px; margin-top: 10px; }\n\
         .error { background: #f8d7da; padding: 10px; border-radius: 8px; }\n\
         </style>\n</head>\n<body>\n<main>\n\
         <h1>🚨 Clasificador de Mensajes</h1>\n\
         <p>Ingresa un mensaje y obtén su clasificación en tiempo real.</p>\n",
    );

    let _ = write!(
        html,
        "<form method=\"post\" action=\"/\">\n\
         <label for=\"message\">Escribe tu mensaje aquí:</label>\n\
         <textarea id=\"message\" name=\"message\" placeholder=\"Ej: Hay un incendio en la oficina\">{}</textarea>\n\
         <button type=\"submit\">Clasificar</button>\n</form>\n",
        encode_text(view.message)
    );

    match &view.outcome {
        Some(FormOutcome::Success(result)) => {
            render_result(&mut html, result, view.confidence_threshold)
        }
        Some(FormOutcome::Failure(error)) => {
            let _ = write!(
                html,
                "<div class=\"error\" data-error=\"{}\">🚨 Error: {}</div>\n",
                error.error_kind,
                encode_text(&error.message)
            );
        }
        None => {}
    }

    if !view.history.is_empty() {
        html.push_str("<hr>\n<h2>📜 Historial de Clasificaciones</h2>\n<ul class=\"history\">\n");
        for entry in &view.history {
            let _ = write!(
                html,
                "<li>{} | {} ({:.1}%): {}</li>\n",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                encode_text(&entry.classification),
                entry.confidence * 100.0,
                encode_text(&preview(&entry.message))
            );
        }
        html.push_str("</ul>\n");
    }

    let _ = write!(
        html,
        "</main>\n<aside>\n<h2>🔧 Configuración</h2>\n\
         <p><strong>Etiquetas disponibles:</strong> {}</p>\n\
         <p><strong>Umbral de confianza:</strong> {:.0}%</p>\n\
         <p><strong>Modelo:</strong> {}</p>\n\
         </aside>\n</body>\n</html>\n",
        encode_text(&view.candidate_labels.join(", ")),
        view.confidence_threshold * 100.0,
        encode_text(view.model)
    );

    html
}

fn render_result(html: &mut String, result: &ClassificationResult, threshold: f64) {
    let low_confidence = result.is_low_confidence(threshold);
    let opacity = if low_confidence { "0.4" } else { "1" };
    let percent = result.confidence * 100.0;

    let _ = write!(
        html,
        "<div class=\"result\" style=\"background-color: {}; opacity: {};\">\
         ⚠️ Categoría: {} | Confianza: {:.1}%</div>\n",
        severity_color(&result.classification),
        opacity,
        encode_text(&result.classification),
        percent
    );

    if low_confidence {
        let _ = write!(
            html,
            "<div class=\"warning\">⚠️ La confianza es baja ({:.1}%), la clasificación puede no ser precisa.</div>\n",
            percent
        );
    }
}

fn preview(message: &str) -> String {
    if message.chars().count() > HISTORY_PREVIEW_CHARS {
        let head: String = message.chars().take(HISTORY_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        message.to_string()
    }
}
