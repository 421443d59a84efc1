//! Message Classifier Server
//!
//! Loads the zero-shot model once and serves `/classify`, the web form and
//! the health endpoints

use anyhow::{Context, Result};
use message_classifier::{
    create_router, handle_error, utils::logging::init_logging, version_info, HuggingFaceClassifier,
    Settings,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration errors are reported before logging is configured
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(err) => {
            let report = handle_error(&err, false);
            anyhow::bail!("{}: {} {:?}", report.error_kind, report.message, report.details);
        }
    };

    init_logging(&settings.logging)?;
    info!("{}", version_info());

    let model = match HuggingFaceClassifier::load(
        &settings.model,
        settings.request.timeout,
        &settings.classification.candidate_labels,
    )
    .await
    {
        Ok(model) => model,
        Err(err) => {
            let report = handle_error(&err, settings.debug_mode);
            anyhow::bail!("{}: {}", report.error_kind, report.message);
        }
    };
    info!("✅ Model '{}' loaded", settings.model.name);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Create router
    let app = create_router(settings, Arc::new(model)).await?;

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 Message classifier started!");
    info!("📝 Health check: http://{}/health", addr);
    info!("🔎 Classify endpoint: http://{}/classify", addr);
    info!("🖥️ Web form: http://{}/", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}
