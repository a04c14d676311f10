mod api_error;
mod routes;
mod upload;

use anyhow::Context;
use guideline_extractor::{Config, ExtractionService, GeminiService};
use routes::{build_router, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().context("failed to load configuration")?;

    let gemini_service = Arc::new(
        GeminiService::new(config.gemini.clone()).context("failed to build Gemini client")?,
    );
    let state = AppState {
        extraction_service: Arc::new(ExtractionService::new(gemini_service)),
        max_upload_bytes: config.max_upload_bytes,
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
