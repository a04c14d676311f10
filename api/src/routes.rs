use crate::api_error::ApiError;
use crate::upload::read_pdf_upload;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use guideline_extractor::{ExtractedDocument, ExtractionService};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

/// Room for multipart boundaries and part headers on top of the file itself.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub extraction_service: Arc<ExtractionService>,
    /// Largest accepted PDF, excluding multipart framing.
    pub max_upload_bytes: usize,
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/extract-guidelines", post(extract_guidelines))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

async fn extract_guidelines(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractedDocument>, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        log::warn!("Not a multipart upload: {}", rejection);
        ApiError::BadRequest("No file part".to_string())
    })?;
    let document = read_pdf_upload(multipart, state.max_upload_bytes).await?;
    let extracted = state.extraction_service.extract(&document).await?;
    Ok(Json(extracted))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.extraction_service.model_name(),
    }))
}
