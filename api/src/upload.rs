use crate::api_error::ApiError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use guideline_extractor::SourceDocument;

pub const FILE_FIELD: &str = "file";

/// Pulls the `file` part out of a multipart upload, holding the file itself to `max_bytes`.
pub async fn read_pdf_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<SourceDocument, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Upload(e.status(), format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().trim().to_string();
        if filename.is_empty() {
            return Err(ApiError::BadRequest("No selected file".to_string()));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Upload(e.status(), format!("Failed to read file data: {}", e)))?;

        if bytes.len() > max_bytes {
            return Err(ApiError::Upload(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!(
                    "{} is {} bytes, over the {} byte upload limit",
                    filename,
                    bytes.len(),
                    max_bytes
                ),
            ));
        }

        log::info!("Received upload {} ({} bytes)", filename, bytes.len());
        return Ok(SourceDocument::pdf(filename, bytes.to_vec()));
    }

    Err(ApiError::BadRequest("No file part".to_string()))
}
