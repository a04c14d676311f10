use crate::config::{DocumentTransport, GeminiConfig, INLINE_LIMIT_BYTES};
use crate::document_processor::DocumentProcessor;
use crate::error::{ExtractionError, Result};
use crate::models::*;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::{Client, Response};
use std::time::Duration;
use uuid::Uuid;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Sends a document plus an instruction to a generative model and returns its reply text.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, document: &SourceDocument, instruction: &str) -> Result<String>;

    fn model_name(&self) -> &str;
}

pub struct GeminiService {
    client: Client,
    config: GeminiConfig,
    processor: DocumentProcessor,
}

impl GeminiService {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        log::info!(
            "Gemini client ready (model: {}, transport: {:?})",
            config.model,
            config.transport
        );

        Ok(Self {
            client,
            config,
            processor: DocumentProcessor::new(),
        })
    }

    fn transport_for(&self, document: &SourceDocument) -> DocumentTransport {
        resolve_transport(self.config.transport, document.len())
    }

    async fn document_part(&self, document: &SourceDocument) -> Result<GeminiPart> {
        match self.transport_for(document) {
            DocumentTransport::Inline | DocumentTransport::Auto => Ok(GeminiPart::InlineData {
                inline_data: GeminiBlob {
                    mime_type: document.mime_type.clone(),
                    data: BASE64.encode(&document.bytes),
                },
            }),
            DocumentTransport::FileApi => {
                let uploaded = self.upload_file(document).await?;
                Ok(GeminiPart::FileData {
                    file_data: GeminiFileData {
                        mime_type: uploaded
                            .mime_type
                            .unwrap_or_else(|| document.mime_type.clone()),
                        file_uri: uploaded.uri,
                    },
                })
            }
            DocumentTransport::Text => {
                let text = self.processor.extract_text(document).await?;
                Ok(GeminiPart::Text {
                    text: format!("DOCUMENT TEXT ({}):\n{}", document.filename, text),
                })
            }
        }
    }

    /// Pushes the document through the File API's resumable upload and returns the stored file.
    async fn upload_file(&self, document: &SourceDocument) -> Result<UploadedFile> {
        let display_name = format!("{}-{}", Uuid::new_v4(), document.filename);
        log::info!(
            "Uploading {} ({} bytes) to the Gemini File API",
            document.filename,
            document.len()
        );

        let start_url = format!("{}/upload/v1beta/files", self.config.api_base);
        let start = self
            .client
            .post(&start_url)
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", document.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", document.mime_type.as_str())
            .json(&FileUploadRequest {
                file: FileUploadMetadata { display_name },
            })
            .send()
            .await?;
        let start = ensure_success(start).await?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ExtractionError::Upstream {
                status: start.status().as_u16(),
                body: "upload session has no x-goog-upload-url header".to_string(),
            })?;

        let finish = self
            .client
            .post(&upload_url)
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .body(document.bytes.clone())
            .send()
            .await?;
        let uploaded: FileUploadResponse = ensure_success(finish).await?.json().await?;

        log::info!("Uploaded {} as {}", document.filename, uploaded.file.name);
        Ok(uploaded.file)
    }

    fn build_request(&self, instruction: &str, document_part: GeminiPart) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![
                    GeminiPart::Text {
                        text: instruction.to_string(),
                    },
                    document_part,
                ],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            }),
        }
    }
}

#[async_trait]
impl ModelClient for GeminiService {
    async fn generate(&self, document: &SourceDocument, instruction: &str) -> Result<String> {
        let document_part = self.document_part(document).await?;
        let request = self.build_request(instruction, document_part);

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base, self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&request)
            .send()
            .await?;
        let gemini_response: GeminiResponse = ensure_success(response).await?.json().await?;

        gemini_response.text().ok_or(ExtractionError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

pub fn resolve_transport(configured: DocumentTransport, size: usize) -> DocumentTransport {
    match configured {
        DocumentTransport::Auto if size <= INLINE_LIMIT_BYTES => DocumentTransport::Inline,
        DocumentTransport::Auto => DocumentTransport::FileApi,
        other => other,
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    log::error!("Gemini API error ({}): {}", status, body);
    Err(ExtractionError::Upstream {
        status: status.as_u16(),
        body,
    })
}
