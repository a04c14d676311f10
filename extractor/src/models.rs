use serde::{Deserialize, Serialize};

/// Whatever JSON object the model produced. No schema is applied.
pub type ExtractedDocument = serde_json::Map<String, serde_json::Value>;

pub const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn pdf(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: PDF_MIME_TYPE.to_string(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// One part of a Gemini message. The API takes exactly one of these fields.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeminiPart {
    Text { text: String },
    InlineData { inline_data: GeminiBlob },
    FileData { file_data: GeminiFileData },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiBlob {
    pub mime_type: String,
    /// Base64 encoded bytes.
    pub data: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiFileData {
    pub mime_type: String,
    pub file_uri: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiGenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate.
    ///
    /// `None` only when the candidate carries no text part at all; blank text
    /// is still text and is left for the normalizer to reject.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut texts = content
            .parts
            .iter()
            .filter_map(|part| match part {
                GeminiPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .peekable();

        texts.peek()?;
        Some(texts.collect())
    }
}

#[derive(Debug, Serialize)]
pub struct FileUploadRequest {
    pub file: FileUploadMetadata,
}

#[derive(Debug, Serialize)]
pub struct FileUploadMetadata {
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct FileUploadResponse {
    pub file: UploadedFile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parts_serialize_in_api_shape() {
        let parts = vec![
            GeminiPart::Text { text: "hi".to_string() },
            GeminiPart::InlineData {
                inline_data: GeminiBlob {
                    mime_type: PDF_MIME_TYPE.to_string(),
                    data: "JVBERi0=".to_string(),
                },
            },
            GeminiPart::FileData {
                file_data: GeminiFileData {
                    mime_type: PDF_MIME_TYPE.to_string(),
                    file_uri: "https://example.test/files/abc".to_string(),
                },
            },
        ];

        assert_eq!(
            serde_json::to_value(&parts).unwrap(),
            json!([
                {"text": "hi"},
                {"inline_data": {"mime_type": "application/pdf", "data": "JVBERi0="}},
                {"file_data": {"mime_type": "application/pdf", "file_uri": "https://example.test/files/abc"}}
            ])
        );
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "```json\n"}, {"text": "{}\n```"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();

        assert_eq!(response.text().as_deref(), Some("```json\n{}\n```"));
    }

    #[test]
    fn blocked_response_has_no_text() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(response.text().is_none());

        let response: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.text().is_none());

        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": []}}]
        }))
        .unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn blank_text_is_still_text() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": ""}, {"text": "  \n"}]}}]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("  \n"));
    }

    #[test]
    fn uploaded_file_reads_camel_case() {
        let response: FileUploadResponse = serde_json::from_value(json!({
            "file": {"name": "files/abc", "uri": "https://example.test/v1beta/files/abc", "mimeType": "application/pdf"}
        }))
        .unwrap();
        assert_eq!(response.file.name, "files/abc");
        assert_eq!(response.file.mime_type.as_deref(), Some("application/pdf"));
    }
}
