use crate::document_processor::DocumentProcessor;
use crate::error::Result;
use crate::gemini_service::ModelClient;
use crate::models::*;
use crate::normalizer::normalize_response;
use std::sync::Arc;
use std::time::Instant;

pub const EXTRACTION_PROMPT: &str = "Extract all brand design guideline information from this PDF and return it in a single JSON object.

INSTRUCTIONS:
- Cover colors (names, HEX/RGB/CMYK/Pantone values), typography (families, weights, sizes, usage), logo usage (clear space, minimum size, misuse), imagery, iconography, layout and grid, spacing, tone of voice and any other design rules the document states.
- Use descriptive snake_case keys and nest related values in objects or arrays.
- Return the result as a single JSON object containing all extracted information.

Fill in as much detail as possible for each field, using only the precise values from the document.";

pub struct ExtractionService {
    client: Arc<dyn ModelClient>,
    processor: DocumentProcessor,
}

impl ExtractionService {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            processor: DocumentProcessor::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Runs one document through the model and returns the JSON object it produced.
    pub async fn extract(&self, document: &SourceDocument) -> Result<ExtractedDocument> {
        self.processor.validate(document)?;

        log::info!(
            "Extracting guidelines from {} ({} bytes) with {}",
            document.filename,
            document.len(),
            self.client.model_name()
        );
        let start_time = Instant::now();

        let raw = self.client.generate(document, EXTRACTION_PROMPT).await?;

        log::info!(
            "Model answered in {} ms ({} chars)",
            start_time.elapsed().as_millis(),
            raw.len()
        );
        log::debug!("Raw model response:\n{}", raw);

        let extracted = normalize_response(&raw)?;

        log::info!(
            "Extracted {} top-level fields from {}",
            extracted.len(),
            document.filename
        );
        Ok(extracted)
    }
}
