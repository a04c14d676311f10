use crate::error::{ExtractionError, Result};
use crate::models::SourceDocument;
use pdf_extract::extract_text;
use regex::Regex;
use std::io::Write;
use std::sync::OnceLock;
use tempfile::NamedTempFile;

const PDF_SIGNATURE: &[u8] = b"%PDF-";

pub struct DocumentProcessor;

impl DocumentProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, document: &SourceDocument) -> Result<()> {
        if document.is_empty() {
            return Err(ExtractionError::InvalidDocument(format!(
                "{} is empty",
                document.filename
            )));
        }

        // Some writers put junk before the header; readers accept it within the first KiB.
        let head = &document.bytes[..document.len().min(1024)];
        if !head.windows(PDF_SIGNATURE.len()).any(|w| w == PDF_SIGNATURE) {
            return Err(ExtractionError::InvalidDocument(format!(
                "{} is not a PDF",
                document.filename
            )));
        }

        Ok(())
    }

    /// Writes the upload to a `.pdf` temp file. The file is removed when the handle drops.
    pub fn stage(&self, document: &SourceDocument) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("guidelines-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(&document.bytes)?;
        file.flush()?;

        log::debug!(
            "Staged {} ({} bytes) at {}",
            document.filename,
            document.len(),
            file.path().display()
        );
        Ok(file)
    }

    pub async fn extract_text(&self, document: &SourceDocument) -> Result<String> {
        let staged = self.stage(document)?;
        let filename = document.filename.clone();

        log::info!("Extracting text from PDF: {}", filename);

        let content = tokio::task::spawn_blocking(move || {
            let text = extract_text(staged.path());
            // Keep the temp file alive until pdf-extract is done with it.
            drop(staged);
            text
        })
        .await
        .map_err(|e| ExtractionError::InvalidDocument(format!("{}: parser aborted: {}", filename, e)))?
        .map_err(|e| ExtractionError::InvalidDocument(format!("{}: {}", filename, e)))?;

        let cleaned = self.clean_text(&content);
        if cleaned.is_empty() {
            return Err(ExtractionError::InvalidDocument(format!(
                "{} contains no extractable text",
                filename
            )));
        }

        log::info!("Extracted {} characters from {}", cleaned.chars().count(), filename);
        Ok(cleaned)
    }

    /// Collapses runs of spaces and blank lines left behind by PDF layout.
    fn clean_text(&self, text: &str) -> String {
        static SPACES: OnceLock<Regex> = OnceLock::new();
        static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
        let re_spaces = SPACES.get_or_init(|| Regex::new(r"[ \t\x0C]+").unwrap());
        let re_blank = BLANK_LINES.get_or_init(|| Regex::new(r"\s*\n\s*\n\s*").unwrap());

        let cleaned = re_spaces.replace_all(text, " ");
        let cleaned = re_blank.replace_all(&cleaned, "\n\n");

        cleaned.trim().to_string()
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_upload_is_rejected() {
        let processor = DocumentProcessor::new();
        let err = processor
            .validate(&SourceDocument::pdf("empty.pdf", Vec::new()))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidDocument(_)));
    }

    #[test]
    fn non_pdf_is_rejected() {
        let processor = DocumentProcessor::new();
        let doc = SourceDocument::pdf("notes.pdf", b"just some text".to_vec());
        assert!(matches!(
            processor.validate(&doc),
            Err(ExtractionError::InvalidDocument(_))
        ));
    }

    #[test]
    fn pdf_signature_is_accepted_with_leading_bytes() {
        let processor = DocumentProcessor::new();
        processor
            .validate(&SourceDocument::pdf("a.pdf", b"%PDF-1.7\n%...".to_vec()))
            .unwrap();
        processor
            .validate(&SourceDocument::pdf("b.pdf", b"\xEF\xBB\xBF%PDF-1.4\n".to_vec()))
            .unwrap();
    }

    #[test]
    fn staged_file_is_removed_on_drop() {
        let processor = DocumentProcessor::new();
        let doc = SourceDocument::pdf("brand.pdf", b"%PDF-1.4\n".to_vec());
        let staged = processor.stage(&doc).unwrap();
        let path = staged.path().to_path_buf();

        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), doc.bytes);

        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn unreadable_pdf_fails_text_extraction() {
        let processor = DocumentProcessor::new();
        let doc = SourceDocument::pdf("broken.pdf", b"%PDF-1.4\nnot really a pdf".to_vec());
        assert!(matches!(
            processor.extract_text(&doc).await,
            Err(ExtractionError::InvalidDocument(_))
        ));
    }

    #[test]
    fn layout_whitespace_is_collapsed() {
        let processor = DocumentProcessor::new();
        let text = "  Primary\t\tcolors:  #FFBC0D \n\n\n\n Typography \n";
        assert_eq!(processor.clean_text(text), "Primary colors: #FFBC0D\n\nTypography");
    }
}
