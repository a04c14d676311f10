pub mod config;
pub mod document_processor;
pub mod error;
pub mod extraction_service;
pub mod gemini_service;
pub mod models;
pub mod normalizer;

pub use config::{Config, DocumentTransport, GeminiConfig};
pub use document_processor::DocumentProcessor;
pub use error::{ExtractionError, NormalizationError};
pub use extraction_service::{ExtractionService, EXTRACTION_PROMPT};
pub use gemini_service::{GeminiService, ModelClient};
pub use models::*;
pub use normalizer::{extract_fenced_json, normalize_response};
