use thiserror::Error;

/// The model's reply could not be turned into a JSON object.
///
/// Carries the reply exactly as received so callers can show it to an
/// operator instead of a guessed structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NormalizationError {
    pub message: String,
    pub raw: String,
}

impl NormalizationError {
    pub fn new(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raw: raw.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("Gemini API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Gemini returned no text")]
    EmptyResponse,

    #[error("request to Gemini failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ExtractionError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs can carry credentials; they never belong in a message.
        ExtractionError::Http(err.without_url())
    }
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
