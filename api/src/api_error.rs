use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use guideline_extractor::{ErrorResponse, ExtractionError};
use guideline_extractor::normalizer::PARSE_FAILURE_MESSAGE;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// Multipart body could not be read; status comes from axum (e.g. 413 over the body limit).
    Upload(StatusCode, String),
    Extraction(ExtractionError),
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        ApiError::Extraction(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: message,
                    raw: None,
                },
            ),
            ApiError::Upload(status, message) => {
                log::warn!("Rejected upload: {}", message);
                (
                    status,
                    ErrorResponse {
                        error: message,
                        raw: None,
                    },
                )
            }
            ApiError::Extraction(ExtractionError::Normalization(err)) => {
                log::error!("{}", err.message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: PARSE_FAILURE_MESSAGE.to_string(),
                        raw: Some(err.raw),
                    },
                )
            }
            ApiError::Extraction(err @ ExtractionError::InvalidDocument(_)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: err.to_string(),
                    raw: None,
                },
            ),
            ApiError::Extraction(
                err @ (ExtractionError::Upstream { .. }
                | ExtractionError::EmptyResponse
                | ExtractionError::Http(_)),
            ) => {
                log::error!("Model call failed: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: err.to_string(),
                        raw: None,
                    },
                )
            }
            ApiError::Extraction(err) => {
                log::error!("Extraction failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: err.to_string(),
                        raw: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
