use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use log::error;

use crate::store::StoreError;
use crate::transcriber::PipelineError;
use crate::youtube::LoaderError;

/// Errors surfaced by the HTTP handlers. Every variant renders as
/// `{"error": "<message>"}` with the status from [`ResponseError::status_code`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing video_id")]
    MissingVideoId,

    #[error("invalid video_id: {0}")]
    InvalidVideoId(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("transcription already exists: {0}")]
    AlreadyExists(String),

    #[error("transcription not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingVideoId | ApiError::InvalidVideoId(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::AlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Pipeline(PipelineError::NoTranscript(_))
            | ApiError::Pipeline(PipelineError::Loader(
                LoaderError::CaptionsUnavailable(_) | LoaderError::NoTrackForLanguages { .. },
            )) => StatusCode::NOT_FOUND,
            ApiError::Pipeline(PipelineError::Loader(LoaderError::InvalidVideoId(_))) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Pipeline(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }
        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
