use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::tts::SpeechError;

/// Errors surfaced by the HTTP routes as JSON bodies
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    RemoteService { message: String, details: String },
    #[error("Audio not found")]
    AudioNotFound,
    #[error("{0}")]
    MissingFile(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::RemoteService { message, details } => {
                Self::RemoteService { message, details }
            }
        }
    }
}

impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Self::Internal(err.body_text())
    }
}

impl From<axum::extract::multipart::MultipartRejection> for ApiError {
    fn from(rejection: axum::extract::multipart::MultipartRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::RemoteService { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": message, "details": details})),
            )
                .into_response(),
            ApiError::AudioNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Audio not found"})),
            )
                .into_response(),
            ApiError::MissingFile(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"error": message})),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": message})),
            )
                .into_response(),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": message})),
            )
                .into_response(),
        }
    }
}
