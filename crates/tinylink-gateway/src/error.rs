use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::net::SocketAddr;
use thiserror::Error;
use tinylink_core::{CacheError, Interrupted, StorageError};
use tinylink_shortener::ShortenerError;
use tracing::{debug, error};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request body: {0}")]
    Payload(#[from] JsonRejection),
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
}

fn shortener_status(err: &ShortenerError) -> (StatusCode, String) {
    match err {
        ShortenerError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        ShortenerError::InvalidShortCode(_) | ShortenerError::NotFound(_) => {
            (StatusCode::NOT_FOUND, "short link not found".to_string())
        }
        ShortenerError::Interrupted(Interrupted::DeadlineExceeded) => {
            (StatusCode::GATEWAY_TIMEOUT, "request timed out".to_string())
        }
        ShortenerError::Interrupted(Interrupted::Cancelled) | ShortenerError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Payload(rejection) => {
                debug!(error = %rejection, "Rejected request body");
                (StatusCode::BAD_REQUEST, rejection.body_text())
            }
            AppError::Shortener(err) => {
                if err.is_client_error() {
                    debug!(error = %err, "Request rejected");
                } else {
                    error!(error = %err, "Request failed");
                }
                shortener_status(err)
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Failures that abort process start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("storage backend unreachable: {0}")]
    Storage(#[from] StorageError),
    #[error("cache backend unreachable: {0}")]
    Cache(#[from] CacheError),
    #[error("missing setting {0}")]
    MissingSetting(&'static str),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
