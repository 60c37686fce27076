use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use super::pages;
use crate::posts::StoreError;
use crate::uploads::UploadError;

/// Failures a handler cannot recover from.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("malformed form upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Posts(#[from] StoreError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(what) => (StatusCode::NOT_FOUND, what.to_string()),
            Self::Multipart(e) => {
                tracing::warn!("Rejected multipart body: {e}");
                (e.status(), e.body_text())
            }
            err @ (Self::Posts(_) | Self::Upload(_) | Self::Internal(_)) => {
                tracing::error!(error = ?err, "Request failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong on our side. Please try again later.".to_string(),
                )
            }
        };

        (status, Html(pages::render_error(status, &message).into_string())).into_response()
    }
}
