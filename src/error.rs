use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::credentials::KEY_REQUIRED_NOTICE;
use crate::gemini::ProviderError;
use crate::upload::ImageError;

/// How the page should present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Banner {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", KEY_REQUIRED_NOTICE)]
    KeyRequired,
    #[error("{0}")]
    MissingInput(&'static str),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("An error occurred: {0}")]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: Banner,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::KeyRequired => StatusCode::UNAUTHORIZED,
            AppError::MissingInput(_) | AppError::Image(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn banner(&self) -> Banner {
        match self {
            AppError::KeyRequired => Banner::Info,
            AppError::MissingInput(_) => Banner::Warning,
            _ => Banner::Error,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Provider(e) = &self {
            tracing::warn!(error = %e, "Provider request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.banner(),
        };
        (self.status(), Json(body)).into_response()
    }
}
