use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use quire_core::error::ValidationError;
use quire_core::models::issue::Issue;
use quire_export::error::ExportError;
use quire_storage::error::StorageError;

/// Unified API error type for the route handlers.
#[derive(Debug)]
pub enum ApiError {
    Validation(Vec<Issue>),
    NotFound,
    /// The request body could not be read, usually because it is too large.
    Body { status: StatusCode, message: String },
    /// The caller's template failed to compile or evaluate.
    Template(String),
    Render(String),
    RenderTimeout(String),
    Upload(String),
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    error: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    messages: Option<Vec<Issue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ErrorBody {
    fn new(status: StatusCode) -> Self {
        Self {
            status: "error",
            error: status.as_u16(),
            code: None,
            messages: None,
            message: None,
        }
    }

    fn code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Body { status, .. } => *status,
            ApiError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Render(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::RenderTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upload(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(issues) => {
                tracing::info!(issues = issues.len(), "request rejected");
                ErrorBody {
                    messages: Some(issues),
                    ..ErrorBody::new(status)
                }
            }
            ApiError::NotFound => ErrorBody::new(status),
            ApiError::Body { message, .. } => {
                tracing::info!("unreadable body: {message}");
                ErrorBody {
                    message: Some(message),
                    ..ErrorBody::new(status)
                }
            }
            ApiError::Template(message) => {
                tracing::warn!("template error: {message}");
                ErrorBody {
                    message: Some(message),
                    ..ErrorBody::new(status).code("template_error")
                }
            }
            ApiError::Render(msg) => {
                tracing::error!("render error: {msg}");
                ErrorBody::new(status).code("render_failed")
            }
            ApiError::RenderTimeout(msg) => {
                tracing::error!("render timeout: {msg}");
                ErrorBody::new(status).code("render_timeout")
            }
            ApiError::Upload(msg) => {
                tracing::error!("upload error: {msg}");
                ErrorBody::new(status).code("upload_failed")
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e.issues)
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        if e.is_template() {
            ApiError::Template(e.to_string())
        } else if e.is_timeout() {
            ApiError::RenderTimeout(e.to_string())
        } else {
            ApiError::Render(e.to_string())
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Upload(e.to_string())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(e: BytesRejection) -> Self {
        ApiError::Body {
            status: e.status(),
            message: e.body_text(),
        }
    }
}
