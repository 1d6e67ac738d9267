use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::ApiError;
use crate::pipeline;
use crate::state::AppState;

/// `POST /api/generate`: render the template to a PDF and answer with its
/// public URL as plain text.
pub async fn generate(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = body?;
    let stored = pipeline::generate(&state, &body).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        stored.url,
    ))
}
