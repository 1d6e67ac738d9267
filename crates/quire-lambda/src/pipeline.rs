//! Request orchestration.
//!
//! `validated -> rendered -> converted -> published`, stopping at the first
//! failure. Nothing is uploaded unless a complete PDF exists.

use std::time::Instant;

use quire_core::validate;
use quire_export::render::render_template;
use quire_storage::publish::publish;
use quire_storage::store::StoredObject;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn generate(state: &AppState, body: &[u8]) -> Result<StoredObject, ApiError> {
    let started = Instant::now();

    let request = validate::parse_body(body)?;
    let params = request.params.unwrap_or_default();
    tracing::info!(
        stage = "validated",
        parser = %request.parser,
        template_bytes = request.template.len(),
        params = params.len(),
        "request validated"
    );

    let html = render_template(request.parser, request.template, params).await?;
    tracing::info!(stage = "rendered", html_bytes = html.len(), "template rendered");

    let pdf = state.renderer.render_pdf(&html).await?;
    tracing::info!(stage = "converted", pdf_bytes = pdf.len(), "pdf generated");

    let stored = publish(state.store.as_ref(), pdf, request.name.as_deref()).await?;
    tracing::info!(
        stage = "published",
        name = %stored.name,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "pdf available"
    );

    Ok(stored)
}
