use quire_core::models::params::Params;
use quire_core::models::request::Parser;

use crate::ejs;
use crate::error::ExportError;

/// A template language that can expand a template string with params.
///
/// `Parser` names the engines a request may ask for; `engine_for` maps each
/// one to its implementation.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, params: &Params) -> Result<String, ExportError>;
}

/// Embedded JavaScript templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct EjsEngine;

impl TemplateEngine for EjsEngine {
    fn render(&self, template: &str, params: &Params) -> Result<String, ExportError> {
        ejs::render(template, params)
    }
}

pub fn engine_for(parser: Parser) -> &'static dyn TemplateEngine {
    match parser {
        Parser::Ejs => &EjsEngine,
    }
}

/// Expand `template` with `params` on the blocking pool.
///
/// Expansion blocks its thread until the template finishes or hits its time
/// limit, so it is kept off the async workers.
pub async fn render_template(
    parser: Parser,
    template: String,
    params: Params,
) -> Result<String, ExportError> {
    let html = tokio::task::spawn_blocking(move || {
        engine_for(parser).render(&template, &params)
    })
    .await??;
    tracing::debug!(parser = %parser, bytes = html.len(), "template rendered");
    Ok(html)
}
