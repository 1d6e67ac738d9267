use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Resource a template is not allowed to exhaust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateLimit {
    Memory,
    Time,
}

impl fmt::Display for TemplateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateLimit::Memory => f.write_str("memory"),
            TemplateLimit::Time => f.write_str("time"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("template syntax error on line {line}: {message}")]
    TemplateParse { line: usize, message: String },

    #[error("template does not compile: {0}")]
    TemplateCompile(String),

    #[error("template rendering failed on line {line}: {message}")]
    TemplateRender { line: usize, message: String },

    #[error("template exceeded its {0} limit")]
    TemplateLimit(TemplateLimit),

    #[error("template engine failed: {0}")]
    Engine(String),

    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("page content did not settle within {}s", .after.as_secs())]
    RenderTimeout { after: Duration },

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ExportError {
    /// Template errors are caused by the caller's template text rather than
    /// by the rendering infrastructure.
    pub fn is_template(&self) -> bool {
        matches!(
            self,
            ExportError::TemplateParse { .. }
                | ExportError::TemplateCompile(_)
                | ExportError::TemplateRender { .. }
                | ExportError::TemplateLimit(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ExportError::RenderTimeout { .. })
    }
}

impl From<chromiumoxide::error::CdpError> for ExportError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        ExportError::Browser(e.to_string())
    }
}
