//! HTML to PDF conversion.

mod chromium;
mod idle;

use async_trait::async_trait;

use crate::error::ExportError;

pub use chromium::{
    BrowserSession, ChromiumConfig, ChromiumRenderer, DEFAULT_LAUNCH_TIMEOUT, DEFAULT_LOAD_TIMEOUT,
};
pub use idle::{NETWORK_IDLE_QUIET, NetworkEvent, wait_for_idle};

/// Every PDF file starts with this header.
pub const PDF_MAGIC: &[u8] = b"%PDF";

/// Converts a rendered HTML document into PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, ExportError>;
}

/// Reject output that is not a PDF document.
pub fn ensure_pdf(bytes: Vec<u8>) -> Result<Vec<u8>, ExportError> {
    if bytes.starts_with(PDF_MAGIC) {
        Ok(bytes)
    } else {
        Err(ExportError::Pdf(format!(
            "printer returned {} bytes without a PDF header",
            bytes.len()
        )))
    }
}
