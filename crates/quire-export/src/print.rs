use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use serde::{Deserialize, Serialize};

/// Page layout used when printing a document to PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintSettings {
    /// Paper width in inches.
    pub paper_width: f64,

    /// Paper height in inches.
    pub paper_height: f64,

    /// Margin in inches, applied to all four sides.
    pub margin: f64,

    /// Print CSS backgrounds (colors and images).
    pub print_background: bool,

    /// Pages to keep, in Chromium's range syntax.
    pub page_ranges: String,

    /// Viewport width in CSS pixels while the page is laid out.
    pub viewport_width: i64,

    /// Viewport height in CSS pixels while the page is laid out.
    pub viewport_height: i64,
}

impl Default for PrintSettings {
    /// A4, no margins, first page only, laid out on a 1920x1080 viewport.
    fn default() -> Self {
        Self {
            paper_width: 8.27,
            paper_height: 11.69,
            margin: 0.0,
            print_background: true,
            page_ranges: "1".to_string(),
            viewport_width: 1920,
            viewport_height: 1080,
        }
    }
}

impl PrintSettings {
    pub fn to_pdf_params(&self) -> PrintToPdfParams {
        PrintToPdfParams {
            print_background: Some(self.print_background),
            paper_width: Some(self.paper_width),
            paper_height: Some(self.paper_height),
            margin_top: Some(self.margin),
            margin_bottom: Some(self.margin),
            margin_left: Some(self.margin),
            margin_right: Some(self.margin),
            page_ranges: Some(self.page_ranges.clone()),
            prefer_css_page_size: Some(false),
            ..Default::default()
        }
    }

    pub fn to_viewport_params(&self) -> SetDeviceMetricsOverrideParams {
        SetDeviceMetricsOverrideParams::new(self.viewport_width, self.viewport_height, 1.0, false)
    }
}
