//! Object naming conventions for published artifacts.
//!
//! Pure string functions. The storage crate decides where these names land.

use uuid::Uuid;

pub const PDF_SUFFIX: &str = ".pdf";

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const MAX_DOWNLOAD_STEM: usize = 96;

/// A fresh, globally unique object name for a rendered PDF.
///
/// UUIDv4 carries 122 random bits from the OS CSPRNG, so collisions are not
/// a practical concern.
pub fn pdf_object_name() -> String {
    format!("{}{PDF_SUFFIX}", Uuid::new_v4().simple())
}

/// Turn the caller's free-form `name` hint into a safe download filename.
///
/// Keeps ASCII alphanumerics, `-`, `_` and `.`; every other run of
/// characters collapses to a single `-`. Returns `None` when nothing usable
/// is left.
pub fn download_filename(hint: &str) -> Option<String> {
    let hint = hint.trim();
    let stem = hint
        .strip_suffix(PDF_SUFFIX)
        .or_else(|| hint.strip_suffix(".PDF"))
        .unwrap_or(hint);

    let mut out = String::with_capacity(stem.len());
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }

    let trimmed: String = out
        .trim_matches(|c| c == '-' || c == '.')
        .chars()
        .take(MAX_DOWNLOAD_STEM)
        .collect();
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("{trimmed}{PDF_SUFFIX}"))
}
