use std::collections::HashSet;

use quire_core::object_keys::{PDF_SUFFIX, download_filename, pdf_object_name};

#[test]
fn object_names_are_pdf_and_unique() {
    let names: HashSet<String> = (0..1000).map(|_| pdf_object_name()).collect();
    assert_eq!(names.len(), 1000);
    for name in &names {
        assert!(name.ends_with(PDF_SUFFIX));
        assert_eq!(name.len(), 32 + PDF_SUFFIX.len());
    }
}

#[test]
fn download_filename_is_sanitized() {
    assert_eq!(
        download_filename("Invoice #42 / ACME").as_deref(),
        Some("Invoice-42-ACME.pdf")
    );
    assert_eq!(download_filename("report.pdf").as_deref(), Some("report.pdf"));
    assert_eq!(download_filename("  ../etc  ").as_deref(), Some("etc.pdf"));
}

#[test]
fn unusable_hints_yield_none() {
    assert_eq!(download_filename(""), None);
    assert_eq!(download_filename("???"), None);
    assert_eq!(download_filename("日本語"), None);
}

#[test]
fn long_hints_are_truncated() {
    let long = "a".repeat(500);
    let name = download_filename(&long).unwrap();
    assert_eq!(name.len(), 96 + PDF_SUFFIX.len());
}
