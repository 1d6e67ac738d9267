//! quire-export
//!
//! Template expansion and HTML to PDF printing.

pub mod ejs;
pub mod error;
pub mod pdf;
pub mod print;
pub mod render;
