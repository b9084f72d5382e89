//! Text extraction for uploaded résumés.
//!
//! Dispatches on the filename extension. Unrecognized formats extract to an
//! empty string rather than an error; the submit gate only checks that a CV
//! file is present at all.

mod docx;
mod pdf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to read DOCX: {0}")]
    Docx(String),
}

/// Extracts plain text from an uploaded document.
///
/// PDF pages and DOCX paragraphs are joined with newlines in document
/// order. Unrecognized extensions yield `Ok("")`.
pub fn extract_text(data: &[u8], filename: &str) -> Result<String, ExtractError> {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        pdf::extract(data)
    } else if lower.ends_with(".docx") {
        docx::extract(data)
    } else {
        Ok(String::new())
    }
}
