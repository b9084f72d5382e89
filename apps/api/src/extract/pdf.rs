use lopdf::Document;
use tracing::warn;

use super::ExtractError;

/// Extracts text page by page, joining pages with non-empty text in page
/// order. A page that fails to decode is skipped; an unloadable document is
/// an error.
pub fn extract(data: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(data).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let mut pages = Vec::new();
    for &page_num in doc.get_pages().keys() {
        match doc.extract_text(&[page_num]) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    pages.push(text.to_string());
                }
            }
            Err(e) => warn!(page = page_num, "Skipping unreadable PDF page: {e}"),
        }
    }

    Ok(pages.join("\n"))
}
