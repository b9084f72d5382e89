use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

use super::ExtractError;

/// Extracts every top-level paragraph in document order, joined with
/// newlines. Empty paragraphs produce empty segments; no filtering.
pub fn extract(data: &[u8]) -> Result<String, ExtractError> {
    let docx = read_docx(data).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(para) = child {
            let mut text = String::new();
            for para_child in para.children {
                if let ParagraphChild::Run(run) = para_child {
                    for run_child in run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(text);
        }
    }

    Ok(paragraphs.join("\n"))
}
