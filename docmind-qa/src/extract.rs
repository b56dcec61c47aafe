//! PDF text extraction.
//!
//! This module is only available when the `pdf` feature is enabled. It is a
//! pure function over the file bytes; the upload flow owns reading the file
//! and deciding what to do with the text.

use tracing::debug;

use crate::error::{QaError, Result};

/// Extract the text content of a PDF from its raw bytes.
///
/// # Errors
///
/// Returns [`QaError::Extraction`] if the bytes are not a readable PDF.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| QaError::Extraction(format!("failed to extract PDF text: {e}")))?;
    debug!(bytes = bytes.len(), text_len = text.len(), "extracted PDF text");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_an_extraction_error() {
        let result = extract_text(b"definitely not a pdf");
        assert!(matches!(result, Err(QaError::Extraction(_))));
    }
}
