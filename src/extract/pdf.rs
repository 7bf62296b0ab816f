//! PDF text extraction via pdf-extract

use crate::error::{Error, Result};

/// Extract text from PDF bytes, pages concatenated in page order
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| Error::Extract(format!("PDF extraction failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pdf_is_an_error() {
        let result = extract_pdf_text(b"not a pdf at all");
        assert!(matches!(result, Err(Error::Extract(_))));
    }
}
