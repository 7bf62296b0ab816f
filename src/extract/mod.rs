//! Text extraction from uploaded course documents
//!
//! Accepted formats are a closed set: PDF and plain text. Extraction is
//! deterministic so the same bytes always yield the same text.

mod text;

#[cfg(feature = "pdf")]
mod pdf;

pub use text::{decode_text, normalize_whitespace};

use crate::error::{Error, Result};
use std::path::Path;

/// Recognized upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Txt,
}

impl DocumentFormat {
    /// Determine the format from a filename, rejecting anything that is
    /// not .pdf or .txt
    pub fn from_filename(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pdf") => Ok(DocumentFormat::Pdf),
            Some("txt") => Ok(DocumentFormat::Txt),
            _ => Err(Error::UnsupportedFormat(name.to_string())),
        }
    }

    /// File extension used for the stored copy
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Txt => "txt",
        }
    }
}

/// Extract plain text from raw upload bytes
///
/// Whitespace is normalized so the text embeds and stores cleanly
/// regardless of the source layout.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String> {
    let raw = match format {
        DocumentFormat::Pdf => {
            #[cfg(feature = "pdf")]
            {
                pdf::extract_pdf_text(bytes)?
            }
            #[cfg(not(feature = "pdf"))]
            {
                return Err(Error::Extract(
                    "PDF support not compiled in. Enable the 'pdf' feature.".to_string(),
                ));
            }
        }
        DocumentFormat::Txt => decode_text(bytes),
    };

    Ok(normalize_whitespace(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_filename() {
        assert_eq!(
            DocumentFormat::from_filename("notes.txt").unwrap(),
            DocumentFormat::Txt
        );
        assert_eq!(
            DocumentFormat::from_filename("Lecture 3.PDF").unwrap(),
            DocumentFormat::Pdf
        );
    }

    #[test]
    fn test_rejected_formats() {
        assert!(DocumentFormat::from_filename("essay.docx").is_err());
        assert!(DocumentFormat::from_filename("archive.tar.gz").is_err());
        assert!(DocumentFormat::from_filename("noextension").is_err());
        // Extension must be the last component, not a substring
        assert!(DocumentFormat::from_filename("evil.txt.exe").is_err());
    }

    #[test]
    fn test_txt_extraction_idempotent() {
        let bytes = "Chapitre 1\n\nLa thermodynamique".as_bytes();
        let first = extract_text(bytes, DocumentFormat::Txt).unwrap();
        let second = extract_text(bytes, DocumentFormat::Txt).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_text_normalizes_whitespace() {
        let bytes = "  Heat\n\ntransfer\t\tbasics \r\n".as_bytes();
        let text = extract_text(bytes, DocumentFormat::Txt).unwrap();
        assert_eq!(text, "Heat transfer basics");
    }
}
