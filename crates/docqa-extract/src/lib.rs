//! docqa-extract
//!
//! Plain-text extraction for the document formats docqa ingests (PDF and
//! DOCX), chosen by file extension. Extraction is tolerant: an unreadable page
//! or a malformed XML tail is skipped with a warning and the text recovered so
//! far is returned. Only failing to open the container is an error.

mod docx;
mod pdf;

pub use docx::{docx_xml_to_text, load_docx};
pub use pdf::load_pdf;

use std::path::Path;

use docqa_core::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detect the format from the (case-insensitive) file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(Error::UnsupportedFormat(format!(
                "{} (only PDF and DOCX are supported)",
                path.display()
            ))),
        }
    }
}

/// Extract the plain text of a PDF or DOCX file.
pub fn extract_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    match DocumentFormat::from_path(path)? {
        DocumentFormat::Pdf => load_pdf(path),
        DocumentFormat::Docx => load_docx(path),
    }
}
