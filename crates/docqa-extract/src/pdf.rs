use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use docqa_core::{Error, Result};

/// Text of every readable page, in page order, one page per line block.
pub fn load_pdf(path: &Path) -> Result<String> {
    let doc = Document::load(path).map_err(|e| Error::Extraction(format!("{}: {}", path.display(), e)))?;
    let mut text = String::new();
    for page_no in doc.get_pages().into_keys() {
        match doc.extract_text(&[page_no]) {
            Ok(page_text) if !page_text.is_empty() => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Ok(_) => debug!(page = page_no, "empty page"),
            Err(e) => warn!(page = page_no, error = %e, "skipping unreadable PDF page"),
        }
    }
    Ok(text.trim().to_string())
}
