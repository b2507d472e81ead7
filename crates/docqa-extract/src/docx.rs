use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::warn;

use docqa_core::{Error, Result};

const DOCUMENT_PART: &str = "word/document.xml";

/// Text of the main document part, one non-blank paragraph per line.
pub fn load_docx(path: &Path) -> Result<String> {
    let extraction = |e: &dyn std::fmt::Display| Error::Extraction(format!("{}: {}", path.display(), e));
    let mut archive = zip::ZipArchive::new(File::open(path)?).map_err(|e| extraction(&e))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| extraction(&e))?
        .read_to_string(&mut xml)
        .map_err(|e| extraction(&e))?;
    Ok(docx_xml_to_text(&xml))
}

/// Collect `w:t` runs per `w:p` paragraph from WordprocessingML.
pub fn docx_xml_to_text(xml: &str) -> String {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut paragraph = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => flush_paragraph(&mut paragraph, &mut out),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => paragraph.push('\t'),
                b"w:br" | b"w:cr" => paragraph.push(' '),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => match t.unescape() {
                Ok(s) => paragraph.push_str(&s),
                Err(e) => warn!(error = %e, "skipping undecodable text run"),
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(position = reader.buffer_position(), error = %e, "malformed document XML, keeping text read so far");
                break;
            }
            _ => {}
        }
    }
    flush_paragraph(&mut paragraph, &mut out);
    out.trim().to_string()
}

fn flush_paragraph(paragraph: &mut String, out: &mut String) {
    let trimmed = paragraph.trim();
    if !trimmed.is_empty() {
        out.push_str(trimmed);
        out.push('\n');
    }
    paragraph.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_become_lines() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> world</w:t></w:r></w:p>
            <w:p><w:r><w:t>   </w:t></w:r></w:p>
            <w:p><w:r><w:t>A</w:t><w:tab/><w:t>B &amp; C</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(docx_xml_to_text(xml), "Hello world\nA\tB & C");
    }

    #[test]
    fn text_outside_runs_is_ignored() {
        let xml = "<w:document><w:body><w:p><w:instrText>PAGE</w:instrText><w:t>kept</w:t></w:p></w:body></w:document>";
        assert_eq!(docx_xml_to_text(xml), "kept");
    }

    #[test]
    fn malformed_tail_keeps_earlier_paragraphs() {
        let xml = "<w:document><w:body><w:p><w:r><w:t>First</w:t></w:r></w:p><w:p><w:r><w:t>Second</w:x></w:body>";
        let text = docx_xml_to_text(xml);
        assert!(text.starts_with("First"), "got {text:?}");
    }
}
