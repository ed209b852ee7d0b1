use std::path::Path;

use crate::document::{is_metadata_path, Document, DocumentKind};
use crate::error::Result;
use crate::extract::{html_to_text, xml_to_text};
use crate::markup::{self, ParseResult};

/// What the dispatcher does with a path, decided before anything is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Extract(DocumentKind),
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `.doc.` / `.toc.` XML files describe a document but hold no text.
    Metadata,
    /// Neither `.xml` nor `.html`.
    Unsupported,
}

pub fn route(path: &Path) -> Route {
    match DocumentKind::from_path(path) {
        None => Route::Skip(SkipReason::Unsupported),
        Some(DocumentKind::Xml) if is_metadata_path(path) => Route::Skip(SkipReason::Metadata),
        Some(kind) => Route::Extract(kind),
    }
}

/// Text of a file whose bytes the caller already holds. Skipped paths
/// yield an empty string without touching the bytes.
pub fn extract_text(path: &Path, data: &[u8]) -> ParseResult<String> {
    let kind = match route(path) {
        Route::Extract(kind) => kind,
        Route::Skip(reason) => {
            tracing::debug!(path = %path.display(), ?reason, "skipping file");
            return Ok(String::new());
        }
    };

    let document = Document::from_bytes(path.display().to_string(), kind, data)?;
    extract_document(&document)
}

pub fn extract_document(document: &Document) -> ParseResult<String> {
    let tree = markup::load(document)?;

    let text = match tree.kind() {
        DocumentKind::Html => html_to_text(&tree),
        DocumentKind::Xml => xml_to_text(&tree),
    };

    tracing::debug!(
        id = document.id(),
        declared = %tree.declared_kind(),
        extracted = %tree.kind(),
        chars = text.len(),
        "extracted text"
    );
    Ok(text)
}

/// Reads and extracts one file. Skipped paths are never opened.
pub fn extract_file(path: &Path) -> Result<String> {
    if let Route::Skip(reason) = route(path) {
        tracing::debug!(path = %path.display(), ?reason, "skipping file");
        return Ok(String::new());
    }

    let data = std::fs::read(path)?;
    Ok(extract_text(path, &data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::ParseError;

    #[test]
    fn test_route() {
        assert_eq!(
            route(Path::new("a/b/L_2019.01000101.xml")),
            Route::Extract(DocumentKind::Xml)
        );
        assert_eq!(
            route(Path::new("a/b/DOC_1.html")),
            Route::Extract(DocumentKind::Html)
        );
        assert_eq!(
            route(Path::new("a/b/report.doc.xml")),
            Route::Skip(SkipReason::Metadata)
        );
        assert_eq!(
            route(Path::new("a/b/L_2019.toc.fmx.xml")),
            Route::Skip(SkipReason::Metadata)
        );
        assert_eq!(
            route(Path::new("a/b/DOC_1.pdf")),
            Route::Skip(SkipReason::Unsupported)
        );
    }

    #[test]
    fn test_html_with_doc_marker_still_extracted() {
        let text = extract_text(Path::new("a/report.doc.html"), b"<p>kept</p>").unwrap();
        assert_eq!(text, "kept");
    }

    #[test]
    fn test_metadata_file_not_parsed() {
        // invalid utf-8 would fail if the bytes were ever decoded
        let text = extract_text(Path::new("a/report.doc.xml"), &[0xff, 0xfe, 0x00]).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_unsupported_extension_is_empty() {
        let text = extract_text(Path::new("a/notes.txt"), b"plain").unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_html_example() {
        let text = extract_text(
            Path::new("a/DOC_1.html"),
            b"<p>Hello  world .</p><p>Second, line.</p>",
        )
        .unwrap();
        assert_eq!(text, "Hello world.\nSecond, line.");
    }

    #[test]
    fn test_xml_footnote_example() {
        let data = br#"<?xml version="1.0" encoding="UTF-8"?>
<ACT>
  <NOTE NOTE.ID="E0001" TYPE="FOOTNOTE"><P>OJ C 1, 1.1.2019, p. 1.</P></NOTE>
  <ENACTING.TERMS><P>Clause text .</P></ENACTING.TERMS>
</ACT>"#;
        let text = extract_text(Path::new("a/L_2019.01000101.xml"), data).unwrap();
        assert_eq!(text, "Clause text.");
    }

    #[test]
    fn test_xml_declared_html_routed_to_html() {
        let data = br#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html><body><p>First .</p><p>Second</p></body></html>"#;
        let text = extract_text(Path::new("a/DOC_1.xml"), data).unwrap();
        assert_eq!(text, "First.\nSecond");
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let result = extract_text(Path::new("a/DOC_1.html"), &[0x3c, 0x70, 0xff]);
        assert!(matches!(result, Err(ParseError::Encoding(_))));
    }

    #[test]
    fn test_extract_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DOC_1.html");
        std::fs::write(&path, "<p>On  file ,</p>").unwrap();
        assert_eq!(extract_file(&path).unwrap(), "On file,");

        let missing = dir.path().join("missing.doc.xml");
        assert_eq!(extract_file(&missing).unwrap(), "");
    }
}
