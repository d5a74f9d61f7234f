//! Reading search terms from files.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{MorphmarkError, Result};
use crate::highlight::docx::mutator::{document_paragraphs, paragraph_text};
use crate::highlight::docx::package::DocxPackage;

/// Read one term per line from a text file, or one term per non-empty
/// paragraph from a `.docx`.
///
/// Terms are trimmed and empty ones skipped. De-duplication is left to
/// [`PhraseSet`](crate::search::phrase::PhraseSet).
pub fn read_terms<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let is_docx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));

    let terms = if is_docx {
        docx_terms(&DocxPackage::open(path)?)?
    } else {
        let bytes = fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|_| {
            MorphmarkError::invalid_argument(format!(
                "Terms file {} is not valid UTF-8",
                path.display()
            ))
        })?;
        text_terms(&text)
    };

    debug!("Read {} terms from {}", terms.len(), path.display());
    Ok(terms)
}

/// Non-empty trimmed lines. A leading byte order mark is ignored.
pub fn text_terms(text: &str) -> Vec<String> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Non-empty paragraphs of a document, in processing order.
pub fn docx_terms(package: &DocxPackage) -> Result<Vec<String>> {
    let tree = package.document();
    let body = package.body()?;
    Ok(document_paragraphs(tree, body)
        .into_iter()
        .map(|paragraph| paragraph_text(tree, paragraph).trim().to_string())
        .filter(|term| !term.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::docx::package::fixtures::docx_bytes;

    #[test]
    fn test_text_terms() {
        let terms = text_terms("\u{feff}кот\r\n\n  quick fox  \n\t\n");
        assert_eq!(terms, vec!["кот", "quick fox"]);
    }

    #[test]
    fn test_read_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.txt");
        fs::write(&path, "wolf\nfox\n").unwrap();

        assert_eq!(read_terms(&path).unwrap(), vec!["wolf", "fox"]);
    }

    #[test]
    fn test_read_docx_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.DOCX");
        let body = "<w:p><w:r><w:t>quick </w:t></w:r><w:r><w:t>fox</w:t></w:r></w:p>\
                    <w:p/>\
                    <w:p><w:r><w:t> wolf </w:t></w:r></w:p>";
        fs::write(&path, docx_bytes(body)).unwrap();

        assert_eq!(read_terms(&path).unwrap(), vec!["quick fox", "wolf"]);
    }

    #[test]
    fn test_missing_file() {
        let error = read_terms("/nonexistent/terms.txt").unwrap_err();
        assert!(matches!(error, MorphmarkError::Io(_)));
    }
}
