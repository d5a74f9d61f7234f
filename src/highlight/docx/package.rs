//! Reading and writing `.docx` containers.
//!
//! Only `word/document.xml` is parsed. Every other zip entry is copied to
//! the output byte-for-byte, compressed data included.

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use log::debug;
use zip::ZipArchive;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{MorphmarkError, Result};
use crate::highlight::docx::xml::{NodeId, XmlTree};

/// Path of the main document part inside the container.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// An opened word-processor document.
#[derive(Clone, Debug)]
pub struct DocxPackage {
    source: Vec<u8>,
    document: XmlTree,
}

impl DocxPackage {
    /// Open a `.docx` file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_bytes(bytes)
    }

    /// Open a `.docx` held in memory.
    ///
    /// Fails with a document error if the bytes are not a zip, the main part
    /// is missing, or it is not well-formed XML.
    pub fn from_bytes(source: Vec<u8>) -> Result<Self> {
        let xml = {
            let mut archive = ZipArchive::new(Cursor::new(source.as_slice()))
                .map_err(|e| MorphmarkError::document(format!("Not a docx container: {e}")))?;
            debug!("Opened docx with {} zip entries", archive.len());

            let mut xml = String::new();
            archive
                .by_name(DOCUMENT_PART)
                .map_err(|_| MorphmarkError::document(format!("{DOCUMENT_PART} is missing")))?
                .read_to_string(&mut xml)?;
            xml
        };

        let document = XmlTree::parse(&xml)
            .map_err(|e| MorphmarkError::document(format!("{DOCUMENT_PART}: {e}")))?;

        Ok(DocxPackage { source, document })
    }

    pub fn document(&self) -> &XmlTree {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut XmlTree {
        &mut self.document
    }

    /// The `w:body` element.
    pub fn body(&self) -> Result<NodeId> {
        self.document
            .root_element()
            .and_then(|root| self.document.first_child_named(root, "w:body"))
            .ok_or_else(|| MorphmarkError::document("w:body is missing"))
    }

    /// Serialize the package, re-encoding only the main document part.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut archive = ZipArchive::new(Cursor::new(self.source.as_slice()))?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let xml = self.document.to_xml()?;

        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index)?;
            if entry.name() == DOCUMENT_PART {
                let options = SimpleFileOptions::default()
                    .compression_method(zip::CompressionMethod::Deflated);
                drop(entry);
                writer.start_file(DOCUMENT_PART, options)?;
                writer.write_all(xml.as_bytes())?;
            } else {
                writer.raw_copy_file(entry)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Write the package to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), self.to_bytes()?)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal `.docx` bytes with the given `w:body` inner XML.
    pub fn docx_bytes(body: &str) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer.start_file(DOCUMENT_PART, options).unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.start_file("word/styles.xml", options).unwrap();
        writer.write_all(b"<w:styles/>").unwrap();
        writer.finish().unwrap().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::docx_bytes;
    use super::*;

    #[test]
    fn test_open_and_body() {
        let package = DocxPackage::from_bytes(docx_bytes("<w:p/>")).unwrap();
        let body = package.body().unwrap();
        assert_eq!(package.document().children(body).len(), 1);
    }

    #[test]
    fn test_not_a_zip() {
        let error = DocxPackage::from_bytes(b"plain text".to_vec()).unwrap_err();
        assert!(error.is_systemic());
    }

    #[test]
    fn test_other_entries_copied() {
        let package = DocxPackage::from_bytes(docx_bytes("<w:p/>")).unwrap();
        let bytes = package.to_bytes().unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<_> = archive.file_names().map(str::to_string).collect();
        assert_eq!(names.len(), 3);

        let mut styles = String::new();
        archive
            .by_name("word/styles.xml")
            .unwrap()
            .read_to_string(&mut styles)
            .unwrap();
        assert_eq!(styles, "<w:styles/>");
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");

        let package = DocxPackage::from_bytes(docx_bytes("<w:p><w:r><w:t>hi</w:t></w:r></w:p>"))
            .unwrap();
        package.save(&path).unwrap();

        let reopened = DocxPackage::open(&path).unwrap();
        assert_eq!(
            reopened.document().to_xml().unwrap(),
            package.document().to_xml().unwrap()
        );
    }
}
