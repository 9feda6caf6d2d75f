//! Local document handling
//!
//! A [`DocumentFile`] is the file the user picked: its name, raw bytes, and
//! a MIME type derived the way a browser file input would (from the
//! extension, with a `%PDF-` signature check for extension-less files).
//! PDFs go to the upload endpoint; anything else is decoded as text into
//! the paste buffer without touching the network.

use crate::error::{QuicknoteError, Result};
use regex::bytes::Regex;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// MIME type of PDF documents
pub const PDF_MIME: &str = "application/pdf";

const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// A user-selected document held client-side
///
/// Bytes are shared so the document can be handed to an upload request and
/// kept for preview without copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl DocumentFile {
    /// Build a document from in-memory content
    ///
    /// # Examples
    ///
    /// ```
    /// use quicknote::document::DocumentFile;
    ///
    /// let doc = DocumentFile::from_bytes("notes.txt", b"hello".to_vec());
    /// assert_eq!(doc.mime_type(), "text/plain");
    /// assert!(!doc.is_pdf());
    /// ```
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = detect_mime_type(&name, &bytes).to_string();
        Self {
            name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    /// Read a document from disk
    ///
    /// # Errors
    ///
    /// Returns [`QuicknoteError::FileLoad`] if the path has no file name or
    /// cannot be read
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                QuicknoteError::FileLoad(format!("Not a file path: {}", path.display()))
            })?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            QuicknoteError::FileLoad(format!("Failed to read {}: {}", path.display(), e))
        })?;

        tracing::debug!(name = %name, size = bytes.len(), "Loaded document");
        Ok(Self::from_bytes(name, bytes))
    }

    /// File name without directories
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Detected MIME type
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Raw content
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Content size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document has no content
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether this document takes the upload path
    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME
    }

    /// Decode the content as text, replacing invalid UTF-8 sequences
    pub fn decode_text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Number of pages for the preview
    ///
    /// Counts `/Type /Page` objects (not `/Pages` tree nodes). Non-PDF
    /// documents and PDFs whose page objects cannot be found (compressed
    /// object streams) report a single page.
    pub fn page_count(&self) -> usize {
        if !self.is_pdf() {
            return 1;
        }
        page_object_regex().find_iter(&self.bytes).count().max(1)
    }
}

fn page_object_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/Type\s*/Page(?-u:\b)").expect("static regex"))
}

/// MIME type for a file name, falling back to content sniffing
fn detect_mime_type(name: &str, bytes: &[u8]) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());

    match extension.as_deref() {
        Some("pdf") => PDF_MIME,
        Some("txt") => "text/plain",
        Some("md") | Some("markdown") => "text/markdown",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        None if bytes.starts_with(PDF_SIGNATURE) => PDF_MIME,
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_pdf(pages: usize) -> Vec<u8> {
        let mut body = String::from("%PDF-1.4\n1 0 obj << /Type /Pages /Count 0 >> endobj\n");
        for i in 0..pages {
            body.push_str(&format!("{} 0 obj << /Type /Page /Parent 1 0 R >> endobj\n", i + 2));
        }
        body.into_bytes()
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(DocumentFile::from_bytes("a.pdf", vec![]).mime_type(), PDF_MIME);
        assert_eq!(DocumentFile::from_bytes("A.PDF", vec![]).mime_type(), PDF_MIME);
        assert_eq!(
            DocumentFile::from_bytes("a.txt", vec![]).mime_type(),
            "text/plain"
        );
        assert_eq!(
            DocumentFile::from_bytes("a.doc", vec![]).mime_type(),
            "application/msword"
        );
        assert_eq!(
            DocumentFile::from_bytes("a.bin", vec![]).mime_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_extension_wins_over_signature() {
        let doc = DocumentFile::from_bytes("looks-like.txt", fake_pdf(1));
        assert!(!doc.is_pdf());
    }

    #[test]
    fn test_signature_used_without_extension() {
        assert!(DocumentFile::from_bytes("paper", fake_pdf(1)).is_pdf());
        assert!(!DocumentFile::from_bytes("notes", b"plain".to_vec()).is_pdf());
    }

    #[test]
    fn test_decode_text_is_lossy() {
        let doc = DocumentFile::from_bytes("a.txt", vec![b'h', b'i', 0xff]);
        assert_eq!(doc.decode_text(), "hi\u{fffd}");
    }

    #[test]
    fn test_page_count_skips_pages_node() {
        let doc = DocumentFile::from_bytes("paper.pdf", fake_pdf(3));
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_page_count_minimum_one() {
        let pdf = DocumentFile::from_bytes("empty.pdf", b"%PDF-1.7\n".to_vec());
        assert_eq!(pdf.page_count(), 1);
        let text = DocumentFile::from_bytes("a.txt", b"/Type /Page".to_vec());
        assert_eq!(text.page_count(), 1);
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let dir = crate::test_utils::temp_dir();
        let path = crate::test_utils::create_test_file(&dir, "notes.txt", "abstract");
        let doc = DocumentFile::from_path(&path).await.unwrap();
        assert_eq!(doc.name(), "notes.txt");
        assert_eq!(doc.decode_text(), "abstract");
        assert_eq!(doc.len(), 8);
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = crate::test_utils::temp_dir();
        let result = DocumentFile::from_path(dir.path().join("missing.pdf")).await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("File load error"));
    }
}
