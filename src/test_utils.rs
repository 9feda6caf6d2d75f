//! Test utilities for QuickNote
//!
//! This module provides common test utilities including temporary directory
//! management, sample documents, and assertion helpers.

use crate::config::Config;
use crate::error::Result;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Bytes of a minimal PDF with `pages` page objects
///
/// Not a renderable PDF, but enough for MIME sniffing and page counting.
pub fn sample_pdf_bytes(pages: usize) -> Vec<u8> {
    let mut pdf = b"%PDF-1.4\n1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n".to_vec();
    pdf.extend_from_slice(b"2 0 obj << /Type /Pages /Count ");
    pdf.extend_from_slice(pages.to_string().as_bytes());
    pdf.extend_from_slice(b" >> endobj\n");
    for i in 0..pages {
        pdf.extend_from_slice(format!("{} 0 obj << /Type /Page /Parent 2 0 R >> endobj\n", i + 3).as_bytes());
    }
    pdf.extend_from_slice(b"%%EOF\n");
    pdf
}

/// Write a sample PDF into `dir`
///
/// # Panics
///
/// Panics if writing fails
pub fn create_test_pdf(dir: &TempDir, name: &str, pages: usize) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, sample_pdf_bytes(pages)).expect("Failed to write test PDF");
    path
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Configuration for tests: defaults with the reveal turned off
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.reveal.enabled = false;
    config
}

/// A complete configuration file
pub fn test_config_yaml() -> String {
    r#"
api:
  base_url: http://127.0.0.1:5000/api
  timeout_seconds: 30
  max_upload_bytes: 1048576
reveal:
  enabled: false
  step_delay_ms: 5
  chars_per_step: 2
interface:
  paste_soft_limit: 500
  suggestions:
    - Summarize this paper
  delete_session_on_exit: false
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentFile;
    use crate::error::QuicknoteError;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "content");
    }

    #[test]
    fn test_sample_pdf_page_count() {
        let doc = DocumentFile::from_bytes("sample.pdf", sample_pdf_bytes(4));
        assert!(doc.is_pdf());
        assert_eq!(doc.page_count(), 4);
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<()> = Err(QuicknoteError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    fn test_test_config_yaml() {
        let config: Config = serde_yaml::from_str(&test_config_yaml()).unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.reveal.enabled);
        assert_eq!(config.interface.suggestions.len(), 1);
        assert!(test_config().validate().is_ok());
    }
}
