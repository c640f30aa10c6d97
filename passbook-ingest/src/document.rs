//! Document unlocking and text rendering.
//!
//! Parsers only ever see the linear text of a document; getting there from
//! (possibly encrypted) bytes is the job of a [`TextExtractor`].

use passbook_core::DocumentError;

pub trait TextExtractor: Send + Sync {
    /// Unlock `bytes` with `password` and render all pages as newline-joined text
    fn extract_text(&self, bytes: &[u8], password: &str) -> Result<String, DocumentError>;
}

/// Input that is already text (UTF-8). The password is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, bytes: &[u8], _password: &str) -> Result<String, DocumentError> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| DocumentError::Extraction(format!("document is not valid UTF-8 text: {}", e)))
    }
}

/// PDF statements, decrypted in memory with `lopdf` and rendered by `pdf-extract`
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[cfg(feature = "pdf")]
impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8], password: &str) -> Result<String, DocumentError> {
        let mut doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| DocumentError::Extraction(format!("failed to load PDF: {}", e)))?;

        if doc.is_encrypted() {
            doc.decrypt(password).map_err(decrypt_error)?;
            doc.trailer.remove(b"Encrypt");
        }

        let mut unlocked = Vec::with_capacity(bytes.len());
        doc.save_to(&mut unlocked)
            .map_err(|e| DocumentError::Extraction(format!("failed to re-serialize PDF: {}", e)))?;

        pdf_extract::extract_text_from_mem(&unlocked)
            .map_err(|e| DocumentError::Extraction(format!("failed to extract text from PDF: {}", e)))
    }
}

/// Only a failed password check is the caller's fault; lopdf 0.34 decrypts
/// RC4 (V 1/2) documents and reports AES ones as unsupported.
#[cfg(feature = "pdf")]
fn decrypt_error(err: lopdf::Error) -> DocumentError {
    use lopdf::encryption::DecryptionError;

    tracing::debug!(error = %err, "PDF decryption failed");
    match err {
        lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => DocumentError::BadPassword,
        other => DocumentError::Extraction(format!("failed to decrypt PDF: {}", other)),
    }
}
