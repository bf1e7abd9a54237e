//! Document text extraction

use crate::ExtractionError;
use std::panic::{self, AssertUnwindSafe};
use url::Url;

/// Whether a document URL points at a PDF
pub fn is_pdf(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".pdf")
}

/// Extracts the text of a PDF, reporting failures
///
/// The PDF parser can panic on malformed input, so the call is isolated and
/// a panic surfaces as [`ExtractionError::Panic`].
pub fn try_extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractionError::Pdf(format!("{:?}", e))),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ExtractionError::Panic(message))
        }
    }
}

/// Extracts the text of a PDF; any failure yields an empty string
pub fn extract_pdf_text(bytes: &[u8]) -> String {
    match try_extract_pdf_text(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("PDF text extraction failed: {}", e);
            String::new()
        }
    }
}
