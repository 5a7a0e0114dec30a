//! Attached document handling.
//!
//! Text extraction from uploaded files is pluggable through
//! [`DocumentExtractor`]; whatever it produces is truncated before being
//! sent along with the conversation.

use std::path::Path;

pub const MAX_EXCERPT_CHARS: usize = 12_000;
pub const TRUNCATION_MARKER: &str = "\n[...document truncated...]";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document is not readable text: {0}")]
    Unsupported(String),

    #[error("Document contains no text")]
    Empty,
}

pub trait DocumentExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, DocumentError>;
}

/// Accepts UTF-8 text documents only.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        if bytes.contains(&0) {
            return Err(DocumentError::Unsupported("binary content".to_string()));
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DocumentError::Unsupported(e.to_string()))?;
        if text.trim().is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(text.to_string())
    }
}

/// Cut `text` to [`MAX_EXCERPT_CHARS`] characters and append
/// [`TRUNCATION_MARKER`]; shorter text is returned unchanged.
pub fn truncate_excerpt(text: &str) -> String {
    match text.char_indices().nth(MAX_EXCERPT_CHARS) {
        Some((cut, _)) => {
            let mut excerpt = String::with_capacity(cut + TRUNCATION_MARKER.len());
            excerpt.push_str(&text[..cut]);
            excerpt.push_str(TRUNCATION_MARKER);
            excerpt
        }
        None => text.to_string(),
    }
}

pub async fn load_excerpt(
    path: impl AsRef<Path>,
    extractor: &dyn DocumentExtractor,
) -> Result<String, DocumentError> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let text = extractor.extract(&bytes)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        chars = text.chars().count(),
        "extracted document text"
    );
    Ok(truncate_excerpt(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn short_excerpt_passes_through() {
        let text = "Blood pressure: 120/80";
        assert_eq!(truncate_excerpt(text), text);

        let exact = "a".repeat(MAX_EXCERPT_CHARS);
        assert_eq!(truncate_excerpt(&exact), exact);
    }

    #[test]
    fn long_excerpt_is_cut_to_limit_plus_marker() {
        let text = "b".repeat(MAX_EXCERPT_CHARS + 500);
        let excerpt = truncate_excerpt(&text);
        assert!(excerpt.ends_with(TRUNCATION_MARKER));
        let body = excerpt.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(body.chars().count(), MAX_EXCERPT_CHARS);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(MAX_EXCERPT_CHARS + 1);
        let excerpt = truncate_excerpt(&text);
        let body = excerpt.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(body.chars().count(), MAX_EXCERPT_CHARS);
    }

    #[test]
    fn plain_text_extractor_rejects_binary_and_empty() {
        let extractor = PlainTextExtractor;
        assert!(matches!(
            extractor.extract(b"%PDF\0\x01"),
            Err(DocumentError::Unsupported(_))
        ));
        assert!(matches!(
            extractor.extract(&[0xff, 0xfe, 0x41]),
            Err(DocumentError::Unsupported(_))
        ));
        assert!(matches!(extractor.extract(b"  \n"), Err(DocumentError::Empty)));
        assert_eq!(extractor.extract(b"notes").unwrap(), "notes");
    }

    #[tokio::test]
    async fn load_excerpt_reads_and_truncates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", "c".repeat(MAX_EXCERPT_CHARS + 1)).unwrap();

        let excerpt = load_excerpt(file.path(), &PlainTextExtractor).await.unwrap();
        assert!(excerpt.ends_with(TRUNCATION_MARKER));
    }

    #[tokio::test]
    async fn load_excerpt_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_excerpt(dir.path().join("missing.txt"), &PlainTextExtractor).await;
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }
}
