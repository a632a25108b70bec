//! Referral document text extraction.
//!
//! Turns a referral document on disk into the ordered line sequence the extractor reads.
//! PDFs go through `pdf-extract`; any other file is assumed to be text that was already
//! extracted. Lines keep their `\n` terminator.
//!
//! The extractor's line positions (urgency on line 51, demographics from line 150, received
//! date on line 8 or 9) assume the line breaks of PyMuPDF's `get_text()` output.
//! `pdf-extract` breaks lines differently, so a PDF read here may put fields on other lines.
//! For production intake, extract the text with PyMuPDF and pass the `.txt` file.

use std::path::Path;

/// Errors that can occur while loading a document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document could not be read
    #[error("failed to read document {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// PDF text extraction failed (encrypted, corrupt or image-only PDF)
    #[error("failed to extract text from {path}: {message}")]
    PdfExtraction { path: String, message: String },

    /// The document produced no text at all
    #[error("document {0} contains no text")]
    Empty(String),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Load the lines of the document at `path`.
pub fn load_lines(path: &Path) -> DocumentResult<Vec<String>> {
    let text = load_text(path)?;
    if text.trim().is_empty() {
        return Err(DocumentError::Empty(path.display().to_string()));
    }

    let lines = split_lines(&text);
    tracing::debug!(path = %path.display(), lines = lines.len(), "loaded document");
    Ok(lines)
}

/// Read the full text of the document at `path`.
pub fn load_text(path: &Path) -> DocumentResult<String> {
    if is_pdf(path) {
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| DocumentError::PdfExtraction {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    } else {
        std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Split text into lines, keeping each line's terminator.
///
/// `\r\n` endings are normalised to `\n`.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n')
        .map(|line| match line.strip_suffix("\r\n") {
            Some(stripped) => format!("{stripped}\n"),
            None => line.to_string(),
        })
        .collect()
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
