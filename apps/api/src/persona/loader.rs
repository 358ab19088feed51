//! Document Loader — turns the resume file into plain text.
//!
//! PDFs go through `pdf-extract`; any other extension is read as UTF-8 text.
//! Extraction is blocking, so async callers use `load_resume_text`.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} not found.", .0.display())]
    NotFound(PathBuf),

    #[error("Resume text is empty.")]
    EmptyDocument,

    #[error("Could not extract text from {}: {reason}", .path.display())]
    Extraction { path: PathBuf, reason: String },
}

/// Reads and trims the resume text at `path`.
pub fn read_resume_text(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let raw = if is_pdf(path) {
        extract_pdf_text(path)?
    } else {
        std::fs::read_to_string(path).map_err(|e| LoadError::Extraction {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
    };

    let text = raw.trim();
    if text.is_empty() {
        return Err(LoadError::EmptyDocument);
    }
    Ok(text.to_string())
}

/// Runs `read_resume_text` on the blocking pool.
pub async fn load_resume_text(path: PathBuf) -> Result<String, LoadError> {
    let fallback = path.clone();
    tokio::task::spawn_blocking(move || read_resume_text(&path))
        .await
        .unwrap_or_else(|e| {
            Err(LoadError::Extraction {
                path: fallback,
                reason: format!("loader task failed: {e}"),
            })
        })
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn extract_pdf_text(path: &Path) -> Result<String, LoadError> {
    // pdf-extract panics on some malformed documents.
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_by_pages(path));
    match result {
        Ok(Ok(pages)) => Ok(join_pages(&pages)),
        Ok(Err(e)) => Err(LoadError::Extraction {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
        Err(_) => Err(LoadError::Extraction {
            path: path.to_path_buf(),
            reason: "PDF reader panicked while parsing the document".to_string(),
        }),
    }
}

/// One newline between consecutive pages, blank pages included.
fn join_pages(pages: &[String]) -> String {
    pages.join("\n")
}
