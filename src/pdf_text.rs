// PDF to text with primary/fallback routing
//
// Primary: pdf-extract. Fallback: lopdf's built-in extractor, used when the
// primary errors out or returns implausibly short output. Mirrors the
// router's contract elsewhere in the pipeline: this function never fails,
// a document that defeats both extractors yields an empty string.
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use log::{debug, warn};
use lopdf::Document;

use crate::config::MIN_TEXT_CHARS;

/// Count of non-whitespace characters, the plausibility metric for
/// extractor output.
pub fn non_ws_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

fn primary_extract(path: &Path) -> String {
    // pdf-extract panics on some malformed documents; contain it.
    let result = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));
    match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            debug!("pdf-extract failed on {}: {e}", path.display());
            String::new()
        }
        Err(_) => {
            warn!("pdf-extract panicked on {}", path.display());
            String::new()
        }
    }
}

fn fallback_extract(path: &Path) -> String {
    let doc = match Document::load(path) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("lopdf failed to load {}: {e}", path.display());
            return String::new();
        }
    };
    let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();
    if page_numbers.is_empty() {
        return String::new();
    }

    match doc.extract_text(&page_numbers) {
        Ok(text) => text,
        Err(_) => {
            // One bad page should not sink the rest of the document.
            let mut out = String::new();
            for n in &page_numbers {
                if let Ok(t) = doc.extract_text(&[*n]) {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str(&t);
                }
            }
            out
        }
    }
}

/// Extract text from a PDF. Falls back to lopdf when pdf-extract errors or
/// yields fewer than [`MIN_TEXT_CHARS`] non-whitespace characters. The
/// fallback result replaces the primary one outright; the primary text is
/// only kept if the fallback comes back empty.
pub fn pdf_to_text(path: &Path) -> String {
    let primary = primary_extract(path);
    if non_ws_len(&primary) >= MIN_TEXT_CHARS {
        return primary;
    }

    debug!(
        "primary extraction too short for {} ({} chars), trying fallback",
        path.display(),
        non_ws_len(&primary)
    );
    let fallback = fallback_extract(path);
    if fallback.trim().is_empty() {
        primary
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_ws_len_ignores_all_whitespace() {
        assert_eq!(non_ws_len("a b\tc\nd  "), 4);
        assert_eq!(non_ws_len("  \n\t "), 0);
        assert_eq!(non_ws_len(""), 0);
    }

    #[test]
    fn unreadable_file_yields_empty_string() {
        let text = pdf_to_text(Path::new("/nonexistent/readme.pdf"));
        assert_eq!(text, "");
    }
}
