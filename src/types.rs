// Core types for readme-miner
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One extracted record per input document. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Source file path, as given on the command line.
    pub file: String,
    /// Normalized text, kept only when `--save-text` was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub has_declaration: bool,
    pub availability_section_found: bool,
    pub needs_review: bool,
    /// Candidate dataset/file names, deduplicated in order of appearance.
    pub dataset_candidates: Vec<String>,
    /// Source-organization mentions, deduplicated in order of appearance.
    pub source_mentions: Vec<String>,
    /// Collection-period phrases as they appeared in the text.
    pub time_mentions: Vec<String>,
    /// Extracted URLs, deduplicated in order of appearance.
    pub urls: Vec<String>,
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum MinerError {
    #[error("input directory not found: {0}")]
    InputDirMissing(PathBuf),

    #[error("no files match pattern '{pattern}' under {dir}")]
    NoMatches { dir: PathBuf, pattern: String },

    #[error("bad glob pattern '{pattern}': {source}")]
    BadPattern {
        pattern: String,
        source: glob::PatternError,
    },
}
