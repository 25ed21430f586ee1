// Batch pipeline: discover, sample, extract, write, chart
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info, warn};

use crate::config::{DEFAULT_REVIEW_MIN_SIGNALS, DEFAULT_TOP_K, MIN_TEXT_CHARS};
use crate::fields::extract_fields;
use crate::normalize::normalize_text;
use crate::output::{write_csv, write_jsonl};
use crate::pdf_text::{non_ws_len, pdf_to_text};
use crate::sample::{select_sample, SampleMode};
use crate::types::{MinerError, Record};
use crate::viz::save_visualizations;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub pattern: String,
    pub out_csv: Option<PathBuf>,
    pub out_jsonl: Option<PathBuf>,
    pub save_text: bool,
    pub max_samples: usize,
    pub sample_mode: SampleMode,
    pub seed: u64,
    pub viz: bool,
    pub viz_dir: PathBuf,
    pub top_k: usize,
    pub review_min_signals: usize,
}

impl RunConfig {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            pattern: "*.pdf".to_string(),
            out_csv: None,
            out_jsonl: None,
            save_text: false,
            max_samples: 0,
            sample_mode: SampleMode::First,
            seed: 42,
            viz: false,
            viz_dir: PathBuf::from("outputs/viz"),
            top_k: DEFAULT_TOP_K,
            review_min_signals: DEFAULT_REVIEW_MIN_SIGNALS,
        }
    }
}

/// Files matching `pattern` under `dir`, sorted so listing order is stable
/// across filesystems.
pub fn discover_inputs(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, MinerError> {
    if !dir.is_dir() {
        return Err(MinerError::InputDirMissing(dir.to_path_buf()));
    }
    let full_pattern = dir.join(pattern).to_string_lossy().into_owned();
    let paths = glob::glob(&full_pattern).map_err(|source| MinerError::BadPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files: Vec<PathBuf> = paths.filter_map(|entry| entry.ok()).collect();
    files.sort();
    if files.is_empty() {
        return Err(MinerError::NoMatches {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }
    Ok(files)
}

/// Extract one record. Per-file failures degrade to empty fields; this
/// never errors.
pub fn process_file(path: &Path, save_text: bool, review_min_signals: usize) -> Record {
    let raw = pdf_to_text(path);
    let text = normalize_text(&raw);
    let hits = extract_fields(&text);

    let too_short = non_ws_len(&text) < MIN_TEXT_CHARS;
    let needs_review = too_short || hits.signal_count() < review_min_signals;
    if needs_review {
        debug!(
            "{} flagged for review (short: {too_short}, signals: {})",
            path.display(),
            hits.signal_count()
        );
    }

    Record {
        file: path.display().to_string(),
        text: save_text.then_some(text),
        has_declaration: hits.has_declaration,
        availability_section_found: hits.availability_section_found,
        needs_review,
        dataset_candidates: hits.dataset_candidates,
        source_mentions: hits.source_mentions,
        time_mentions: hits.time_mentions,
        urls: hits.urls,
    }
}

/// Run the whole batch. Returns the record list for callers that want the
/// in-memory results as well as the files on disk.
pub fn run(cfg: &RunConfig) -> Result<Vec<Record>> {
    let files = discover_inputs(&cfg.input_dir, &cfg.pattern)?;
    let selected = select_sample(&files, cfg.max_samples, cfg.sample_mode, cfg.seed);
    info!(
        "processing {} of {} files from {}",
        selected.len(),
        files.len(),
        cfg.input_dir.display()
    );

    let records: Vec<Record> = selected
        .iter()
        .map(|path| process_file(path, cfg.save_text, cfg.review_min_signals))
        .collect();

    let flagged = records.iter().filter(|r| r.needs_review).count();
    if flagged > 0 {
        info!("{flagged} of {} records flagged needs_review", records.len());
    }

    match (&cfg.out_csv, &cfg.out_jsonl) {
        (None, None) => {
            let default_csv = PathBuf::from("outputs/results.csv");
            warn!("no output path given, writing {}", default_csv.display());
            write_csv(&records, &default_csv)?;
        }
        (csv, jsonl) => {
            if let Some(path) = csv {
                write_csv(&records, path)?;
                info!("wrote {}", path.display());
            }
            if let Some(path) = jsonl {
                write_jsonl(&records, path)?;
                info!("wrote {}", path.display());
            }
        }
    }

    if cfg.viz {
        save_visualizations(&records, &cfg.viz_dir, cfg.top_k)?;
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn discover_rejects_missing_directory() {
        let err = discover_inputs(Path::new("/no/such/dir"), "*.pdf").unwrap_err();
        assert!(matches!(err, MinerError::InputDirMissing(_)));
    }

    #[test]
    fn discover_rejects_empty_match() {
        let dir = tempdir().unwrap();
        let err = discover_inputs(dir.path(), "*.pdf").unwrap_err();
        assert!(matches!(err, MinerError::NoMatches { .. }));
    }

    #[test]
    fn discover_sorts_matches() {
        let dir = tempdir().unwrap();
        for name in ["b.pdf", "a.pdf", "c.pdf", "skip.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let files = discover_inputs(dir.path(), "*.pdf").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn unreadable_pdf_yields_flagged_empty_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"not a pdf at all").unwrap();

        let record = process_file(&path, false, DEFAULT_REVIEW_MIN_SIGNALS);
        assert!(record.needs_review);
        assert!(!record.has_declaration);
        assert!(record.urls.is_empty());
        assert!(record.text.is_none());
    }
}
