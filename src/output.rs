// CSV and JSONL record writers
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::CSV_LIST_SEP;
use crate::types::Record;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    Ok(())
}

pub fn join_list(items: &[String]) -> String {
    items.join(CSV_LIST_SEP)
}

/// One CSV row per record; list fields joined with `"; "`. The `text`
/// column is present but empty unless --save-text was given.
pub fn write_csv(records: &[Record], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "file",
        "has_declaration",
        "availability_section_found",
        "needs_review",
        "dataset_candidates",
        "source_mentions",
        "time_mentions",
        "urls",
        "n_urls",
        "text",
    ])?;
    for r in records {
        writer.write_record([
            r.file.as_str(),
            if r.has_declaration { "true" } else { "false" },
            if r.availability_section_found { "true" } else { "false" },
            if r.needs_review { "true" } else { "false" },
            &join_list(&r.dataset_candidates),
            &join_list(&r.source_mentions),
            &join_list(&r.time_mentions),
            &join_list(&r.urls),
            &r.urls.len().to_string(),
            r.text.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// One JSON object per line.
pub fn write_jsonl(records: &[Record], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    for r in records {
        let line = serde_json::to_string(r)?;
        writeln!(file, "{line}")?;
    }
    Ok(())
}
