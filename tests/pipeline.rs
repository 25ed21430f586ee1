// End-to-end pipeline tests over generated PDFs
mod common;

use std::fs;

use readme_miner::pipeline::{run, RunConfig};
use readme_miner::sample::SampleMode;
use tempfile::tempdir;

use common::{rich_readme_lines, write_pdf};

fn filler_lines(tag: &str) -> Vec<String> {
    vec![
        format!("README for package {tag}"),
        "This document describes the replication materials in detail,".to_string(),
        "including code, datasets, and instructions for reviewers.".to_string(),
    ]
}

fn write_filler_pdf(path: &std::path::Path, tag: &str) {
    let lines = filler_lines(tag);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_pdf(path, &refs);
}

#[test]
fn first_mode_processes_exactly_the_first_two_files() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    for name in ["aaa.pdf", "bbb.pdf", "ccc.pdf"] {
        write_filler_pdf(&input.path().join(name), name);
    }

    let mut cfg = RunConfig::new(input.path());
    cfg.max_samples = 2;
    cfg.sample_mode = SampleMode::First;
    cfg.out_csv = Some(output.path().join("results.csv"));
    let records = run(&cfg).unwrap();

    assert_eq!(records.len(), 2);
    assert!(records[0].file.ends_with("aaa.pdf"));
    assert!(records[1].file.ends_with("bbb.pdf"));

    let body = fs::read_to_string(output.path().join("results.csv")).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3, "header plus one row per processed file");
    assert!(lines[1].contains("aaa.pdf"));
    assert!(lines[2].contains("bbb.pdf"));
    assert!(!body.contains("ccc.pdf"));
}

#[test]
fn random_mode_with_fixed_seed_is_reproducible_across_runs() {
    let input = tempdir().unwrap();
    for i in 0..8 {
        write_filler_pdf(&input.path().join(format!("{i}.pdf")), "x");
    }

    let mut cfg = RunConfig::new(input.path());
    cfg.max_samples = 3;
    cfg.sample_mode = SampleMode::Random;
    cfg.seed = 7;
    cfg.out_csv = Some(tempdir().unwrap().path().join("a.csv"));

    let first: Vec<String> = run(&cfg).unwrap().into_iter().map(|r| r.file).collect();
    let second: Vec<String> = run(&cfg).unwrap().into_iter().map(|r| r.file).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn extracts_fields_from_a_readme_shaped_document() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_pdf(&input.path().join("readme.pdf"), &rich_readme_lines());

    let mut cfg = RunConfig::new(input.path());
    cfg.out_jsonl = Some(output.path().join("results.jsonl"));
    let records = run(&cfg).unwrap();

    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert!(r.has_declaration, "declaration boilerplate, got {r:?}");
    assert!(r.availability_section_found);
    assert!(!r.needs_review, "rich document should not need review");
    assert!(r
        .urls
        .iter()
        .any(|u| u.starts_with("https://microdata.worldbank.org/catalog/3823")));
    assert!(r
        .dataset_candidates
        .iter()
        .any(|d| d == "household_panel.dta"));
    assert!(r.dataset_candidates.iter().any(|d| d == "prices_2019.csv"));
    assert!(r.source_mentions.iter().any(|s| s == "World Bank"));
    assert!(r
        .source_mentions
        .iter()
        .any(|s| s == "National Bureau of Statistics"));
    assert!(r
        .time_mentions
        .iter()
        .any(|t| t.contains("2016") && t.contains("2019")));

    let body = fs::read_to_string(output.path().join("results.jsonl")).unwrap();
    assert_eq!(body.lines().count(), 1);
    assert!(body.contains("household_panel.dta"));
}

#[test]
fn save_text_keeps_normalized_text_in_records() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_pdf(&input.path().join("readme.pdf"), &rich_readme_lines());

    let mut cfg = RunConfig::new(input.path());
    cfg.save_text = true;
    cfg.out_jsonl = Some(output.path().join("results.jsonl"));
    let records = run(&cfg).unwrap();

    let text = records[0].text.as_deref().unwrap();
    assert!(text.contains("Declaration"));
    let body = fs::read_to_string(output.path().join("results.jsonl")).unwrap();
    assert!(body.contains("\"text\""));
}

#[test]
fn glob_pattern_filters_inputs() {
    let input = tempdir().unwrap();
    write_filler_pdf(&input.path().join("keep_readme.pdf"), "keep");
    write_filler_pdf(&input.path().join("other.pdf"), "other");

    let mut cfg = RunConfig::new(input.path());
    cfg.pattern = "keep_*.pdf".to_string();
    cfg.out_csv = Some(tempdir().unwrap().path().join("r.csv"));
    let records = run(&cfg).unwrap();

    assert_eq!(records.len(), 1);
    assert!(records[0].file.ends_with("keep_readme.pdf"));
}
