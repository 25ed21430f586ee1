// Aggregation counters and summary chart rendering
//
// Tallying is always available; chart rendering sits behind the `viz`
// feature. A build without it warns and skips, the run itself still
// succeeds.
use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::types::Record;

static RE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());

/// Lowercased host of a URL, or `""` when it cannot be parsed.
pub fn domain_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_default()
}

/// Frequency counters over a record batch.
#[derive(Debug, Default)]
pub struct Tally {
    pub sources: HashMap<String, u64>,
    pub datasets: HashMap<String, u64>,
    pub domains: HashMap<String, u64>,
    pub urls_per_file: Vec<usize>,
    pub years: Vec<i32>,
    /// (false count, true count) per flag
    pub needs_review: (u64, u64),
    pub has_declaration: (u64, u64),
    pub availability: (u64, u64),
}

fn bump_flag(counter: &mut (u64, u64), value: bool) {
    if value {
        counter.1 += 1;
    } else {
        counter.0 += 1;
    }
}

pub fn tally(records: &[Record]) -> Tally {
    let mut t = Tally::default();
    for r in records {
        for s in &r.source_mentions {
            if !s.is_empty() {
                *t.sources.entry(s.clone()).or_default() += 1;
            }
        }
        for d in &r.dataset_candidates {
            if !d.is_empty() {
                *t.datasets.entry(d.clone()).or_default() += 1;
            }
        }
        t.urls_per_file.push(r.urls.len());
        for u in &r.urls {
            let domain = domain_of(u);
            if !domain.is_empty() {
                *t.domains.entry(domain).or_default() += 1;
            }
        }
        for mention in &r.time_mentions {
            for cap in RE_YEAR.captures_iter(mention) {
                if let Ok(year) = cap[1].parse::<i32>() {
                    t.years.push(year);
                }
            }
        }
        bump_flag(&mut t.needs_review, r.needs_review);
        bump_flag(&mut t.has_declaration, r.has_declaration);
        bump_flag(&mut t.availability, r.availability_section_found);
    }
    t
}

/// Top-K entries by count, descending; ties break alphabetically so chart
/// output is deterministic.
pub fn top_k(counts: &HashMap<String, u64>, k: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> =
        counts.iter().map(|(name, n)| (name.clone(), *n)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(k);
    entries
}

#[cfg(feature = "viz")]
mod charts {
    use std::collections::BTreeMap;
    use std::path::Path;

    use anyhow::{anyhow, Result};
    use plotters::prelude::*;

    use crate::config::{CHART_HEIGHT, CHART_WIDTH};

    fn truncate_label(label: &str) -> String {
        const MAX: usize = 28;
        if label.chars().count() <= MAX {
            label.to_string()
        } else {
            let head: String = label.chars().take(MAX - 1).collect();
            format!("{head}\u{2026}")
        }
    }

    /// Vertical bar chart over labeled categories.
    pub fn bar_chart(entries: &[(String, u64)], title: &str, path: &Path) -> Result<()> {
        let peak = entries.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1);
        let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{e}"))?;
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(120)
            .y_label_area_size(48)
            .build_cartesian_2d(0i32..entries.len() as i32, 0u64..peak + peak / 10 + 1)
            .map_err(|e| anyhow!("{e}"))?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(entries.len())
            .x_label_formatter(&|idx: &i32| {
                entries
                    .get(*idx as usize)
                    .map(|(name, _)| truncate_label(name))
                    .unwrap_or_default()
            })
            .y_desc("Count")
            .draw()
            .map_err(|e| anyhow!("{e}"))?;
        chart
            .draw_series(entries.iter().enumerate().map(|(i, (_, n))| {
                Rectangle::new([(i as i32, 0u64), (i as i32 + 1, *n)], BLUE.mix(0.6).filled())
            }))
            .map_err(|e| anyhow!("{e}"))?;
        root.present().map_err(|e| anyhow!("{e}"))?;
        Ok(())
    }

    /// Histogram over integer values (URL counts, years).
    pub fn histogram(values: &[i64], title: &str, x_desc: &str, path: &Path) -> Result<()> {
        let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
        for v in values {
            *counts.entry(*v).or_default() += 1;
        }
        let (lo, hi) = match (counts.keys().next(), counts.keys().next_back()) {
            (Some(lo), Some(hi)) => (*lo, *hi),
            _ => return Ok(()),
        };
        let peak = counts.values().copied().max().unwrap_or(0).max(1);

        let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{e}"))?;
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(48)
            .y_label_area_size(48)
            .build_cartesian_2d(lo..hi + 1, 0u64..peak + peak / 10 + 1)
            .map_err(|e| anyhow!("{e}"))?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x_desc)
            .y_desc("Frequency")
            .draw()
            .map_err(|e| anyhow!("{e}"))?;
        chart
            .draw_series(counts.iter().map(|(v, n)| {
                Rectangle::new([(*v, 0u64), (*v + 1, *n)], BLUE.mix(0.6).filled())
            }))
            .map_err(|e| anyhow!("{e}"))?;
        root.present().map_err(|e| anyhow!("{e}"))?;
        Ok(())
    }
}

#[cfg(feature = "viz")]
pub fn save_visualizations(records: &[Record], out_dir: &Path, k: usize) -> Result<()> {
    use log::warn;

    std::fs::create_dir_all(out_dir)?;
    let t = tally(records);

    // Each chart is skipped when its counter is empty; a render failure
    // warns and moves on so one bad chart cannot sink the batch.
    let render = |name: &str, result: Result<()>| {
        if let Err(e) = result {
            warn!("chart {name} failed: {e}");
        }
    };

    if !t.sources.is_empty() {
        let name = format!("sources_top{k}.png");
        render(
            &name,
            charts::bar_chart(
                &top_k(&t.sources, k),
                &format!("Top {k} Sources"),
                &out_dir.join(&name),
            ),
        );
    }
    if !t.datasets.is_empty() {
        let name = format!("datasets_top{k}.png");
        render(
            &name,
            charts::bar_chart(
                &top_k(&t.datasets, k),
                &format!("Top {k} Dataset Candidates"),
                &out_dir.join(&name),
            ),
        );
    }
    if !t.domains.is_empty() {
        let name = format!("domains_top{k}.png");
        render(
            &name,
            charts::bar_chart(
                &top_k(&t.domains, k),
                &format!("Top {k} URL Domains"),
                &out_dir.join(&name),
            ),
        );
    }
    if !t.urls_per_file.is_empty() {
        let values: Vec<i64> = t.urls_per_file.iter().map(|n| *n as i64).collect();
        render(
            "urls_per_file_hist.png",
            charts::histogram(
                &values,
                "Distribution of URL Counts per PDF",
                "URLs per file",
                &out_dir.join("urls_per_file_hist.png"),
            ),
        );
    }
    {
        let mut distinct = t.years.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() >= 2 {
            let values: Vec<i64> = t.years.iter().map(|y| *y as i64).collect();
            render(
                "years_hist.png",
                charts::histogram(
                    &values,
                    "Histogram of Mentioned Years",
                    "Year mentioned",
                    &out_dir.join("years_hist.png"),
                ),
            );
        }
    }
    for (flag, counter) in [
        ("needs_review", t.needs_review),
        ("has_declaration", t.has_declaration),
        ("availability_section_found", t.availability),
    ] {
        if counter.0 + counter.1 == 0 {
            continue;
        }
        let entries = vec![
            ("false".to_string(), counter.0),
            ("true".to_string(), counter.1),
        ];
        let name = format!("{flag}_bar.png");
        render(
            &name,
            charts::bar_chart(&entries, &format!("Files by {flag}"), &out_dir.join(&name)),
        );
    }
    Ok(())
}

#[cfg(not(feature = "viz"))]
pub fn save_visualizations(_records: &[Record], _out_dir: &Path, _k: usize) -> Result<()> {
    log::warn!("built without the `viz` feature; skipping chart generation");
    Ok(())
}
