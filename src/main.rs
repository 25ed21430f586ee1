// readme-miner: batch-extract provenance metadata from README PDFs
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use readme_miner::config::{DEFAULT_REVIEW_MIN_SIGNALS, DEFAULT_TOP_K};
use readme_miner::pipeline::{run, RunConfig};
use readme_miner::sample::SampleMode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract dataset names, collection periods, sources and URLs from README PDFs")]
struct Args {
    /// Directory containing the input PDFs
    #[arg(long)]
    input_dir: PathBuf,

    /// Glob pattern applied inside the input directory
    #[arg(long, default_value = "*.pdf")]
    glob: String,

    /// CSV output path (defaults to outputs/results.csv when neither output
    /// flag is given)
    #[arg(long)]
    out_csv: Option<PathBuf>,

    /// JSONL output path
    #[arg(long)]
    out_jsonl: Option<PathBuf>,

    /// Keep the normalized text in the output records
    #[arg(long)]
    save_text: bool,

    /// Process at most N files (0 = all)
    #[arg(long, default_value_t = 0)]
    max_samples: usize,

    /// How to pick files when --max-samples limits the run
    #[arg(long, value_enum, default_value_t = SampleMode::First)]
    sample_mode: SampleMode,

    /// Seed for --sample-mode random
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Render summary charts
    #[arg(long)]
    viz: bool,

    /// Chart output directory
    #[arg(long, default_value = "outputs/viz")]
    viz_dir: PathBuf,

    /// Top-K cutoff for frequency charts
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Minimum detector hits before a record avoids needs_review
    #[arg(long, default_value_t = DEFAULT_REVIEW_MIN_SIGNALS)]
    review_min_signals: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cfg = RunConfig {
        input_dir: args.input_dir,
        pattern: args.glob,
        out_csv: args.out_csv,
        out_jsonl: args.out_jsonl,
        save_text: args.save_text,
        max_samples: args.max_samples,
        sample_mode: args.sample_mode,
        seed: args.seed,
        viz: args.viz,
        viz_dir: args.viz_dir,
        top_k: args.top_k,
        review_min_signals: args.review_min_signals,
    };

    let records = run(&cfg)?;
    println!("processed {} records", records.len());
    Ok(())
}
