// readme-fetch: download README PDFs from the reproducibility catalog
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use log::{info, warn};

use readme_miner::catalog::{existing_catalog_ids, Fetcher, DEFAULT_BASE_URL};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch README PDFs from the World Bank reproducibility catalog")]
struct Args {
    /// Target number of README files in the output directory
    #[arg(long, default_value_t = 200)]
    limit: usize,

    /// Where downloaded PDFs land
    #[arg(long, default_value = "data/readmes")]
    out_dir: PathBuf,

    /// Catalog base URL (override for mirrors or local fixtures)
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!(
        "target: {} README files, output directory: {}",
        args.limit,
        args.out_dir.display()
    );

    let existing = existing_catalog_ids(&args.out_dir);
    info!("found {} existing catalog IDs", existing.len());

    let fetcher = Fetcher::new(&args.base_url)?;
    let plan = fetcher.build_download_plan(args.limit, &existing);
    if plan.is_empty() {
        bail!("nothing to download; check network or raise --limit");
    }
    info!("attempting {} downloads", plan.len());

    let mut ok = 0;
    for url in &plan {
        match fetcher.download_one(url, &args.out_dir) {
            Ok(_) => ok += 1,
            Err(e) => warn!("failed {url}: {e}"),
        }
        thread::sleep(Duration::from_millis(250));
    }

    let after = existing_catalog_ids(&args.out_dir);
    info!(
        "done: {ok}/{} succeeded (including already-present); {} new catalog IDs",
        plan.len(),
        after.difference(&existing).count()
    );
    Ok(())
}
