// Input-list sampling
use std::path::PathBuf;

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleMode {
    /// Deterministic prefix of the (sorted) input list.
    First,
    /// Seeded random sample without replacement.
    Random,
}

/// Subsample the input file list. Returns the list unchanged when
/// `max_samples` is zero or covers the whole list. `Random` draws without
/// replacement and is reproducible for a given seed.
pub fn select_sample(
    paths: &[PathBuf],
    max_samples: usize,
    mode: SampleMode,
    seed: u64,
) -> Vec<PathBuf> {
    if max_samples == 0 || max_samples >= paths.len() {
        return paths.to_vec();
    }
    match mode {
        SampleMode::First => paths[..max_samples].to_vec(),
        SampleMode::Random => {
            let mut rng = StdRng::seed_from_u64(seed);
            rand::seq::index::sample(&mut rng, paths.len(), max_samples)
                .into_iter()
                .map(|i| paths[i].clone())
                .collect()
        }
    }
}
