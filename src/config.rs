// Configuration constants for readme-miner

/// Below this many non-whitespace characters, extracted text is treated as
/// implausibly short: the fallback extractor kicks in and the record is
/// flagged for review.
pub const MIN_TEXT_CHARS: usize = 60;

/// Default number of detector hits a record needs to avoid `needs_review`.
pub const DEFAULT_REVIEW_MIN_SIGNALS: usize = 2;

/// Default top-K cutoff for frequency charts.
pub const DEFAULT_TOP_K: usize = 20;

// Chart canvas size in pixels
pub const CHART_WIDTH: u32 = 960;
pub const CHART_HEIGHT: u32 = 540;

/// Separator for list-valued fields in CSV output.
pub const CSV_LIST_SEP: &str = "; ";
