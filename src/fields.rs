// Pattern-based field detectors for normalized README text
//
// Each detector is independent and order-insensitive. A miss yields
// false/empty, never an error. Patterns target the reproducibility-package
// README genre: certification boilerplate, data availability statements,
// replication file lists, collection periods, and publishing organizations.
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static RE_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:declaration\b|i/we certify|(?:i|we) (?:hereby )?certify(?: that)?|certification of\b)",
    )
    .unwrap()
});

static RE_AVAILABILITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:data availability|availability (?:statement|of (?:the )?data)|available (?:at|from|online|upon request)|data (?:source|sources)\b|(?:obtained|downloaded) from)",
    )
    .unwrap()
});

// Filenames with data-bearing extensions
static RE_DATASET_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[\w][\w.\-]{0,80}\.(?:dta|csv|xlsx|xls|sav|rds|parquet|zip|json|txt)\b")
        .unwrap()
});

// Capitalized "<Name> Survey/Census/..." phrases
static RE_DATASET_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b[A-Z][A-Za-z0-9&()\-]*(?:[ \-][A-Z0-9][A-Za-z0-9&()\-]*){0,6}[ \-](?:Survey|Census|Dataset|Database|Panel|Study|Indicators)\b",
    )
    .unwrap()
});

// Collection-period phrases anchored on collection vocabulary
static RE_PERIOD_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:data )?collection(?: period)?|collected|conducted|fieldwork|surveyed|covering|covers)\b[^.\n]{0,60}?\b(?:19|20)\d{2}(?:\s*(?:-|to|through|until)\s*(?:19|20)\d{2})?",
    )
    .unwrap()
});

// Bare year ranges like "2016-2019" or "2016 to 2019"
static RE_YEAR_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:19|20)\d{2}\s*(?:-|to|through)\s*(?:19|20)\d{2}\b").unwrap()
});

// Month-year ranges like "January 2018 - March 2019"
static RE_MONTH_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun[e]?|jul[y]?|aug(?:ust)?|sep(?:t|tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(?:19|20)\d{2}\s*(?:-|to|through|until)\s*(?:(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun[e]?|jul[y]?|aug(?:ust)?|sep(?:t|tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+)?(?:19|20)\d{2}\b",
    )
    .unwrap()
});

// Well-known data-publishing organizations
static RE_ORG_KNOWN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:World Bank(?: Group)?|United Nations|UNICEF|UNDP|UNHCR|World Health Organization|WHO|International Labour Organization|ILO|International Monetary Fund|IMF|OECD|USAID|DHS Program|Eurostat|FAO|World Food Programme|African Development Bank|Asian Development Bank|Inter-American Development Bank)\b",
    )
    .unwrap()
});

// Generic institutional shapes: "National Bureau of Statistics", etc.
static RE_ORG_GENERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:National |Central |Federal )?(?:Ministry|Bureau|Department|Institute|Agency|Office|University)\s+(?:of|for)\s+[A-Z][A-Za-z]+(?:\s+(?:and|of|the|[A-Z][A-Za-z]+)){0,4}",
    )
    .unwrap()
});

static RE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"')\]]+"#).unwrap());

/// Detector output for one document.
#[derive(Debug, Clone, Default)]
pub struct FieldHits {
    pub has_declaration: bool,
    pub availability_section_found: bool,
    pub dataset_candidates: Vec<String>,
    pub source_mentions: Vec<String>,
    pub time_mentions: Vec<String>,
    pub urls: Vec<String>,
}

impl FieldHits {
    /// How many of the six detectors fired. Feeds the needs_review
    /// heuristic.
    pub fn signal_count(&self) -> usize {
        [
            self.has_declaration,
            self.availability_section_found,
            !self.dataset_candidates.is_empty(),
            !self.source_mentions.is_empty(),
            !self.time_mentions.is_empty(),
            !self.urls.is_empty(),
        ]
        .iter()
        .filter(|hit| **hit)
        .count()
    }
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn collect_matches(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

fn trim_url(url: &str) -> &str {
    url.trim_end_matches(['.', ',', ';', ':', ')', ']', '"', '\''])
}

/// Run every detector over normalized text.
pub fn extract_fields(text: &str) -> FieldHits {
    let mut datasets = collect_matches(&RE_DATASET_FILE, text);
    datasets.extend(collect_matches(&RE_DATASET_NAME, text));

    let mut sources = collect_matches(&RE_ORG_KNOWN, text);
    sources.extend(
        RE_ORG_GENERIC
            .find_iter(text)
            .map(|m| m.as_str().trim_end().to_string()),
    );

    let mut periods = collect_matches(&RE_PERIOD_PHRASE, text);
    periods.extend(collect_matches(&RE_YEAR_RANGE, text));
    periods.extend(collect_matches(&RE_MONTH_RANGE, text));

    let urls = RE_URL
        .find_iter(text)
        .map(|m| trim_url(m.as_str()).to_string())
        .filter(|u| !u.is_empty())
        .collect();

    FieldHits {
        has_declaration: RE_DECLARATION.is_match(text),
        availability_section_found: RE_AVAILABILITY.is_match(text),
        dataset_candidates: dedup_in_order(datasets),
        source_mentions: dedup_in_order(sources),
        time_mentions: dedup_in_order(periods),
        urls: dedup_in_order(urls),
    }
}
