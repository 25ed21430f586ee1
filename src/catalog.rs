// World Bank reproducibility catalog crawler
//
// Companion to the extractor: fills a directory with README PDFs straight
// from https://reproducibility.worldbank.org. Direct seed links first, then
// paginated catalog scraping, with catalog-ID dedup against files already on
// disk. Filenames are saved as `<catalog_id>_README.pdf`.
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://reproducibility.worldbank.org";

/// Known-good direct download links, tried before any scraping.
pub const SEED_README_URLS: &[&str] =
    &["https://reproducibility.worldbank.org/index.php/catalog/222/download/643/README.pdf"];

const USER_AGENT: &str = "Mozilla/5.0 (WorldBank-README-Downloader/2.1)";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const READ_TIMEOUT: Duration = Duration::from_secs(120);
const RETRIES: u32 = 5;
const SLEEP_BETWEEN: Duration = Duration::from_millis(250);
const PAGE_STEP: usize = 30;
const PAGE_HARD_CAP: usize = 300;

// Catalog URLs come both with and without the /index.php prefix.
static RE_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:/index\.php)?/catalog/\d+/?$").unwrap());
static RE_DOWNLOAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:/index\.php)?/catalog/\d+/download/\d+(?:/readme\.pdf)?$").unwrap());
static RE_CATALOG_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/catalog/(\d+)").unwrap());
static RE_FILENAME_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)_README\.pdf$").unwrap());
static RE_UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[\\/*?:"<>|]+"#).unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Catalog ID (the digits) from a catalog URL, if present.
pub fn catalog_id_from_url(url: &str) -> Option<String> {
    RE_CATALOG_ID
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Catalog ID from a saved filename of the `<id>_README.pdf` form.
pub fn catalog_id_from_filename(name: &str) -> Option<String> {
    RE_FILENAME_ID
        .captures(name)
        .map(|caps| caps[1].to_string())
}

/// Replace filesystem-hostile characters with `_`.
pub fn sanitize_filename(name: &str) -> String {
    RE_UNSAFE_CHARS.replace_all(name, "_").into_owned()
}

/// Standardized local filename for a download URL. Generic `README.pdf`
/// names get the catalog ID prefixed so entries do not collide.
pub fn filename_from_url(url: &str) -> String {
    let path = Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string());
    let mut base = Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "README.pdf".to_string());
    if !base.contains('.') {
        base = "README.pdf".to_string();
    }
    if base.eq_ignore_ascii_case("readme.pdf") {
        if let Some(id) = catalog_id_from_url(url) {
            base = format!("{id}_README.pdf");
        }
    }
    sanitize_filename(&base)
}

/// Does this anchor look like a README download? Either the URL shape
/// matches, or the link text says so.
pub fn is_readme_download_link(href: &str, link_text: &str) -> bool {
    if !href.contains("/download/") {
        return false;
    }
    let text = link_text.to_lowercase();
    RE_DOWNLOAD.is_match(href) || text.contains("readme") || text.contains("read me")
}

/// Catalog IDs already present in the output directory.
pub fn existing_catalog_ids(dir: &Path) -> HashSet<String> {
    let mut ids = HashSet::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return ids;
    };
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(id) = catalog_id_from_filename(&name) {
            ids.insert(id);
        }
    }
    ids
}

fn dedup_in_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

pub struct Fetcher {
    client: Client,
    base: Url,
}

impl Fetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(READ_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        let base = Url::parse(base_url).with_context(|| format!("bad base URL {base_url}"))?;
        Ok(Self { client, base })
    }

    fn join(&self, href: &str) -> Option<String> {
        self.base.join(href).ok().map(|u| u.to_string())
    }

    fn get_with_retry(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let mut last_err = None;
        for attempt in 1..=RETRIES {
            match self.client.get(url).send().and_then(|r| r.error_for_status()) {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    debug!("GET {url} attempt {attempt}/{RETRIES} failed: {e}");
                    last_err = Some(e);
                    thread::sleep(Duration::from_millis(500 * attempt as u64));
                }
            }
        }
        Err(last_err.expect("at least one attempt ran").into())
    }

    fn get_html(&self, url: &str) -> Result<Html> {
        let body = self.get_with_retry(url)?.text()?;
        Ok(Html::parse_document(&body))
    }

    /// Catalog entry URLs from `/catalog/?page=N` listings. Stops at the
    /// first page that contributes nothing new.
    pub fn discover_catalog_items(&self, max_pages: usize) -> Vec<String> {
        let mut items = Vec::new();
        let mut seen = HashSet::new();
        for page in 1..=max_pages {
            let url = format!("{}/catalog/?page={page}", self.base.as_str().trim_end_matches('/'));
            let doc = match self.get_html(&url) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("catalog page {page} failed: {e}");
                    break;
                }
            };
            let mut found = 0;
            for anchor in doc.select(&ANCHOR) {
                let Some(href) = anchor.value().attr("href") else {
                    continue;
                };
                if RE_ITEM.is_match(href) {
                    if let Some(full) = self.join(href) {
                        if seen.insert(full.clone()) {
                            items.push(full);
                            found += 1;
                        }
                    }
                }
            }
            if found == 0 {
                break;
            }
            thread::sleep(SLEEP_BETWEEN);
        }
        items
    }

    fn collect_downloads_from_page(&self, url: &str) -> Vec<String> {
        let doc = match self.get_html(url) {
            Ok(doc) => doc,
            Err(e) => {
                debug!("skipping {url}: {e}");
                return Vec::new();
            }
        };
        let mut links = Vec::new();
        for anchor in doc.select(&ANCHOR) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let text = anchor.text().collect::<Vec<_>>().join(" ");
            if is_readme_download_link(href, &text) {
                if let Some(full) = self.join(href) {
                    links.push(full);
                }
            }
        }
        dedup_in_order(links)
    }

    /// README download links for one catalog entry: the entry page itself
    /// plus its related-materials tab.
    pub fn readme_links_on_item(&self, item_url: &str) -> Vec<String> {
        let mut links = self.collect_downloads_from_page(item_url);
        let related = format!("{}/related-materials", item_url.trim_end_matches('/'));
        links.extend(self.collect_downloads_from_page(&related));
        dedup_in_order(links)
    }

    /// Prioritized download plan: seed links first, then progressively
    /// wider catalog scans until `limit` new entries are found or the page
    /// cap is hit. Entries whose catalog ID is already on disk are skipped.
    pub fn build_download_plan(&self, limit: usize, existing: &HashSet<String>) -> Vec<String> {
        let mut plan = Vec::new();
        let mut planned_ids = HashSet::new();

        let consider = |url: String, plan: &mut Vec<String>, planned: &mut HashSet<String>| {
            let Some(id) = catalog_id_from_url(&url) else {
                return;
            };
            if existing.contains(&id) || !planned.insert(id) {
                return;
            }
            plan.push(url);
        };

        for seed in SEED_README_URLS {
            consider(seed.to_string(), &mut plan, &mut planned_ids);
            if plan.len() >= limit {
                return plan;
            }
        }

        let mut max_pages = PAGE_STEP;
        while plan.len() < limit && max_pages <= PAGE_HARD_CAP {
            info!("scanning catalog, up to {max_pages} pages");
            for item in self.discover_catalog_items(max_pages) {
                for link in self.readme_links_on_item(&item) {
                    consider(link, &mut plan, &mut planned_ids);
                    if plan.len() >= limit {
                        return plan;
                    }
                }
                thread::sleep(Duration::from_millis(100));
            }
            max_pages += PAGE_STEP;
        }
        plan
    }

    /// Download one README. Streams into `<name>.part` and renames on
    /// success so interrupted runs never leave half-files behind. Returns
    /// false when the file already existed.
    pub fn download_one(&self, url: &str, out_dir: &Path) -> Result<bool> {
        fs::create_dir_all(out_dir)?;
        let dest = out_dir.join(filename_from_url(url));
        if dest.exists() && dest.metadata().map(|m| m.len() > 0).unwrap_or(false) {
            debug!("exists, skipping {}", dest.display());
            return Ok(false);
        }

        let mut resp = self.get_with_retry(url)?;
        let part = dest.with_extension("pdf.part");
        let mut file =
            File::create(&part).with_context(|| format!("creating {}", part.display()))?;
        resp.copy_to(&mut file)
            .with_context(|| format!("downloading {url}"))?;
        fs::rename(&part, &dest)?;
        info!("downloaded {}", dest.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_parse_from_urls() {
        assert_eq!(
            catalog_id_from_url("https://reproducibility.worldbank.org/index.php/catalog/222/download/643/README.pdf"),
            Some("222".to_string())
        );
        assert_eq!(
            catalog_id_from_url("https://reproducibility.worldbank.org/catalog/17"),
            Some("17".to_string())
        );
        assert_eq!(catalog_id_from_url("https://example.org/about"), None);
    }

    #[test]
    fn catalog_ids_parse_from_filenames() {
        assert_eq!(catalog_id_from_filename("222_README.pdf"), Some("222".to_string()));
        assert_eq!(catalog_id_from_filename("README.pdf"), None);
        assert_eq!(catalog_id_from_filename("222_README.pdf.part"), None);
    }

    #[test]
    fn filenames_are_sanitized_and_id_prefixed() {
        assert_eq!(sanitize_filename(r#"a/b:c*d.pdf"#), "a_b_c_d.pdf");
        assert_eq!(
            filename_from_url("https://reproducibility.worldbank.org/catalog/222/download/643/README.pdf"),
            "222_README.pdf"
        );
        // Extensionless download paths fall back to README.pdf + ID
        assert_eq!(
            filename_from_url("https://reproducibility.worldbank.org/catalog/9/download/10"),
            "9_README.pdf"
        );
    }

    #[test]
    fn download_link_filter_accepts_url_shape_or_link_text() {
        assert!(is_readme_download_link("/index.php/catalog/5/download/12/README.pdf", ""));
        assert!(is_readme_download_link("/catalog/5/download/12", ""));
        assert!(is_readme_download_link("/files/download/misc?id=3", "Project ReadMe"));
        assert!(is_readme_download_link("/files/download/misc?id=3", "Read Me file"));
        assert!(!is_readme_download_link("/catalog/5", "README"));
        assert!(!is_readme_download_link("/files/download/misc?id=3", "Data dictionary"));
    }

    #[test]
    fn existing_ids_scan_tolerates_missing_dir() {
        assert!(existing_catalog_ids(Path::new("/no/such/dir")).is_empty());
    }
}
