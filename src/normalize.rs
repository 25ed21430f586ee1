// Text normalization for raw PDF extraction output
use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\n").unwrap());
static DASH_VARIANTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{2013}\u{2014}\u{2212}]").unwrap());
static HYPHEN_WRAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\n").unwrap());
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Deterministic cleanup of raw extractor output: CR to LF, trailing
/// whitespace stripped, en/em-dash/minus canonicalized to `-`, hyphenated
/// line-wraps joined, runs of 3+ newlines collapsed to 2. Idempotent.
///
/// Joining a hyphenated wrap can expose a fresh `[ \t]+\n` or `-\n` pair
/// (`"a -\n\nb"`, `"a--\n\nb"`), so no single pass ordering suffices; the
/// passes repeat until nothing changes. Every rewrite either shortens the
/// text or removes the last dash variant, so the loop terminates.
pub fn normalize_text(raw: &str) -> String {
    let mut text = raw.replace('\r', "\n");
    loop {
        let pass = cleanup_pass(&text);
        if pass == text {
            return text;
        }
        text = pass;
    }
}

fn cleanup_pass(t: &str) -> String {
    let t = TRAILING_WS.replace_all(t, "\n");
    let t = DASH_VARIANTS.replace_all(&t, "-");
    let t = HYPHEN_WRAP.replace_all(&t, "");
    BLANK_RUNS.replace_all(&t, "\n\n").into_owned()
}
