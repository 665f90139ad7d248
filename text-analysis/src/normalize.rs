use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"http\S+").expect("URL pattern is valid"));
static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s]").expect("character class is valid"));

/// Lowercases `raw`, drops URLs and strips everything outside `[a-z0-9\s]`.
///
/// URL removal runs again after stripping: `h.ttpfoo` only turns into a URL
/// match once the dot is gone, and leaving it would make the function
/// non-idempotent.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let without_urls = URL_PATTERN.replace_all(&lowered, "");
    let stripped = DISALLOWED_CHARS.replace_all(&without_urls, "");
    URL_PATTERN.replace_all(&stripped, "").into_owned()
}

/// Case-sensitive substring test against already-normalized text.
pub fn contains_any_keyword(normalized: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|keyword| normalized.contains(keyword.as_str()))
}
