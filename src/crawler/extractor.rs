use crate::url::make_absolute;
use once_cell::sync::Lazy;
use regex::Regex;

static HREF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)href\s*=\s*['"]([^'"]+)['"]"#).unwrap());

/// Extracts outbound links from an HTML body, in document order
///
/// A regex scan for quoted `href` attributes, not an HTML parse: links inside
/// comments or with exotic quoting are missed, which is accepted. Raw values
/// are resolved against `base_url`; unresolvable ones are dropped. Domain
/// filtering is the frontier's job, not the extractor's.
pub fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    HREF_PATTERN
        .captures_iter(html)
        .filter_map(|captures| {
            let absolute = make_absolute(base_url, &captures[1]);
            if absolute.is_empty() {
                None
            } else {
                Some(absolute)
            }
        })
        .collect()
}
