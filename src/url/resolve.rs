use crate::url::UrlParts;

/// Truncates a URL at the first `#`
///
/// Fragments never reach the server, so two URLs differing only in fragment
/// are the same crawl target.
pub fn strip_fragment(url: &str) -> &str {
    match url.find('#') {
        Some(pos) => &url[..pos],
        None => url,
    }
}

/// Resolves an `href` attribute value against the page it appeared on
///
/// Returns the canonical absolute URL, or an empty string when the href is
/// unusable. Resolution rules, in order:
///
/// 1. Leading/trailing whitespace is trimmed and the fragment is stripped,
///    so every branch below composes a fragment-free result.
/// 2. Empty values (including fragment-only references) are rejected.
/// 3. `mailto:` and `javascript:` references are rejected.
/// 4. Absolute `http(s)://` URLs pass through as-is.
/// 5. Protocol-relative `//host/path` inherits the base scheme.
/// 6. A leading `/` replaces the base path entirely.
/// 7. Anything else is appended to the directory portion of the base path
///    (everything up to and including the last `/`).
pub fn make_absolute(base_url: &str, href: &str) -> String {
    let link = strip_fragment(href.trim());
    if link.is_empty() {
        return String::new();
    }
    if link.starts_with("mailto:") || link.starts_with("javascript:") {
        return String::new();
    }
    if link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }
    if link.starts_with("//") {
        let Some(base) = UrlParts::parse(base_url) else {
            return String::new();
        };
        return format!("{}:{}", base.scheme, link);
    }

    let Some(base) = UrlParts::parse(base_url) else {
        return String::new();
    };
    let path = if link.starts_with('/') {
        link.to_string()
    } else {
        let directory = match base.path.rfind('/') {
            Some(slash) => &base.path[..=slash],
            None => "/",
        };
        format!("{directory}{link}")
    };
    format!("{}://{}{}", base.scheme, base.host, path)
}

/// Returns the lowercased extension of a URL's file part, or empty
///
/// The fragment and query are removed first; the extension includes the
/// leading dot (`.pdf`). URLs whose last path segment has no dot yield an
/// empty string.
pub fn extension_from_url(url: &str) -> String {
    let clean = strip_fragment(url);
    let clean = match clean.find('?') {
        Some(pos) => &clean[..pos],
        None => clean,
    };
    let filename = match clean.rfind('/') {
        Some(slash) => &clean[slash + 1..],
        None => clean,
    };
    match filename.rfind('.') {
        Some(dot) => filename[dot..].to_lowercase(),
        None => String::new(),
    }
}

/// Recognizes query strings that advertise a file download
///
/// Used by downstream corpus tooling to classify dynamic endpoints; admission
/// into the frontier is decided by the path extension alone.
pub fn query_indicates_download(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.contains("format=pdf") || lower.contains("format=doc") || lower.contains("download=1")
}
