use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.-]*)://([^/]+)(/.*)?$").unwrap());

/// The components of a canonical URL
///
/// Scheme and host are lowercased during parsing; the path keeps its original
/// case because request targets are case-sensitive. A missing path becomes `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,
    pub host: String,
    pub path: String,
}

impl UrlParts {
    /// Parses a URL of the shape `scheme://host[/path]`
    ///
    /// Anything else (relative references, `mailto:`, bare hosts without a
    /// scheme) yields `None`.
    pub fn parse(url: &str) -> Option<UrlParts> {
        let captures = URL_PATTERN.captures(url)?;
        Some(UrlParts {
            scheme: captures[1].to_lowercase(),
            host: captures[2].to_lowercase(),
            path: captures
                .get(3)
                .map_or_else(|| "/".to_string(), |m| m.as_str().to_string()),
        })
    }

    /// Reconstructs the canonical string form `scheme://host` + path
    pub fn to_url_string(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.path)
    }
}
