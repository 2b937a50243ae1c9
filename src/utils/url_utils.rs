//! URL helpers for site resolvers
//!
//! Keyword substitution into fixed query templates and resolution of
//! scraped `href` values against a site base.

use url::Url;

/// Placeholder replaced by the percent-encoded keyword
pub const KEYWORD_PLACEHOLDER: &str = "{keyword}";

/// Substitute `keyword` into `template`
///
/// The keyword is percent-encoded so CJK names and spaces survive as a
/// single query value.
#[must_use]
pub fn fill_keyword_template(template: &str, keyword: &str) -> String {
    template.replace(KEYWORD_PLACEHOLDER, &urlencoding::encode(keyword))
}

/// Resolve an anchor `href` against `base`
///
/// Absolute hrefs are returned unchanged; relative ones are joined onto the
/// base. Returns `None` for empty hrefs, fragments, and non-http schemes.
#[must_use]
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let resolved = base.join(href).ok()?;
    is_valid_url(resolved.as_str()).then(|| resolved.to_string())
}

/// Check if a URL is valid
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
