// src/matching/url.rs

use url::Url as StdUrl;

/// Canonicalize a professional-network profile URL into an identity key.
///
/// Strips scheme, `www.`, query string, fragment, and trailing slash;
/// lowercases the host and keeps the path as-is otherwise (profile slugs are
/// case-insensitive on the networks we scrape, so the whole key is
/// lowercased). Unparseable input, `mailto:`, and `tel:` normalize to the
/// empty string and are ineligible as keys.
pub fn normalize_profile_url(url_s: &str) -> String {
    let tr = url_s.trim();
    if tr.is_empty() || tr.starts_with("mailto:") || tr.starts_with("tel:") {
        return String::new();
    }
    let with_scheme = if !tr.contains("://") {
        format!("https://{}", tr)
    } else {
        tr.to_string()
    };
    let parsed = match StdUrl::parse(&with_scheme) {
        Ok(u) => u,
        Err(_) => return String::new(),
    };
    let host = match parsed.host_str() {
        Some(h) => h.to_lowercase(),
        None => return String::new(),
    };
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if host.is_empty() {
        return String::new();
    }
    let path = parsed.path().trim_end_matches('/').to_lowercase();
    format!("{}{}", host, path)
}
