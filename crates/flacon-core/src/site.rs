/// Derives a bare hostname from a listing link for the `site` attribute.
///
/// Strips a leading `http://` or `https://` (case-insensitive) and an
/// optional leading `www.`, then takes everything up to the first `/`.
/// Plain hostnames pass through unchanged. Degenerate input yields
/// `None`; callers treat the site as absent rather than failing.
pub fn extract_domain(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    let rest = strip_scheme(trimmed);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let host = rest.split('/').next().unwrap_or("");

    if host.is_empty() {
        None
    } else {
        Some(host.to_owned())
    }
}

fn strip_scheme(url: &str) -> &str {
    for scheme in ["http://", "https://"] {
        // Compare as bytes: indexing the str could land inside a
        // multi-byte character when the link starts with a non-ASCII
        // host. A matching prefix is all ASCII, so the boundary at
        // scheme.len() is then a valid char boundary.
        let prefix = url.as_bytes().get(..scheme.len());
        if prefix.is_some_and(|p| p.eq_ignore_ascii_case(scheme.as_bytes())) {
            return &url[scheme.len()..];
        }
    }
    url
}
