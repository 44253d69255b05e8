//! URL helpers.
//!
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! Only what the docset pipeline needs: building page URLs, resolving
//! stylesheet hrefs found in a page against that page's URL, and picking a
//! local file name for a mirrored resource.

/// Resolve a potentially relative URL against a base URL.
///
/// # Algorithm
///
/// [§ 2.5 URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#resolving-urls)
///
/// STEP 1: "If url is an absolute URL, return url."
///
/// STEP 2: "Otherwise, resolve url relative to base."
///
/// NOTE: This is a simplified implementation covering protocol-relative,
/// root-relative and document-relative references. Query strings and
/// fragments on the base are dropped, `.` and `..` segments are folded.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    // STEP 1: Check if href is already absolute.
    if has_scheme(href) {
        return href.to_string();
    }

    let Some(base) = base_url else {
        return href.to_string();
    };
    let base = strip_query_and_fragment(base);

    // STEP 2: Resolve relative URL against base.
    if let Some(rest) = href.strip_prefix("//") {
        // Protocol-relative URL - reuse the scheme of the base
        let scheme = base.split_once("://").map_or("http", |(scheme, _)| scheme);
        return format!("{scheme}://{rest}");
    }

    let Some((origin, base_path)) = split_origin(base) else {
        return href.to_string();
    };

    if href.starts_with('/') {
        // Absolute path - join with origin
        return format!("{origin}{}", normalize_path(href));
    }

    // Relative path - join with base directory
    let base_dir = base_path.rsplit_once('/').map_or("", |(dir, _)| dir);
    format!("{origin}{}", normalize_path(&format!("{base_dir}/{href}")))
}

/// Join a base URL and path segments with single slashes.
///
/// Empty segments are skipped, so an empty version yields no `//`.
#[must_use]
pub fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }
    url
}

/// Normalize a documentation version for use in a URL path.
///
/// Non-alphanumeric separators are stripped: `0.8.2` becomes `082`.
#[must_use]
pub fn normalize_version(version: &str) -> String {
    version
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// The last non-empty path segment of a URL, without query or fragment.
///
/// Used as the local file name when mirroring a resource.
#[must_use]
pub fn file_name(url: &str) -> Option<&str> {
    let url = strip_query_and_fragment(url);
    let path = split_origin(url).map_or(url, |(_, path)| path);
    path.rsplit('/').find(|segment| !segment.is_empty())
}

/// [URL Standard § 4.3](https://url.spec.whatwg.org/#url-parsing)
///
/// "An absolute-URL string is a URL-scheme string, followed by U+003A (:),
/// followed by a scheme-specific part."
fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn strip_query_and_fragment(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Split `scheme://host[:port]/path` into (`scheme://host[:port]`, `/path`).
fn split_origin(url: &str) -> Option<(&str, &str)> {
    let scheme_end = url.find("://")? + 3;
    let path_start = url[scheme_end..]
        .find('/')
        .map_or(url.len(), |offset| scheme_end + offset);
    Some((&url[..path_start], &url[path_start..]))
}

/// Fold `.` and `..` segments of an absolute path.
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                let _ = segments.pop();
            }
            other => segments.push(other),
        }
    }
    let mut normalized = format!("/{}", segments.join("/"));
    if path.ends_with('/') && normalized.len() > 1 {
        normalized.push('/');
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "http://kafka.apache.org/082/documentation.html";

    #[test]
    fn absolute_urls_are_returned_unchanged() {
        assert_eq!(
            resolve_url("https://cdn.example.com/a.css", Some(PAGE)),
            "https://cdn.example.com/a.css"
        );
    }

    #[test]
    fn root_relative_urls_use_the_origin() {
        assert_eq!(
            resolve_url("/styles.css", Some(PAGE)),
            "http://kafka.apache.org/styles.css"
        );
    }

    #[test]
    fn relative_urls_use_the_base_directory() {
        assert_eq!(
            resolve_url("css/site.css", Some(PAGE)),
            "http://kafka.apache.org/082/css/site.css"
        );
        assert_eq!(
            resolve_url("../site.css", Some(PAGE)),
            "http://kafka.apache.org/site.css"
        );
    }

    #[test]
    fn protocol_relative_urls_take_the_base_scheme() {
        assert_eq!(
            resolve_url("//fonts.example.com/f.css", Some("https://a.org/x.html")),
            "https://fonts.example.com/f.css"
        );
    }

    #[test]
    fn relative_url_without_base_is_kept() {
        assert_eq!(resolve_url("a.css", None), "a.css");
    }

    #[test]
    fn join_skips_empty_segments() {
        assert_eq!(
            join_url("http://kafka.apache.org/", &["082", "documentation.html"]),
            PAGE
        );
        assert_eq!(
            join_url("http://kafka.apache.org", &["", "documentation.html"]),
            "http://kafka.apache.org/documentation.html"
        );
    }

    #[test]
    fn version_separators_are_stripped() {
        assert_eq!(normalize_version("0.8.2"), "082");
        assert_eq!(normalize_version("2.8-rc_1"), "28rc1");
    }

    #[test]
    fn file_name_ignores_query_and_fragment() {
        assert_eq!(
            file_name("http://kafka.apache.org/styles.css?v=2#x"),
            Some("styles.css")
        );
        assert_eq!(file_name("http://kafka.apache.org/"), None);
        assert_eq!(file_name("http://kafka.apache.org"), None);
    }
}
