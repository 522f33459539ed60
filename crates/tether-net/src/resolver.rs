//! Reference Resolution
//!
//! Turns the references found in screen markup (`src` values, navigation
//! targets) into absolute URLs. Three rules, first match wins:
//!
//! 1. `http://...` / `https://...` is already absolute.
//! 2. `/path` is relative to the server root.
//! 3. Anything else is relative to the directory of the current document.

/// Schemes recognised as absolute
const SCHEMES: [&str; 2] = ["http://", "https://"];

/// Check whether a reference carries its own scheme
pub fn is_absolute(reference: &str) -> bool {
    SCHEMES.iter().any(|scheme| reference.starts_with(scheme))
}

/// Byte offset where the authority (host) part of a URL begins
fn authority_start(url: &str) -> usize {
    url.find("://").map(|i| i + 3).unwrap_or(0)
}

/// Scheme, host and optional port of a URL, without a trailing slash.
///
/// `http://h:8866/a/b.xml` yields `http://h:8866`; a URL with no path is
/// returned whole.
pub fn server_base_url(url: &str) -> String {
    let start = authority_start(url);
    match url[start..].find('/') {
        Some(path) => url[..start + path].to_string(),
        None => url.to_string(),
    }
}

/// Resolve `reference` against the server root and the current document.
///
/// Never fails. When `current_document` has no path separator after its
/// authority (or is empty because nothing has loaded yet) document-relative
/// references fall back to `server_base + "/" + reference`.
pub fn resolve(reference: &str, server_base: &str, current_document: &str) -> String {
    if is_absolute(reference) {
        return reference.to_string();
    }

    if reference.starts_with('/') {
        return format!("{}{}", server_base, reference);
    }

    let start = authority_start(current_document);
    match current_document[start..].rfind('/') {
        Some(slash) => format!("{}{}", &current_document[..start + slash + 1], reference),
        None => format!("{}/{}", server_base, reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://h:8866";

    #[test]
    fn test_absolute_unchanged() {
        for reference in [
            "http://other:80/x.png",
            "https://cdn.example.com/a/b/c.xml",
            "http://h:8866/",
        ] {
            assert_eq!(resolve(reference, BASE, "http://h:8866/a/b.xml"), reference);
        }
    }

    #[test]
    fn test_root_relative() {
        assert_eq!(resolve("/x", BASE, "http://h:8866/a/b.xml"), "http://h:8866/x");
        assert_eq!(
            resolve("/settings.xml", BASE, ""),
            "http://h:8866/settings.xml"
        );
    }

    #[test]
    fn test_document_relative() {
        assert_eq!(
            resolve("c.xml", BASE, "http://h:8866/a/b.xml"),
            "http://h:8866/a/c.xml"
        );
        assert_eq!(
            resolve("img/logo.png", BASE, "http://h:8866/main.xml"),
            "http://h:8866/img/logo.png"
        );
        // no normalisation of dot segments
        assert_eq!(
            resolve("../up.png", BASE, "http://h:8866/a/b.xml"),
            "http://h:8866/a/../up.png"
        );
    }

    #[test]
    fn test_document_without_path_falls_back() {
        assert_eq!(resolve("c.xml", BASE, "http://h:8866"), "http://h:8866/c.xml");
        assert_eq!(resolve("c.xml", BASE, ""), "http://h:8866/c.xml");
    }

    #[test]
    fn test_server_base_url() {
        assert_eq!(server_base_url("http://h:8866/main.xml"), "http://h:8866");
        assert_eq!(server_base_url("https://example.com/a/b/c"), "https://example.com");
        assert_eq!(server_base_url("http://192.168.1.164:8866/"), "http://192.168.1.164:8866");
        assert_eq!(server_base_url("http://h:8866"), "http://h:8866");
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("http://h/x"));
        assert!(is_absolute("https://h/x"));
        assert!(!is_absolute("ftp://h/x"));
        assert!(!is_absolute("/x"));
        assert!(!is_absolute("x.xml"));
    }
}
