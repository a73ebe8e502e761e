//! Path segment extraction from URLs.

/// Extracts the last path segment of a URL (query and fragment excluded).
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Extension of a file name, without the dot. Hidden-file names (`.foo`) and
/// names ending in a dot have none.
pub fn extension_of(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(
            last_path_segment("https://example.com/a/b/file.webm").as_deref(),
            Some("file.webm")
        );
        assert_eq!(
            last_path_segment("https://example.com/single").as_deref(),
            Some("single")
        );
    }

    #[test]
    fn root_or_empty() {
        assert_eq!(last_path_segment("https://example.com/"), None);
        assert_eq!(last_path_segment("https://example.com"), None);
        assert_eq!(last_path_segment("not a url"), None);
    }

    #[test]
    fn with_query() {
        assert_eq!(
            last_path_segment("https://example.com/file.png?1234").as_deref(),
            Some("file.png")
        );
    }

    #[test]
    fn extension_edges() {
        assert_eq!(extension_of("a.tar.gz"), Some("gz"));
        assert_eq!(extension_of(".hidden"), None);
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of("plain"), None);
    }
}
