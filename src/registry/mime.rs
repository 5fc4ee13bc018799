use std::path::Path;

/// Look up a MIME type from the extension of a URI or path.
///
/// Pure extension lookup, no content sniffing. Unknown extensions yield
/// `None` and the file record carries no MIME type.
pub fn mime_type_of(uri: &str) -> Option<&'static str> {
    mime_guess::from_path(Path::new(uri)).first_raw()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_type_of("file:///out/report.json"), Some("application/json"));
        assert_eq!(mime_type_of("file:///docs/index.HTML"), Some("text/html"));
        assert!(mime_type_of("file:///src/main.c").is_some());
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(mime_type_of("file:///src/Makefile"), None);
        assert_eq!(mime_type_of("file:///src/blob.zzqqx"), None);
        // Dots in directory names do not count
        assert_eq!(mime_type_of("file:///v1.2/README"), None);
    }
}
