//! Request target construction.

/// Join a base URL and a path suffix with exactly one `/`.
///
/// An empty suffix (or a bare `/`) addresses the base itself.
pub fn target_url(base: &str, suffix: &str) -> String {
    let base = base.trim_end_matches('/');
    let suffix = suffix.trim_start_matches('/');

    if suffix.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_separator() {
        let expected = "http://host/data/pkgs.json";
        assert_eq!(target_url("http://host/data", "/pkgs.json"), expected);
        assert_eq!(target_url("http://host/data/", "pkgs.json"), expected);
        assert_eq!(target_url("http://host/data//", "//pkgs.json"), expected);
        assert_eq!(target_url("http://host/data", "pkgs.json"), expected);
    }

    #[test]
    fn test_empty_suffix_is_base() {
        assert_eq!(target_url("http://host/data/", ""), "http://host/data");
        assert_eq!(target_url("http://host/data", "/"), "http://host/data");
    }

    #[test]
    fn test_nested_suffix_kept_verbatim() {
        assert_eq!(
            target_url("http://host", "/pkgs/hello/2.10.json?v=1"),
            "http://host/pkgs/hello/2.10.json?v=1"
        );
    }
}
