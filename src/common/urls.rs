use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// Everything but unreserved characters and '/', the same set Python's quote() keeps
const URL_PARAM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Turns a display name into a readable URL segment: spaces become `_`,
/// anything else unsafe is percent-encoded.
pub fn format_url_param(param: &str) -> String {
    utf8_percent_encode(&param.replace(' ', "_"), URL_PARAM).to_string()
}

pub fn format_url_params<S: AsRef<str>>(params: &[S]) -> Vec<String> {
    params.iter().map(|p| format_url_param(p.as_ref())).collect()
}

/// Undoes the space-to-underscore substitution of [`format_url_param`] on an
/// incoming (already percent-decoded) path segment.
pub fn clean(param: Option<&str>) -> Option<String> {
    param.map(|s| s.replace('_', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_url_params() {
        assert_eq!(
            format_url_params(&["Week 1", "Circuits & Gates", "a/b"]),
            vec!["Week_1", "Circuits_%26_Gates", "a/b"]
        );
        assert_eq!(format_url_param("Über"), "%C3%9Cber");
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(Some("Week_1")), Some("Week 1".to_string()));
        assert_eq!(clean(None), None);
    }
}
