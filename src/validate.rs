use regex::Regex;
use std::sync::LazyLock;

use crate::error::ValidationError;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:http|ftp)s?://",
        // domain
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)|",
        r"localhost|",
        // ipv4
        r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3})",
        r"(?::[0-9]+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .expect("URL pattern is valid")
});

/// Check whether `s` is a well-formed http(s)/ftp(s) locator
pub fn validate(s: &str) -> bool {
    URL_RE.is_match(s)
}

/// Like [`validate`], returning the input on success
pub fn check(s: &str) -> Result<&str, ValidationError> {
    if validate(s) {
        Ok(s)
    } else {
        Err(ValidationError(s.to_string()))
    }
}
