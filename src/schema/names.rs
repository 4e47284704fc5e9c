//! Shared string predicates
//!
//! `is_valid_name` is the single identifier grammar used for enumeration
//! values, enumeration names and attribute names.

use regex::Regex;
use std::sync::OnceLock;

const NAME_PATTERN: &str = r"^[A-Za-z][_0-9A-Za-z]*$";
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$";

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NAME_PATTERN).expect("identifier pattern is valid"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Returns true if `name` can be used as a programmatic identifier.
///
/// Must start with an ASCII letter, followed by ASCII letters, digits or `_`.
pub fn is_valid_name(name: &str) -> bool {
    name_regex().is_match(name)
}

/// Returns true if `value` is a syntactically valid email address.
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("a"));
        assert!(is_valid_name("draft"));
        assert!(is_valid_name("in_review"));
        assert!(is_valid_name("Status2"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("2fast"));
        assert!(!is_valid_name("_private"));
        assert!(!is_valid_name("with space"));
        assert!(!is_valid_name("kebab-case"));
        assert!(!is_valid_name("été"));
    }

    #[test]
    fn test_emails() {
        assert!(is_valid_email("editor@example.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("nope"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("space @example.com"));
    }
}
