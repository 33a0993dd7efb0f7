//! Phone number domain logic.
//!
//! One deliberately permissive pattern is used everywhere: a digit-led run
//! of phone punctuation at least nine characters long, bounded by digits.
//! It also catches ID and account numbers. Missing a real number is the
//! worse failure here, so recall wins over precision.

use super::PatternMatcher;
use once_cell::sync::Lazy;
use regex::Regex;

/// Phone number pattern matcher.
///
/// Matches an optional `+`, a digit, seven or more characters from
/// `[0-9 ().-]`, and a closing digit:
/// - 555-123-4567
/// - (555) 123-4567
/// - +44 20 7946 0958
/// - 555.123.4567
#[derive(Debug, Clone)]
pub struct PhoneMatcher;

impl PhoneMatcher {
    /// Creates a new phone number matcher.
    pub fn new() -> Self {
        Self
    }

    /// Returns the compiled phone pattern.
    pub fn regex() -> &'static Regex {
        // ASCII classes only: `\d` would also accept other scripts' digits.
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\+?[0-9][0-9 ().\-]{7,}[0-9]").expect("Valid phone number regex")
        });
        &PATTERN
    }

    /// Returns true if `text` contains at least one candidate.
    pub fn contains_match(&self, text: &str) -> bool {
        Self::regex().is_match(text)
    }
}

impl Default for PhoneMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternMatcher for PhoneMatcher {
    fn pattern(&self) -> &Regex {
        Self::regex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_match_offsets() {
        let matcher = PhoneMatcher::new();
        let matches = matcher.find_matches("call 555-123-4567 now");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 5);
        assert_eq!(matches[0].end, 17);
        assert_eq!(matches[0].matched_text, "555-123-4567");
    }

    #[test]
    fn test_replace_all() {
        let matcher = PhoneMatcher::new();
        assert_eq!(
            matcher.replace_all("call 555-123-4567 now", "+1-999-0000"),
            "call +1-999-0000 now"
        );
    }

    #[test]
    fn test_replacement_is_literal() {
        let matcher = PhoneMatcher::new();
        assert_eq!(matcher.replace_all("x 555-123-4567", "$0$1"), "x $0$1");
    }

    #[test]
    fn test_minimum_length() {
        let matcher = PhoneMatcher::new();
        // 9 characters is the shortest accepted run
        assert_eq!(matcher.find_matches("123456789").len(), 1);
        assert!(matcher.find_matches("12345678").is_empty());
    }

    #[test]
    fn test_trailing_punctuation_not_included() {
        let matcher = PhoneMatcher::new();
        let matches = matcher.find_matches("(555) 123-4567.");
        assert_eq!(matches.len(), 1);
        // Leading parenthesis is not a digit, so the run starts inside it
        assert_eq!(matches[0].matched_text, "555) 123-4567");
    }

    #[test]
    fn test_plus_prefix() {
        let matcher = PhoneMatcher::new();
        let matches = matcher.find_matches("Tel: +44 20 7946 0958");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_text, "+44 20 7946 0958");
    }

    #[test]
    fn test_non_ascii_digits_ignored() {
        let matcher = PhoneMatcher::new();
        assert!(!matcher.contains_match("٥٥٥-١٢٣-٤٥٦٧"));
    }
}
