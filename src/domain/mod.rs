//! Text-level business logic: normalization and phone number detection.
//!
//! Nothing in this module knows about geometry. Matchers report offsets in
//! the string they scanned, and the layout module maps those back onto page
//! fragments.

pub mod normalize;
pub mod phone;
pub mod vanity;

pub use normalize::TextNormalizer;
pub use phone::PhoneMatcher;
pub use vanity::{collapse_spelled_digits, decode_vanity};

use regex::Regex;

use crate::config::MatchingConfig;

/// Whole-text preprocessing ahead of matching: normalization, then vanity
/// decoding and spelled-digit collapsing as configured.
pub fn prepare_for_matching(text: &str, config: &MatchingConfig) -> String {
    let mut prepared = TextNormalizer::new(config.split_letter_digit).normalize(text);
    if config.decode_vanity {
        prepared = decode_vanity(&prepared);
    }
    if config.collapse_spelled_digits {
        prepared = collapse_spelled_digits(&prepared);
    }
    prepared
}

/// A located substring in some scanned string.
///
/// `start` and `end` are UTF-8 byte offsets into the scanned string, so
/// `&text[start..end] == matched_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub matched_text: String,
}

impl Match {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if the half-open ranges share at least one byte.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Trait for pattern matching strategies.
///
/// Scanning is leftmost-first and never re-enters a consumed region, which
/// is what [`Regex::find_iter`] provides.
pub trait PatternMatcher: Send + Sync {
    fn pattern(&self) -> &Regex;

    fn find_matches(&self, text: &str) -> Vec<Match> {
        self.pattern()
            .find_iter(text)
            .map(|m| Match {
                start: m.start(),
                end: m.end(),
                matched_text: m.as_str().to_string(),
            })
            .collect()
    }

    fn replace_all(&self, text: &str, replacement: &str) -> String {
        // NoExpand: `$` in the replacement is literal text
        self.pattern()
            .replace_all(text, regex::NoExpand(replacement))
            .into_owned()
    }
}
