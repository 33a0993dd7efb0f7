//! Whole-text cleanup applied before matching in the rebuild pipelines.
//!
//! Extracted text is full of glyphs that break a naive phone pattern:
//! zero-width joiners between digits, en dashes instead of hyphens, soft
//! hyphens, and runs of layout whitespace. The normalizer folds all of
//! those into the plain ASCII forms the matcher understands.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pure `&str -> String` text normalizer.
///
/// Applying [`TextNormalizer::normalize`] twice yields the same string as
/// applying it once.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    split_letter_digit: bool,
}

impl TextNormalizer {
    pub fn new(split_letter_digit: bool) -> Self {
        Self { split_letter_digit }
    }

    pub fn normalize(&self, text: &str) -> String {
        let unified: String = text
            .chars()
            .filter(|c| !is_invisible(*c))
            .map(|c| if is_separator_glyph(c) { '-' } else { c })
            .collect();

        let split = if self.split_letter_digit {
            split_letter_digit_boundaries(&unified)
        } else {
            unified
        };

        collapse_whitespace(&split)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Zero-width, formatting and soft-hyphen code points.
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{FEFF}'
    )
}

/// Bullets, dashes, arrows and the underscore all become a hyphen.
fn is_separator_glyph(c: char) -> bool {
    matches!(
        c,
        '_' | '\u{2010}'..='\u{2015}'
            | '\u{2022}'
            | '\u{2043}'
            | '\u{2212}'
            | '\u{2219}'
            | '\u{2194}'
            | '\u{21D0}'..='\u{21D4}'
            | '\u{FE58}'
            | '\u{FE63}'
            | '\u{FF0D}'
    )
}

fn split_letter_digit_boundaries(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if let Some(p) = prev {
            let boundary = (p.is_alphabetic() && c.is_ascii_digit())
                || (p.is_ascii_digit() && c.is_alphabetic());
            if boundary {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    static HORIZONTAL: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[^\S\n]+").expect("Valid whitespace regex"));
    static BLANK_RUNS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\n{3,}").expect("Valid blank line regex"));

    let lines: Vec<String> = text
        .split('\n')
        .map(|line| HORIZONTAL.replace_all(line, " ").trim().to_string())
        .collect();
    let joined = lines.join("\n");
    BLANK_RUNS.replace_all(joined.trim_matches('\n'), "\n\n").into_owned()
}
