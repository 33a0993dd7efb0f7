//! Word wrapping and pagination for rebuilt documents.
//!
//! The engine only sees strings and a [`TextMeasure`]; it knows nothing
//! about the PDF that will eventually carry the lines.

pub mod presentable;

pub use presentable::{layout_blocks, segment, Block};

use crate::config::ReflowConfig;
use crate::pdf::TextMeasure;

/// Greedy line breaker and paginator.
pub struct ReflowEngine<'a> {
    measure: &'a dyn TextMeasure,
    margin: f64,
    font_size: f64,
    line_height: f64,
}

impl<'a> ReflowEngine<'a> {
    pub fn new(measure: &'a dyn TextMeasure, config: &ReflowConfig) -> Self {
        Self {
            measure,
            margin: config.margin,
            font_size: config.font_size,
            line_height: config.line_height,
        }
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Width left for text between the side margins.
    pub fn available_width(&self, page_width: f64) -> f64 {
        (page_width - 2.0 * self.margin).max(0.0)
    }

    /// How many body lines fit between the top and bottom margins.
    pub fn lines_per_page(&self, page_height: f64) -> usize {
        let usable = page_height - 2.0 * self.margin;
        ((usable / self.line_height).floor() as usize).max(1)
    }

    /// Wraps text at `size` into lines no wider than `max_width`.
    ///
    /// Each `\n` starts a new paragraph and an empty source line is kept
    /// as an empty output line. A single token wider than `max_width` is
    /// split between characters.
    pub fn wrap(&self, text: &str, max_width: f64, size: f64) -> Vec<String> {
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut current = String::new();
            let mut any_token = false;

            for token in paragraph.split_whitespace() {
                any_token = true;
                if !current.is_empty() {
                    let candidate = format!("{} {}", current, token);
                    if self.fits(&candidate, max_width, size) {
                        current = candidate;
                        continue;
                    }
                    lines.push(std::mem::take(&mut current));
                }

                if self.fits(token, max_width, size) {
                    current = token.to_string();
                } else {
                    let mut pieces = self.hard_split(token, max_width, size);
                    current = pieces.pop().unwrap_or_default();
                    lines.extend(pieces);
                }
            }

            if any_token {
                lines.push(current);
            } else {
                lines.push(String::new());
            }
        }

        lines
    }

    fn fits(&self, text: &str, max_width: f64, size: f64) -> bool {
        self.measure.text_width(text, size) <= max_width
    }

    /// Splits one token into chunks that fit, at least one character each.
    fn hard_split(&self, token: &str, max_width: f64, size: f64) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        for c in token.chars() {
            current.push(c);
            if current.chars().count() > 1 && !self.fits(&current, max_width, size) {
                current.pop();
                pieces.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
        if !current.is_empty() {
            pieces.push(current);
        }
        pieces
    }

    /// Wraps body text and groups the lines into pages.
    pub fn paginate(&self, text: &str, page_width: f64, page_height: f64) -> Vec<Vec<String>> {
        let lines = self.wrap(text, self.available_width(page_width), self.font_size);
        let per_page = self.lines_per_page(page_height);

        // Trailing blank lines would only produce empty pages
        let used = lines
            .iter()
            .rposition(|l| !l.is_empty())
            .map_or(0, |last| last + 1);

        lines[..used]
            .chunks(per_page)
            .map(|chunk| chunk.to_vec())
            .collect()
    }
}
