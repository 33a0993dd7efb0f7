//! "Presentable" layout: turns extracted text into a titled document with
//! bullets and joined paragraphs.
//!
//! Extracted text is noisy: repeated headers on every page, page numbers,
//! hard line breaks inside sentences. Segmentation cleans those up before
//! the blocks are wrapped.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::ReflowEngine;
use crate::config::ReflowConfig;
use crate::pdf::TextLine;

/// Bullet glyph or ordinal (`3.` / `3)`) followed by whitespace.
static BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[•·*\-–—▪◦●]|[0-9]+[.)])\s+(.*)$").expect("Valid bullet regex")
});

/// Digit share at or above which a line counts as numeric residue.
const RESIDUE_DIGIT_RATIO: f64 = 0.7;
/// Lines with at least this many distinct characters are always kept.
const RESIDUE_DISTINCT_CHARS: usize = 5;

/// A structural unit of a presentable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Subtitle(String),
    Bullet(String),
    Paragraph(String),
}

/// True for leftovers like page numbers or `0000 0000`.
fn is_numeric_residue(line: &str) -> bool {
    let chars: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return false;
    }
    let digits = chars.iter().filter(|c| c.is_ascii_digit()).count();
    let distinct: HashSet<char> = chars.iter().copied().collect();
    digits as f64 / chars.len() as f64 >= RESIDUE_DIGIT_RATIO
        && distinct.len() < RESIDUE_DISTINCT_CHARS
}

fn bullet_content(line: &str) -> Option<&str> {
    BULLET
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Splits normalized text into title, subtitle, bullets and paragraphs.
pub fn segment(text: &str, subtitle_max_chars: usize) -> Vec<Block> {
    let mut seen = HashSet::new();
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !is_numeric_residue(line))
        .filter(|line| line.is_empty() || seen.insert(line.to_lowercase()))
        .collect();

    let mut blocks = Vec::new();
    let mut rest = lines.iter().copied().skip_while(|l| l.is_empty()).peekable();

    let Some(title) = rest.next() else {
        return blocks;
    };
    blocks.push(Block::Title(title.to_string()));

    while rest.peek().is_some_and(|l| l.is_empty()) {
        rest.next();
    }
    if let Some(candidate) = rest.peek().copied() {
        if candidate.chars().count() <= subtitle_max_chars && bullet_content(candidate).is_none() {
            blocks.push(Block::Subtitle(candidate.to_string()));
            rest.next();
        }
    }

    fn flush(paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>) {
        if !paragraph.is_empty() {
            blocks.push(Block::Paragraph(paragraph.join(" ")));
            paragraph.clear();
        }
    }

    let mut paragraph: Vec<&str> = Vec::new();
    for line in rest {
        if line.is_empty() {
            flush(&mut paragraph, &mut blocks);
        } else if let Some(content) = bullet_content(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::Bullet(content.to_string()));
        } else {
            paragraph.push(line);
        }
    }
    flush(&mut paragraph, &mut blocks);

    blocks
}

/// Wraps blocks into styled lines and breaks them into pages by height.
pub fn layout_blocks(
    blocks: &[Block],
    engine: &ReflowEngine<'_>,
    config: &ReflowConfig,
) -> Vec<Vec<TextLine>> {
    let width = engine.available_width(config.page_width);
    let body = engine.font_size();
    let leading = engine.line_height();

    let mut lines: Vec<TextLine> = Vec::new();
    for block in blocks {
        let (text, size, advance, gap_after) = match block {
            Block::Title(t) => (t.clone(), config.title_size, config.title_size * 1.3, leading),
            Block::Subtitle(t) => (
                t.clone(),
                config.subtitle_size,
                config.subtitle_size * 1.3,
                leading,
            ),
            Block::Bullet(t) => (format!("• {}", t), body, leading, 0.0),
            Block::Paragraph(t) => (t.clone(), body, leading, leading * 0.5),
        };
        for wrapped in engine.wrap(&text, width, size) {
            lines.push(TextLine::new(wrapped, size, advance));
        }
        if gap_after > 0.0 {
            lines.push(TextLine::gap(gap_after));
        }
    }

    paginate_by_height(lines, config.page_height - 2.0 * config.margin)
}

fn paginate_by_height(lines: Vec<TextLine>, usable: f64) -> Vec<Vec<TextLine>> {
    let mut pages: Vec<Vec<TextLine>> = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();
    let mut used = 0.0;

    for line in lines {
        let advance = line.leading.max(line.size);
        if !current.is_empty() && used + advance > usable {
            pages.push(std::mem::take(&mut current));
            used = 0.0;
        }
        // Gaps never open a page
        if current.is_empty() && line.text.is_empty() {
            continue;
        }
        used += advance;
        current.push(line);
    }
    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_subtitle_bullets_paragraphs() {
        let text = "Quarterly Report\nSales team\n\nRevenue grew\nacross regions.\n- North\n2) South\n\nClosing note";
        let blocks = segment(text, 80);
        assert_eq!(
            blocks,
            vec![
                Block::Title("Quarterly Report".into()),
                Block::Subtitle("Sales team".into()),
                Block::Paragraph("Revenue grew across regions.".into()),
                Block::Bullet("North".into()),
                Block::Bullet("South".into()),
                Block::Paragraph("Closing note".into()),
            ]
        );
    }

    #[test]
    fn test_long_second_line_is_not_subtitle() {
        let blocks = segment("Title\nThis second line is rather long", 10);
        assert_eq!(blocks[1], Block::Paragraph("This second line is rather long".into()));
    }

    #[test]
    fn test_case_insensitive_dedupe() {
        let blocks = segment("Header\nbody one\nHEADER\nbody two", 0);
        assert_eq!(
            blocks,
            vec![
                Block::Title("Header".into()),
                Block::Paragraph("body one body two".into()),
            ]
        );
    }

    #[test]
    fn test_numeric_residue_removed() {
        assert!(is_numeric_residue("12"));
        assert!(is_numeric_residue("000 000 0000"));
        assert!(!is_numeric_residue("+1-999-0000 ext 5"));
        assert!(!is_numeric_residue("2024 annual"));
        assert!(!is_numeric_residue("1234567"));

        let blocks = segment("Title\n3\nText", 0);
        assert_eq!(blocks, vec![Block::Title("Title".into()), Block::Paragraph("Text".into())]);
    }

    #[test]
    fn test_empty_text() {
        assert!(segment("\n\n  \n", 80).is_empty());
    }
}
