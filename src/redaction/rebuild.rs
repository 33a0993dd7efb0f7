//! Whole-text pipelines: the source layout is discarded and the scrubbed
//! text is typeset into a new document.

use tracing::{debug, instrument};

use super::{DocumentReport, Mode, ProcessedDocument};
use crate::config::PipelineConfig;
use crate::domain::{prepare_for_matching, PatternMatcher, PhoneMatcher};
use crate::error::RedactorResult;
use crate::pdf::{extract_text_by_pages, write_text_pages, FontSource, TextLine};
use crate::reflow::{layout_blocks, segment, ReflowEngine};

/// Extracted, normalized text with every match replaced.
struct ScrubbedText {
    text: String,
    source_pages: usize,
    matches: usize,
}

fn scrub(source: &[u8], replacement: &str, config: &PipelineConfig) -> RedactorResult<ScrubbedText> {
    let pages = extract_text_by_pages(source)?;
    let prepared = prepare_for_matching(&pages.join("\n"), &config.matching);

    let matcher = PhoneMatcher::new();
    let matches = matcher.find_matches(&prepared).len();
    let text = matcher.replace_all(&prepared, replacement);
    debug!(matches, chars = text.len(), "Scrubbed document text");

    Ok(ScrubbedText {
        text,
        source_pages: pages.len(),
        matches,
    })
}

/// Plain reflow: body text only, wrapped and paginated.
#[instrument(skip_all, fields(bytes = source.len()))]
pub fn rebuild(
    source: &[u8],
    replacement: &str,
    font: &FontSource,
    config: &PipelineConfig,
) -> RedactorResult<ProcessedDocument> {
    let scrubbed = scrub(source, replacement, config)?;
    let reflow = &config.reflow;

    let engine = ReflowEngine::new(font, reflow);
    let pages: Vec<Vec<TextLine>> = engine
        .paginate(&scrubbed.text, reflow.page_width, reflow.page_height)
        .into_iter()
        .map(|page| {
            page.into_iter()
                .map(|line| TextLine::new(line, reflow.font_size, reflow.line_height))
                .collect()
        })
        .collect();

    let bytes = write_text_pages("Redacted document", &pages, font, reflow)?;
    Ok(ProcessedDocument {
        bytes,
        report: whole_text_report(Mode::Rebuild, &scrubbed, pages.len()),
    })
}

/// Reflow with title, subtitle, bullets and paragraphs.
#[instrument(skip_all, fields(bytes = source.len()))]
pub fn presentable(
    source: &[u8],
    replacement: &str,
    font: &FontSource,
    config: &PipelineConfig,
) -> RedactorResult<ProcessedDocument> {
    let scrubbed = scrub(source, replacement, config)?;
    let reflow = &config.reflow;

    let blocks = segment(&scrubbed.text, reflow.subtitle_max_chars);
    let engine = ReflowEngine::new(font, reflow);
    let pages = layout_blocks(&blocks, &engine, reflow);
    debug!(blocks = blocks.len(), pages = pages.len(), "Laid out presentable document");

    let bytes = write_text_pages("Redacted document", &pages, font, reflow)?;
    Ok(ProcessedDocument {
        bytes,
        report: whole_text_report(Mode::Presentable, &scrubbed, pages.len()),
    })
}

fn whole_text_report(mode: Mode, scrubbed: &ScrubbedText, pages: usize) -> DocumentReport {
    DocumentReport {
        pages_processed: scrubbed.source_pages,
        matches_found: scrubbed.matches,
        pages_written: pages.max(1),
        ..DocumentReport::new(mode)
    }
}
