//! Layout-preserving redaction.
//!
//! Per page: fragments are assembled into lines, each line string is
//! scanned, every match is mapped back to a box on the page, and the box
//! is covered and redrawn with the replacement text. Pages are handled
//! strictly in order and nothing carries over between them except the
//! output document and the font's glyph usage.

use lopdf::Document;
use tracing::{debug, instrument, warn};

use super::{DocumentReport, Mode, ProcessedDocument};
use crate::config::PipelineConfig;
use crate::domain::{PatternMatcher, PhoneMatcher};
use crate::error::{RedactorError, RedactorResult};
use crate::layout::{GeometryMapper, LineAssembler};
use crate::pdf::{extract_page_fragments, EmbeddedFont, FontSource, PageCanvas, RedactionRenderer};

/// Overwrites every phone-number match on the source pages.
#[instrument(skip_all, fields(bytes = source.len()))]
pub fn redact_in_place(
    source: &[u8],
    replacement: &str,
    font: &FontSource,
    config: &PipelineConfig,
) -> RedactorResult<ProcessedDocument> {
    let pages = extract_page_fragments(source)?;

    let mut doc = Document::load_mem(source).map_err(|e| RedactorError::ParseFailure {
        message: format!("cannot load document for writing: {}", e),
        page: None,
        source: Some(Box::new(e)),
    })?;
    if doc.is_encrypted() {
        return Err(RedactorError::parse("encrypted documents are not supported"));
    }
    let page_ids = doc.get_pages();

    let assembler = LineAssembler::new(&config.layout);
    let mapper = GeometryMapper::new(&config.layout);
    let renderer = RedactionRenderer::new(&config.render);
    let matcher = PhoneMatcher::new();

    let mut report = DocumentReport::new(Mode::InPlace);
    report.pages_processed = page_ids.len();
    report.pages_written = page_ids.len();

    // Registered on first use so untouched documents gain no font object
    let mut embedded: Option<EmbeddedFont> = None;

    for page in pages {
        let Some(&page_id) = page_ids.get(&page.page_number) else {
            warn!(page = page.page_number, "Extracted page not found in page tree");
            continue;
        };

        let mut canvas = PageCanvas::open(&doc, page.page_number, page_id);
        let lines = assembler.assemble(page.fragments);

        for line in &lines {
            for m in matcher.find_matches(&line.text) {
                report.matches_found += 1;
                let Some(area) = mapper.map_match_to_box(line, &m, page.viewport, canvas.size())
                else {
                    debug!(page = page.page_number, text = %m.matched_text, "Match has no geometry");
                    continue;
                };

                let font_handle =
                    embedded.get_or_insert_with(|| EmbeddedFont::register(&mut doc, font));
                renderer.redact(&mut canvas, &area, replacement, font_handle)?;
                report.redactions_applied += 1;
            }
        }

        let touched = canvas
            .commit(&mut doc, embedded.as_mut())
            .map_err(|e| e.on_page(page.page_number))?;
        if touched {
            report.pages_modified += 1;
        }
    }

    if let Some(font) = embedded {
        font.finish(&mut doc)?;
    }

    let mut bytes = Vec::with_capacity(source.len() + 4096);
    doc.save_to(&mut bytes)
        .map_err(|e| RedactorError::RenderFailure {
            message: format!("cannot serialize document: {}", e),
            page: None,
            source: Some(Box::new(e)),
        })?;

    debug!(
        matches = report.matches_found,
        redactions = report.redactions_applied,
        pages_modified = report.pages_modified,
        "In-place redaction finished"
    );
    Ok(ProcessedDocument { bytes, report })
}
