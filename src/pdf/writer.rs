//! Fresh documents for the rebuild pipelines, generated with `printpdf`.

use std::io::Cursor;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, Pt};
use tracing::debug;

use super::font::FontSource;
use crate::config::ReflowConfig;
use crate::error::{RedactorError, RedactorResult};

/// One line of output text with its type size and line advance, in points.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub size: f64,
    pub leading: f64,
}

impl TextLine {
    pub fn new(text: impl Into<String>, size: f64, leading: f64) -> Self {
        Self {
            text: text.into(),
            size,
            leading,
        }
    }

    /// An empty line that only advances the cursor.
    pub fn gap(leading: f64) -> Self {
        Self::new(String::new(), 0.0, leading)
    }
}

fn render_error(context: &str, err: printpdf::Error) -> RedactorError {
    RedactorError::RenderFailure {
        message: format!("{}: {}", context, err),
        page: None,
        source: Some(Box::new(err)),
    }
}

fn load_font(doc: &PdfDocumentReference, font: &FontSource) -> RedactorResult<IndirectFontRef> {
    match font {
        FontSource::Builtin => doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| render_error("cannot add Helvetica", e)),
        FontSource::TrueType(ttf) => doc
            .add_external_font(Cursor::new(ttf.data().to_vec()))
            .map_err(|e| render_error("cannot embed TrueType font", e)),
    }
}

/// Writes `pages` top-down, one PDF page per entry.
///
/// An empty page list still produces a single blank page.
pub fn write_text_pages(
    title: &str,
    pages: &[Vec<TextLine>],
    font: &FontSource,
    reflow: &ReflowConfig,
) -> RedactorResult<Vec<u8>> {
    let width = Mm::from(Pt(reflow.page_width as f32));
    let height = Mm::from(Pt(reflow.page_height as f32));
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
    let font_ref = load_font(&doc, font)?;

    for (idx, lines) in pages.iter().enumerate() {
        let (page, layer) = if idx == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Layer 1")
        };
        let layer = doc.get_page(page).get_layer(layer);

        let mut cursor = reflow.page_height - reflow.margin;
        for line in lines {
            if !line.text.is_empty() {
                font.ensure_covers(&line.text)?;
                let baseline = cursor - line.size;
                layer.use_text(
                    line.text.as_str(),
                    line.size as f32,
                    Mm::from(Pt(reflow.margin as f32)),
                    Mm::from(Pt(baseline as f32)),
                    &font_ref,
                );
            }
            cursor -= line.leading.max(line.size);
        }
    }

    debug!(pages = pages.len().max(1), "Serializing rebuilt document");
    doc.save_to_bytes()
        .map_err(|e| render_error("cannot serialize document", e))
}
