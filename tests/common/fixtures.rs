//! Source documents for tests.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use ::lopdf::Object;
use phone_redactor::FontSource;
use printpdf::*;
use std::path::{Path, PathBuf};

/// Roboto Medium, shipped under tests/fonts with its license.
pub const UNICODE_FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts/RobotoMedium.ttf");

/// Millimetres to PDF points, as printpdf converts them.
pub fn mm_to_pt(mm: f32) -> f64 {
    Pt::from(Mm(mm)).0 as f64
}

/// A line of text placed at a fixed position, in millimetres from the
/// bottom-left corner.
#[derive(Debug, Clone)]
struct PlacedText {
    text: String,
    x: f32,
    y: f32,
    size: f32,
}

/// Builder for documents with Helvetica text at known positions.
///
/// ```no_run
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// let bytes = TestPdfBuilder::new()
///     .with_line("Customer service")
///     .with_line("Call 555-123-4567 today")
///     .build_bytes()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    title: String,
    pages: Vec<Vec<PlacedText>>,
    cursor_y: f32,
    page_width: Mm,
    page_height: Mm,
}

const MARGIN_MM: f32 = 20.0;
const LINE_STEP_MM: f32 = 8.0;
const DEFAULT_SIZE: f32 = 12.0;

impl TestPdfBuilder {
    /// A4 portrait, one empty page.
    pub fn new() -> Self {
        Self {
            title: "Test Document".to_string(),
            pages: vec![Vec::new()],
            cursor_y: 297.0 - MARGIN_MM,
            page_width: Mm(210.0),
            page_height: Mm(297.0),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Adds a line below the previous one on the current page.
    pub fn with_line(mut self, text: &str) -> Self {
        let y = self.cursor_y;
        self.cursor_y -= LINE_STEP_MM;
        self.with_text_at(text, MARGIN_MM, y, DEFAULT_SIZE)
    }

    /// Places text at an explicit position on the current page.
    pub fn with_text_at(mut self, text: &str, x_mm: f32, y_mm: f32, size: f32) -> Self {
        if let Some(page) = self.pages.last_mut() {
            page.push(PlacedText {
                text: text.to_string(),
                x: x_mm,
                y: y_mm,
                size,
            });
        }
        self
    }

    /// Starts a new page; following lines begin at the top again.
    pub fn new_page(mut self) -> Self {
        self.pages.push(Vec::new());
        self.cursor_y = self.page_height.0 - MARGIN_MM;
        self
    }

    pub fn build_bytes(self) -> Result<Vec<u8>> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(&self.title, self.page_width, self.page_height, "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        for (index, placed) in self.pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(self.page_width, self.page_height, "Layer 1")
            };
            let layer = doc.get_page(page).get_layer(layer);
            for text in placed {
                layer.use_text(&text.text, text.size, Mm(text.x), Mm(text.y), &font);
            }
        }

        Ok(doc.save_to_bytes()?)
    }

    /// Writes the document to `path` and returns the path.
    pub fn build(self, path: &Path) -> Result<PathBuf> {
        std::fs::write(path, self.build_bytes()?)?;
        Ok(path.to_path_buf())
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads the TrueType fixture font.
pub fn unicode_font() -> Result<FontSource> {
    FontSource::from_path(Path::new(UNICODE_FONT)).map_err(|e| anyhow!("fixture font: {}", e))
}

/// Moves every page's MediaBox so its lower-left corner sits at
/// `(llx, lly)` in user space. Content is not moved.
pub fn with_media_box_origin(bytes: &[u8], llx: f64, lly: f64) -> Result<Vec<u8>> {
    let mut doc = ::lopdf::Document::load_mem(bytes)?;
    let page_ids: Vec<::lopdf::ObjectId> = doc.get_pages().into_values().collect();
    for page_id in page_ids {
        let page = doc.get_dictionary_mut(page_id)?;
        let corners: Vec<f64> = page
            .get(b"MediaBox")?
            .as_array()?
            .iter()
            .map(|v| v.as_float().map(f64::from))
            .collect::<std::result::Result<_, _>>()?;
        let (width, height) = (corners[2] - corners[0], corners[3] - corners[1]);
        page.set(
            "MediaBox",
            vec![
                Object::Real(llx as f32),
                Object::Real(lly as f32),
                Object::Real((llx + width) as f32),
                Object::Real((lly + height) as f32),
            ],
        );
        page.remove(b"CropBox");
        page.remove(b"TrimBox");
    }
    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

/// A short statement with two numbers and some text that must survive.
pub fn create_statement(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Monthly Statement")
        .with_line("Monthly Statement")
        .with_line("Billing period January 2026")
        .with_line("Support line 555-123-4567 any time")
        .with_line("Account total 42.17")
        .with_line("Fax (555) 987-6543")
        .build(path)
}

/// A document without anything phone-like.
pub fn create_plain_letter(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Letter")
        .with_line("Dear customer")
        .with_line("Thank you for your order")
        .build(path)
}
