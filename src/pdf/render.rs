//! Cover-and-redraw on existing PDF pages.
//!
//! [`PageCanvas`] collects drawing operations for one page of a `lopdf`
//! document and appends them in a single new content stream when the page
//! is committed. The page's original content is wrapped in `q`/`Q` first,
//! so whatever graphics state it leaves behind cannot leak into the
//! redaction drawing.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::{debug, warn};

use super::font::EmbeddedFont;
use crate::config::RenderConfig;
use crate::error::{RedactorError, RedactorResult};
use crate::layout::{DestinationBox, PageSize};

/// Page tree depth at which inheritance lookups give up.
const MAX_TREE_DEPTH: usize = 64;

/// US Letter, used when a page tree carries no MediaBox at all.
const FALLBACK_PAGE: PageBounds = PageBounds {
    origin_x: 0.0,
    origin_y: 0.0,
    size: PageSize {
        width: 612.0,
        height: 792.0,
    },
};

/// A page's MediaBox: its lower-left corner in user space and its size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBounds {
    pub origin_x: f64,
    pub origin_y: f64,
    pub size: PageSize,
}

/// Walks up the page tree until `key` is found.
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn number(doc: &Document, obj: &Object) -> Option<f64> {
    let resolved = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    resolved.as_float().ok().map(f64::from)
}

/// Page bounds from the MediaBox, honoring inheritance.
pub fn page_bounds(doc: &Document, page_id: ObjectId) -> PageBounds {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox").and_then(|obj| match obj {
        Object::Reference(id) => doc.get_object(id).ok().cloned(),
        other => Some(other),
    });

    let corners: Option<Vec<f64>> = media_box
        .as_ref()
        .and_then(|obj| obj.as_array().ok())
        .and_then(|arr| arr.iter().map(|v| number(doc, v)).collect());

    match corners.as_deref() {
        Some([llx, lly, urx, ury]) => PageBounds {
            origin_x: llx.min(*urx),
            origin_y: lly.min(*ury),
            size: PageSize::new((urx - llx).abs(), (ury - lly).abs()),
        },
        _ => {
            warn!(?page_id, "Page has no usable MediaBox, assuming US Letter");
            FALLBACK_PAGE
        }
    }
}

/// Resolves a dictionary-valued object to an owned copy.
fn owned_dictionary(doc: &Document, obj: Option<Object>) -> Dictionary {
    match obj {
        Some(Object::Dictionary(dict)) => dict,
        Some(Object::Reference(id)) => doc
            .get_dictionary(id)
            .cloned()
            .unwrap_or_else(|_| Dictionary::new()),
        _ => Dictionary::new(),
    }
}

/// Pending drawing operations for one output page.
#[derive(Debug)]
pub struct PageCanvas {
    page_id: ObjectId,
    page_number: u32,
    bounds: PageBounds,
    font_name: String,
    operations: Vec<Operation>,
}

impl PageCanvas {
    pub fn open(doc: &Document, page_number: u32, page_id: ObjectId) -> Self {
        let resources = owned_dictionary(doc, inherited_attribute(doc, page_id, b"Resources"));
        let fonts = owned_dictionary(doc, resources.get(b"Font").ok().cloned());

        // Pick a resource name the page does not already use
        let font_name = (1..)
            .map(|n| format!("FRdct{}", n))
            .find(|name| !fonts.has(name.as_bytes()))
            .unwrap_or_else(|| "FRdct".to_string());

        Self {
            page_id,
            page_number,
            bounds: page_bounds(doc, page_id),
            font_name,
            operations: Vec::new(),
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Size of the page's MediaBox, the space boxes are mapped into.
    pub fn size(&self) -> PageSize {
        self.bounds.size
    }

    /// Moves a box from MediaBox-relative coordinates into user space.
    fn place(&self, area: &DestinationBox) -> DestinationBox {
        DestinationBox {
            x: area.x + self.bounds.origin_x,
            y: area.y + self.bounds.origin_y,
            ..*area
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    /// Appends the collected operations to the page.
    ///
    /// Returns `false` without touching the document when nothing was drawn.
    pub fn commit(self, doc: &mut Document, font: Option<&mut EmbeddedFont>) -> RedactorResult<bool> {
        if self.operations.is_empty() {
            return Ok(false);
        }

        if let Some(font) = font {
            self.register_font(doc, font.reference())?;
        }

        let existing: Vec<Object> = match doc.get_dictionary(self.page_id)?.get(b"Contents") {
            Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
            Ok(Object::Array(items)) => items.clone(),
            _ => Vec::new(),
        };

        let mut operations = Vec::with_capacity(self.operations.len() + 1);
        let mut contents = Vec::with_capacity(existing.len() + 2);
        if !existing.is_empty() {
            // Streams are concatenated without separators by some readers
            let save = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
            contents.push(Object::Reference(save));
            contents.extend(existing);
            operations.push(Operation::new("Q", vec![]));
        }
        operations.extend(self.operations);

        let mut encoded = vec![b'\n'];
        encoded.extend(
            Content { operations }
                .encode()
                .map_err(|e| RedactorError::from(e).on_page(self.page_number))?,
        );
        let drawing = doc.add_object(Stream::new(Dictionary::new(), encoded));
        contents.push(Object::Reference(drawing));

        doc.get_dictionary_mut(self.page_id)?
            .set("Contents", Object::Array(contents));

        debug!(page = self.page_number, "Appended redaction content stream");
        Ok(true)
    }

    /// Adds the font to the page's own resources, copying inherited or
    /// shared dictionaries down first so no other page is affected.
    fn register_font(&self, doc: &mut Document, font_id: ObjectId) -> RedactorResult<()> {
        let mut resources = owned_dictionary(
            doc,
            inherited_attribute(doc, self.page_id, b"Resources"),
        );
        let mut fonts = owned_dictionary(doc, resources.get(b"Font").ok().cloned());
        fonts.set(self.font_name.as_str(), Object::Reference(font_id));
        resources.set("Font", Object::Dictionary(fonts));

        doc.get_dictionary_mut(self.page_id)?
            .set("Resources", Object::Dictionary(resources));
        Ok(())
    }
}

fn rgb(color: [f64; 3]) -> Vec<Object> {
    color.iter().map(|c| Object::Real(c.clamp(0.0, 1.0) as f32)).collect()
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Paints an opaque cover over a box and draws the replacement on top.
#[derive(Debug, Clone)]
pub struct RedactionRenderer {
    draw_size: f64,
    text_inset: f64,
    cover_color: [f64; 3],
    text_color: [f64; 3],
}

impl RedactionRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            draw_size: config.draw_size,
            text_inset: config.text_inset,
            cover_color: config.cover_color,
            text_color: config.text_color,
        }
    }

    /// Covers `area` and draws `replacement` left-aligned inside it,
    /// clipped one point short of its right edge. Text is never wrapped.
    pub fn redact(
        &self,
        canvas: &mut PageCanvas,
        area: &DestinationBox,
        replacement: &str,
        font: &mut EmbeddedFont,
    ) -> RedactorResult<()> {
        // Encode first: a glyph failure must not leave a half-drawn box
        let encoded = if replacement.is_empty() {
            None
        } else {
            Some(
                font.encode(replacement)
                    .map_err(|e| e.on_page(canvas.page_number()))?,
            )
        };

        let area = canvas.place(area);
        canvas.push("q", vec![]);
        canvas.push("rg", rgb(self.cover_color));
        canvas.push(
            "re",
            vec![real(area.x), real(area.y), real(area.width), real(area.height)],
        );
        canvas.push("f", vec![]);
        canvas.push("Q", vec![]);

        let Some(encoded) = encoded else {
            return Ok(());
        };

        let font_name = canvas.font_name.clone();
        canvas.push("q", vec![]);
        canvas.push(
            "re",
            vec![
                real(area.x),
                real(area.y),
                real((area.width - 1.0).max(0.0)),
                real(area.height),
            ],
        );
        canvas.push("W", vec![]);
        canvas.push("n", vec![]);
        canvas.push("BT", vec![]);
        canvas.push("Tf", vec![Object::Name(font_name.into_bytes()), real(self.draw_size)]);
        canvas.push("rg", rgb(self.text_color));
        canvas.push(
            "Td",
            vec![real(area.x + self.text_inset), real(area.y + self.text_inset)],
        );
        canvas.push("Tj", vec![Object::String(encoded, StringFormat::Hexadecimal)]);
        canvas.push("ET", vec![]);
        canvas.push("Q", vec![]);
        Ok(())
    }
}

impl Default for RedactionRenderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}
