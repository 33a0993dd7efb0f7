//! Page geometry: positioned fragments, reassembled lines and boxes.
//!
//! A page reaches this module as a flat list of [`Fragment`]s plus the
//! viewport size they were measured in. [`LineAssembler`] rebuilds the
//! visual lines so the matcher can scan whole strings, and
//! [`GeometryMapper`] turns a match in a line string back into a rectangle
//! on the output page.

pub mod assembler;
pub mod geometry;

pub use assembler::LineAssembler;
pub use geometry::GeometryMapper;

/// One positioned run of text in the source viewport.
///
/// Coordinates are relative to the viewport's lower-left corner with y
/// growing upward. `y` is the top of the run's glyph box and `height` its
/// full extent, so the box spans `y - height ..= y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Fragment {
    pub fn new(text: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// A byte range of [`Line::text`] and the fragment that produced it.
///
/// Offsets are UTF-8 byte offsets, the same indexing [`crate::Match`] uses.
///
/// `fragment_index` is `None` for a space synthesized between two
/// fragments, otherwise an index into [`Line::fragments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub fragment_index: Option<usize>,
}

impl Span {
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// A visually clustered run of fragments reassembled into one string.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Anchor: the y of the first fragment that created the line. Larger
    /// anchors are higher on the page.
    pub y_reference: f64,
    /// Sorted by x ascending.
    pub fragments: Vec<Fragment>,
    pub text: String,
    /// Contiguous, ordered and covering all of `text`.
    pub spans: Vec<Span>,
}

/// Width and height of a page or viewport, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Union box of matched fragments in source viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceBox {
    pub min_x: f64,
    pub max_x: f64,
    pub top_y: f64,
    pub bottom_y: f64,
}

/// Rectangle in destination page space, origin at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestinationBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
