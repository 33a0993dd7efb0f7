//! PDF collaborators: reading fragments, embedding fonts, drawing and
//! writing documents.

pub mod extract;
pub mod font;
pub mod render;
pub mod writer;

pub use extract::{
    extract_page_fragments, extract_text, extract_text_by_pages, FragmentCollector, PageFragments,
};
pub use font::{EmbeddedFont, FontSource, TextMeasure, TrueTypeFont};
pub use render::{PageBounds, PageCanvas, RedactionRenderer};
pub use writer::{write_text_pages, TextLine};
