//! Phone-number redaction for PDF documents.
//!
//! Phone-number-like strings are located in a document's text and either
//! overwritten on the original pages, keeping the layout, or removed from
//! a freshly typeset copy of the text.
//!
//! # Features
//!
//! - **In-place redaction**: rebuilds lines from positioned text, maps each
//!   match back to its glyphs and paints a cover with replacement text
//! - **Rebuild**: normalized, scrubbed text reflowed onto new pages
//! - **Presentable**: the same with title, subtitle, bullets and paragraphs
//! - **Vanity numbers**: `1-800-FLOWERS` style numbers are decoded before
//!   matching in the whole-text modes
//! - **Batch processing**: independent per-document outcome records
//!
//! # Architecture
//!
//! - [`domain`]: text normalization and phone matching
//! - [`layout`]: line assembly and match-to-box geometry
//! - [`pdf`]: extraction, fonts, page drawing and document writing
//! - [`reflow`]: wrapping, pagination and presentable segmentation
//! - [`redaction`]: the three pipelines, the service and batches
//! - [`config`]: tolerances and sizes, loadable from TOML
//! - [`error`]: error handling
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = std::fs::read("statement.pdf")?;
//! let redacted = phone_redactor::process_in_place(&source, "XXX-XXX-XXXX")?;
//! std::fs::write("statement.redacted.pdf", redacted)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Pattern Matching
//!
//! ```
//! use phone_redactor::domain::{PatternMatcher, PhoneMatcher};
//!
//! let matcher = PhoneMatcher::new();
//! let matches = matcher.find_matches("call 555-123-4567 now");
//! assert_eq!(matches.len(), 1);
//! assert_eq!((matches[0].start, matches[0].end), (5, 17));
//! ```

// Public API
pub mod config;
pub mod domain;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod redaction;
pub mod reflow;

// Re-exports for convenient access
pub use config::{ClusterPolicy, PipelineConfig};
pub use domain::{Match, PatternMatcher, PhoneMatcher, TextNormalizer};
pub use error::{RedactorError, RedactorResult};
pub use pdf::FontSource;
pub use redaction::{
    DocumentJob, DocumentOutcome, DocumentReport, FileSourceLoader, Mode, ProcessedDocument,
    RedactionService, SourceLoader,
};

/// Overwrites phone numbers on the original pages, keeping the layout.
///
/// The replacement is drawn in built-in Helvetica, which only covers
/// WinAnsi. Use [`process_with_font`] with a TrueType [`FontSource`] for
/// any other script.
pub fn process_in_place(source_bytes: &[u8], replacement: &str) -> RedactorResult<Vec<u8>> {
    process(Mode::InPlace, source_bytes, replacement)
}

/// Writes the scrubbed text of the document into a new plain document.
pub fn process_rebuild(source_bytes: &[u8], replacement: &str) -> RedactorResult<Vec<u8>> {
    process(Mode::Rebuild, source_bytes, replacement)
}

/// Writes the scrubbed text as a titled document with bullets and paragraphs.
pub fn process_presentable(source_bytes: &[u8], replacement: &str) -> RedactorResult<Vec<u8>> {
    process(Mode::Presentable, source_bytes, replacement)
}

/// Runs any mode with a caller-supplied font.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use phone_redactor::{process_with_font, FontSource, Mode};
///
/// let font = FontSource::from_bytes(std::fs::read("NotoSans-Regular.ttf")?)?;
/// let source = std::fs::read("statement.pdf")?;
/// let redacted = process_with_font(Mode::InPlace, &source, "номер скрыт", &font)?;
/// # Ok(())
/// # }
/// ```
pub fn process_with_font(
    mode: Mode,
    source_bytes: &[u8],
    replacement: &str,
    font: &FontSource,
) -> RedactorResult<Vec<u8>> {
    RedactionService::default()
        .process_with_font(mode, source_bytes, replacement, font)
        .map(|processed| processed.bytes)
}

fn process(mode: Mode, source_bytes: &[u8], replacement: &str) -> RedactorResult<Vec<u8>> {
    process_with_font(mode, source_bytes, replacement, &FontSource::Builtin)
}
