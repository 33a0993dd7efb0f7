//! Redaction pipelines and the service that dispatches to them.
//!
//! Three pipelines share one entry point:
//! - [`Mode::InPlace`] overwrites matches on the original pages and keeps
//!   the layout
//! - [`Mode::Rebuild`] writes the scrubbed text into a fresh document
//! - [`Mode::Presentable`] does the same with a title, bullets and
//!   paragraphs
//!
//! The mode is resolved once per document; each arm calls its own
//! pipeline function.

pub mod batch;
pub mod in_place;
pub mod rebuild;

pub use batch::{DocumentJob, DocumentOutcome, FileSourceLoader, SourceLoader};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::config::PipelineConfig;
use crate::error::{RedactorError, RedactorResult};
use crate::pdf::FontSource;

/// How a document is redacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    InPlace,
    Rebuild,
    Presentable,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::InPlace => "in-place",
            Mode::Rebuild => "rebuild",
            Mode::Presentable => "presentable",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RedactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in-place" | "inplace" | "in_place" => Ok(Mode::InPlace),
            "rebuild" => Ok(Mode::Rebuild),
            "presentable" => Ok(Mode::Presentable),
            other => Err(RedactorError::InvalidInput {
                parameter: "mode".to_string(),
                reason: format!("unknown mode '{}'", other),
            }),
        }
    }
}

/// Statistics about one processed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    pub mode: Mode,
    /// Pages in the source document
    pub pages_processed: usize,
    /// Pages that received at least one redaction (in-place only)
    pub pages_modified: usize,
    /// Phone-number matches found
    pub matches_found: usize,
    /// Cover rectangles drawn (in-place only)
    pub redactions_applied: usize,
    /// Pages in the output document
    pub pages_written: usize,
}

impl DocumentReport {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            pages_processed: 0,
            pages_modified: 0,
            matches_found: 0,
            redactions_applied: 0,
            pages_written: 0,
        }
    }

    /// Returns true if anything was replaced.
    pub fn has_redactions(&self) -> bool {
        self.redactions_applied > 0 || (self.mode != Mode::InPlace && self.matches_found > 0)
    }
}

/// Output bytes plus what happened while producing them.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub bytes: Vec<u8>,
    pub report: DocumentReport,
}

/// Redaction service holding the configuration and default font.
#[derive(Debug, Clone, Default)]
pub struct RedactionService {
    config: PipelineConfig,
    font: FontSource,
}

impl RedactionService {
    pub fn new(config: PipelineConfig, font: FontSource) -> Self {
        Self { config, font }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn font(&self) -> &FontSource {
        &self.font
    }

    /// Runs one document through the pipeline for `mode`.
    pub fn process(
        &self,
        mode: Mode,
        source: &[u8],
        replacement: &str,
    ) -> RedactorResult<ProcessedDocument> {
        self.process_with_font(mode, source, replacement, &self.font)
    }

    pub fn process_with_font(
        &self,
        mode: Mode,
        source: &[u8],
        replacement: &str,
        font: &FontSource,
    ) -> RedactorResult<ProcessedDocument> {
        if source.is_empty() {
            return Err(RedactorError::InvalidInput {
                parameter: "source".to_string(),
                reason: "document is empty".to_string(),
            });
        }

        match mode {
            Mode::InPlace => in_place::redact_in_place(source, replacement, font, &self.config),
            Mode::Rebuild => rebuild::rebuild(source, replacement, font, &self.config),
            Mode::Presentable => rebuild::presentable(source, replacement, font, &self.config),
        }
    }

    /// Redacts a file on disk and writes the result to `output`.
    pub fn redact_file(
        &self,
        input: &Path,
        output: &Path,
        mode: Mode,
        replacement: &str,
    ) -> RedactorResult<DocumentReport> {
        let source = std::fs::read(input).map_err(|e| RedactorError::Io {
            path: input.to_path_buf(),
            source: e,
        })?;

        let processed = self.process(mode, &source, replacement)?;

        std::fs::write(output, &processed.bytes).map_err(|e| RedactorError::Io {
            path: output.to_path_buf(),
            source: e,
        })?;
        info!(
            input = %input.display(),
            output = %output.display(),
            %mode,
            matches = processed.report.matches_found,
            "Document redacted"
        );
        Ok(processed.report)
    }

    /// Processes every job independently; one outcome per job, in order.
    pub fn process_batch(
        &self,
        loader: &dyn SourceLoader,
        jobs: &[DocumentJob],
    ) -> Vec<DocumentOutcome> {
        batch::process_batch(self, loader, jobs)
    }
}
