//! Processing several documents independently.
//!
//! A batch is not atomic: every job gets its own outcome record, in input
//! order, whether its source could be loaded or not.

use std::path::Path;

use tracing::{info, warn};

use super::{Mode, ProcessedDocument, RedactionService};
use crate::error::{RedactorError, RedactorResult};
use crate::pdf::FontSource;

/// Retrieves document and font bytes by name.
pub trait SourceLoader {
    fn load_document(&self, name: &str) -> RedactorResult<Vec<u8>>;

    fn load_font(&self, name: &str) -> RedactorResult<FontSource>;
}

/// Loads sources from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSourceLoader;

impl SourceLoader for FileSourceLoader {
    fn load_document(&self, name: &str) -> RedactorResult<Vec<u8>> {
        std::fs::read(name).map_err(|e| RedactorError::SourceUnavailable {
            resource: name.to_string(),
            reason: e.to_string(),
            source: Some(Box::new(e)),
        })
    }

    fn load_font(&self, name: &str) -> RedactorResult<FontSource> {
        FontSource::from_path(Path::new(name))
    }
}

/// One document to process.
#[derive(Debug, Clone)]
pub struct DocumentJob {
    pub source: String,
    pub mode: Mode,
    pub replacement: String,
    /// Overrides the service font for this document.
    pub font: Option<String>,
}

impl DocumentJob {
    pub fn new(source: impl Into<String>, mode: Mode, replacement: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            mode,
            replacement: replacement.into(),
            font: None,
        }
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }
}

/// Result record for one job.
#[derive(Debug)]
pub enum DocumentOutcome {
    Success {
        source: String,
        document: ProcessedDocument,
    },
    Failure {
        source: String,
        error: RedactorError,
    },
}

impl DocumentOutcome {
    pub fn source(&self) -> &str {
        match self {
            DocumentOutcome::Success { source, .. } | DocumentOutcome::Failure { source, .. } => {
                source
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DocumentOutcome::Success { .. })
    }
}

fn run_job(
    service: &RedactionService,
    loader: &dyn SourceLoader,
    job: &DocumentJob,
) -> RedactorResult<ProcessedDocument> {
    let bytes = loader.load_document(&job.source)?;
    match &job.font {
        Some(font) => {
            let font = loader.load_font(font)?;
            service.process_with_font(job.mode, &bytes, &job.replacement, &font)
        }
        None => service.process(job.mode, &bytes, &job.replacement),
    }
}

/// Runs every job sequentially; a failure only affects its own record.
pub fn process_batch(
    service: &RedactionService,
    loader: &dyn SourceLoader,
    jobs: &[DocumentJob],
) -> Vec<DocumentOutcome> {
    jobs.iter()
        .map(|job| match run_job(service, loader, job) {
            Ok(document) => {
                info!(source = %job.source, mode = %job.mode, "Document processed");
                DocumentOutcome::Success {
                    source: job.source.clone(),
                    document,
                }
            }
            Err(error) => {
                warn!(source = %job.source, %error, "Document failed");
                DocumentOutcome::Failure {
                    source: job.source.clone(),
                    error,
                }
            }
        })
        .collect()
}
