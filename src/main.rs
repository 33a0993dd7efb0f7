//! Phone-number redaction CLI.
//!
//! Redacts batches of documents, and offers `extract` and `scan` for
//! checking what the matcher sees in a document or a literal string.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use phone_redactor::domain::prepare_for_matching;
use phone_redactor::layout::LineAssembler;
use phone_redactor::pdf::{extract_page_fragments, extract_text};
use phone_redactor::{
    DocumentJob, DocumentOutcome, FileSourceLoader, Mode, PatternMatcher, PhoneMatcher,
    PipelineConfig, RedactionService,
};

/// Phone-number redaction for PDF documents
///
/// Finds phone numbers and either overwrites them on the original pages or
/// writes the scrubbed text into a new document.
#[derive(Parser)]
#[command(name = "phone-redactor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Pipeline configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Redact phone numbers from one or more documents
    Redact {
        /// Input PDF file (can be specified multiple times)
        #[arg(short, long = "input", value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Redaction mode
        #[arg(short, long, value_enum, default_value_t = ModeArg::InPlace)]
        mode: ModeArg,

        /// Text drawn or substituted in place of each number
        #[arg(short, long, default_value = "XXX-XXX-XXXX")]
        replacement: String,

        /// TrueType font used for replacement text
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,
    },

    /// Extract text from a PDF (for debugging and verification)
    Extract {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Print assembled lines per page with their matches
        #[arg(long)]
        lines: bool,
    },

    /// Print the phone numbers found in a literal string
    Scan {
        /// Text to scan
        #[arg(short, long)]
        text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    InPlace,
    Rebuild,
    Presentable,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::InPlace => Mode::InPlace,
            ModeArg::Rebuild => Mode::Rebuild,
            ModeArg::Presentable => Mode::Presentable,
        }
    }
}

/// Command handler owning the configured service.
struct RedactionHandler {
    service: RedactionService,
}

impl RedactionHandler {
    fn new(config: PipelineConfig) -> Self {
        Self {
            service: RedactionService::new(config, Default::default()),
        }
    }

    /// Processes every input independently and writes `<stem>.redacted.pdf`
    /// files into `output`. Fails if any document failed.
    fn redact(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        mode: Mode,
        replacement: &str,
        font: Option<&Path>,
    ) -> Result<()> {
        std::fs::create_dir_all(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;

        let jobs: Vec<DocumentJob> = inputs
            .iter()
            .map(|input| {
                let job = DocumentJob::new(input.to_string_lossy(), mode, replacement);
                match font {
                    Some(font) => job.with_font(font.to_string_lossy()),
                    None => job,
                }
            })
            .collect();

        let outcomes = self.service.process_batch(&FileSourceLoader, &jobs);

        let mut failed = 0;
        for (input, outcome) in inputs.iter().zip(outcomes) {
            match outcome {
                DocumentOutcome::Success { document, .. } => {
                    let target = output_path(output, input);
                    match std::fs::write(&target, &document.bytes) {
                        Ok(()) => {
                            let report = &document.report;
                            println!(
                                "✓ {} → {} ({} match(es), {} page(s))",
                                input.display(),
                                target.display(),
                                report.matches_found,
                                report.pages_written
                            );
                        }
                        Err(e) => {
                            failed += 1;
                            eprintln!("✗ {}: cannot write {}: {}", input.display(), target.display(), e);
                        }
                    }
                }
                DocumentOutcome::Failure { error, .. } => {
                    failed += 1;
                    eprintln!("✗ {}: {}", input.display(), error);
                }
            }
        }

        if failed > 0 {
            anyhow::bail!("{} of {} document(s) failed", failed, inputs.len());
        }
        Ok(())
    }

    /// Prints extracted text, or assembled lines with their matches.
    fn extract(&self, input: &Path, lines: bool) -> Result<()> {
        let bytes =
            std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

        if !lines {
            let text = extract_text(&bytes).with_context(|| "Text extraction failed")?;
            println!("{}", text);
            return Ok(());
        }

        let pages = extract_page_fragments(&bytes).with_context(|| "Text extraction failed")?;
        let assembler = LineAssembler::new(&self.service.config().layout);
        let matcher = PhoneMatcher::new();

        for page in pages {
            println!("--- page {} ---", page.page_number);
            for line in assembler.assemble(page.fragments) {
                println!("{:>8.2}  {}", line.y_reference, line.text);
                for m in matcher.find_matches(&line.text) {
                    println!("          [{}..{}] {}", m.start, m.end, m.matched_text);
                }
            }
        }
        Ok(())
    }

    fn scan(&self, text: &str) -> Result<()> {
        let prepared = prepare_for_matching(text, &self.service.config().matching);
        let matches = PhoneMatcher::new().find_matches(&prepared);

        if matches.is_empty() {
            println!("No phone numbers found");
        }
        for m in matches {
            println!("{}..{}\t{}", m.start, m.end, m.matched_text);
        }
        Ok(())
    }
}

/// `<dir>/<stem>.redacted.pdf`
fn output_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    dir.join(format!("{}.redacted.pdf", stem))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Invalid configuration {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let handler = RedactionHandler::new(config);

    match &cli.command {
        Commands::Redact {
            inputs,
            output,
            mode,
            replacement,
            font,
        } => handler.redact(inputs, output, (*mode).into(), replacement, font.as_deref()),
        Commands::Extract { input, lines } => handler.extract(input, *lines),
        Commands::Scan { text } => handler.scan(text),
    }
}
