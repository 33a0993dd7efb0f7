//! Text and fragment extraction on top of `pdf-extract`.
//!
//! `pdf-extract` interprets content streams and reports every glyph with
//! its text rendering matrix. [`FragmentCollector`] joins those glyphs into
//! word-level runs and reports them in viewport coordinates: origin at the
//! MediaBox's lower-left corner, y growing upward.
//!
//! The extractor panics on some malformed input, so every entry point here
//! runs behind [`std::panic::catch_unwind`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use tracing::{debug, warn};

use crate::error::{RedactorError, RedactorResult};
use crate::layout::{Fragment, PageSize};

/// Share of the glyph size above the baseline treated as the run's top.
const ASCENT_RATIO: f64 = 0.9;
/// Share of the glyph size below the baseline treated as the run's bottom.
const DESCENT_RATIO: f64 = 0.25;
/// Horizontal slack, relative to glyph size, before a run is split.
const JOIN_SLACK_RATIO: f64 = 0.15;
/// Baseline drift, relative to glyph size, before a run is split.
const BASELINE_SLACK_RATIO: f64 = 0.5;

/// The fragments of one page and the viewport they were measured in.
#[derive(Debug, Clone)]
pub struct PageFragments {
    /// 1-based page number.
    pub page_number: u32,
    pub viewport: PageSize,
    pub fragments: Vec<Fragment>,
}

#[derive(Debug)]
struct Run {
    text: String,
    x: f64,
    baseline: f64,
    size: f64,
    end_x: f64,
}

impl Run {
    fn continues(&self, x: f64, baseline: f64, size: f64) -> bool {
        let scale = self.size.max(size).max(1.0);
        (baseline - self.baseline).abs() <= BASELINE_SLACK_RATIO * scale
            && (x - self.end_x).abs() <= JOIN_SLACK_RATIO * scale
    }
}

/// `OutputDev` that records positioned word-level runs per page.
#[derive(Debug, Default)]
pub struct FragmentCollector {
    pages: Vec<PageFragments>,
    current: Option<PageFragments>,
    origin: (f64, f64),
    run: Option<Run>,
}

impl FragmentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages seen so far, in the order the extractor visited them.
    pub fn into_pages(mut self) -> Vec<PageFragments> {
        self.close_page();
        self.pages
    }

    fn flush_run(&mut self) {
        let (Some(run), Some(page)) = (self.run.take(), self.current.as_mut()) else {
            return;
        };
        page.fragments.push(Fragment {
            x: run.x,
            y: run.baseline + ASCENT_RATIO * run.size,
            width: (run.end_x - run.x).max(0.0),
            height: (ASCENT_RATIO + DESCENT_RATIO) * run.size,
            text: run.text,
        });
    }

    fn close_page(&mut self) {
        self.flush_run();
        if let Some(page) = self.current.take() {
            debug!(
                page = page.page_number,
                fragments = page.fragments.len(),
                "Collected page fragments"
            );
            self.pages.push(page);
        }
    }
}

impl OutputDev for FragmentCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.close_page();
        self.origin = (media_box.llx, media_box.lly);
        self.current = Some(PageFragments {
            page_number: page_num,
            viewport: PageSize::new(media_box.urx - media_box.llx, media_box.ury - media_box.lly),
            fragments: Vec::new(),
        });
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.close_page();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        if char.trim().is_empty() {
            self.flush_run();
            return Ok(());
        }

        let scale = (trm.m11 * trm.m22 - trm.m12 * trm.m21).abs().sqrt();
        let size = font_size * scale;
        let x = trm.m31 - self.origin.0;
        let baseline = trm.m32 - self.origin.1;
        let end_x = x + width * size;

        match self.run.as_mut() {
            Some(run) if run.continues(x, baseline, size) => {
                run.text.push_str(char);
                run.end_x = end_x;
                run.size = run.size.max(size);
            }
            _ => {
                self.flush_run();
                self.run = Some(Run {
                    text: char.to_string(),
                    x,
                    baseline,
                    size,
                    end_x,
                });
            }
        }
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Extracts positioned fragments for every page of a PDF.
pub fn extract_page_fragments(bytes: &[u8]) -> RedactorResult<Vec<PageFragments>> {
    guarded(|| {
        let doc = pdf_extract::Document::load_mem(bytes)
            .map_err(|e| RedactorError::parse(format!("cannot read document: {}", e)))?;
        if doc.is_encrypted() {
            return Err(RedactorError::parse("encrypted documents are not supported"));
        }

        let mut collector = FragmentCollector::new();
        pdf_extract::output_doc(&doc, &mut collector)
            .map_err(|e| RedactorError::parse(format!("cannot interpret page content: {}", e)))?;
        Ok(collector.into_pages())
    })
}

/// Extracts the document's plain text in reading order.
pub fn extract_text(bytes: &[u8]) -> RedactorResult<String> {
    guarded(|| {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| RedactorError::parse(format!("cannot extract text: {}", e)))
    })
}

/// Extracts plain text page by page.
pub fn extract_text_by_pages(bytes: &[u8]) -> RedactorResult<Vec<String>> {
    guarded(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| RedactorError::parse(format!("cannot extract text: {}", e)))
    })
}

fn guarded<T>(f: impl FnOnce() -> RedactorResult<T>) -> RedactorResult<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(%message, "Text extractor panicked");
            Err(RedactorError::parse(format!("text extractor aborted: {}", message)))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
