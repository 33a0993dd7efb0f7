//! Rebuild and presentable pipelines on generated documents.

use anyhow::Result;
use phone_redactor::config::PipelineConfig;
use phone_redactor::{
    process_presentable, process_rebuild, process_with_font, FontSource, Mode, RedactionService,
};

mod common;
use common::*;

fn statement_bytes() -> Result<Vec<u8>> {
    TestPdfBuilder::new()
        .with_line("Monthly Statement")
        .with_line("Billing period January 2026")
        .with_line("Support line 555-123-4567 any time")
        .with_line("Account total 42.17")
        .with_line("Fax (555) 987-6543")
        .with_line("Flowers at 1-800-FLOWERS")
        .build_bytes()
}

#[test]
fn test_rebuild_removes_numbers_and_keeps_text() -> Result<()> {
    let output = process_rebuild(&statement_bytes()?, "XXX-XXX-XXXX")?;
    let text = squashed_text(&output)?;

    assert!(!text.contains("555-123-4567"));
    assert!(!text.contains("987-6543"));
    assert!(!text.contains("FLOWERS"));
    assert_eq!(text.matches("XXX-XXX-XXXX").count(), 3);
    assert!(text.contains("Supportline"));
    assert!(text.contains("Accounttotal42.17"));
    assert!(text.contains("BillingperiodJanuary2026"));
    Ok(())
}

#[test]
fn test_rebuild_report() -> Result<()> {
    let processed =
        RedactionService::default().process(Mode::Rebuild, &statement_bytes()?, "[removed]")?;
    let report = &processed.report;

    assert_eq!(report.mode, Mode::Rebuild);
    assert_eq!(report.pages_processed, 1);
    assert_eq!(report.matches_found, 3);
    assert_eq!(report.redactions_applied, 0);
    assert_eq!(report.pages_written, page_count(&processed.bytes)?);
    assert!(report.has_redactions());
    Ok(())
}

#[test]
fn test_rebuild_paginates_long_documents() -> Result<()> {
    let mut builder = TestPdfBuilder::new();
    for page in 0..3 {
        if page > 0 {
            builder = builder.new_page();
        }
        for row in 0..30 {
            builder = builder.with_line(&format!("Page {} row {} call 555-010-{:04}", page, row, row));
        }
    }
    let source = builder.build_bytes()?;

    let config = PipelineConfig::from_toml_str(
        r#"
        [reflow]
        line_height = 30.0
        "#,
    )?;
    let service = RedactionService::new(config, FontSource::Builtin);
    let processed = service.process(Mode::Rebuild, &source, "X")?;

    assert_eq!(processed.report.pages_processed, 3);
    assert_eq!(processed.report.matches_found, 90);
    assert!(page_count(&processed.bytes)? > 3);
    assert!(!squashed_text(&processed.bytes)?.contains("555-010"));
    Ok(())
}

#[test]
fn test_empty_text_still_yields_a_page() -> Result<()> {
    let source = TestPdfBuilder::new().build_bytes()?;
    let processed = RedactionService::default().process(Mode::Rebuild, &source, "X")?;

    assert_eq!(processed.report.matches_found, 0);
    assert_eq!(page_count(&processed.bytes)?, 1);
    assert_eq!(processed.report.pages_written, 1);
    Ok(())
}

#[test]
fn test_presentable_title_and_scrubbed_body() -> Result<()> {
    let output = process_presentable(&statement_bytes()?, "XXX-XXX-XXXX")?;
    let text = extract_text(&output)?;
    let squashed = squashed_text(&output)?;

    let first_line = text.lines().map(str::trim).find(|l| !l.is_empty());
    assert_eq!(first_line, Some("Monthly Statement"));
    assert!(!squashed.contains("555-123-4567"));
    assert!(!squashed.contains("9876543"));
    assert!(squashed.contains("Accounttotal42.17"));
    Ok(())
}

#[test]
fn test_presentable_bullets_use_bullet_glyph() -> Result<()> {
    let source = TestPdfBuilder::new()
        .with_line("Service Notice")
        .with_line("Changes from March")
        .with_line("1. New hotline 555-444-3333")
        .with_line("2. Longer opening hours")
        .build_bytes()?;

    let output = process_presentable(&source, "[hidden]")?;
    let text = extract_text(&output)?;

    assert!(text.contains("• New hotline [hidden]"));
    assert!(text.contains("• Longer opening hours"));
    Ok(())
}

#[test]
fn test_rebuild_with_truetype_font_extracts_back() -> Result<()> {
    let font = unicode_font()?;
    let output = process_with_font(Mode::Rebuild, &statement_bytes()?, "Скрыто", &font)?;

    let type0 = fonts_with_subtype(&output, "Type0")?;
    assert_eq!(type0.len(), 1);
    assert_eq!(type0[0].get(b"Encoding")?.as_name_str()?, "Identity-H");
    assert!(type0[0].has(b"ToUnicode"));

    let text = squashed_text(&output)?;
    assert_eq!(text.matches("Скрыто").count(), 3);
    assert!(text.contains("Supportline"));
    Ok(())
}

#[test]
fn test_presentable_with_truetype_font() -> Result<()> {
    let font = unicode_font()?;
    let output = process_with_font(Mode::Presentable, &statement_bytes()?, "№ скрыт", &font)?;
    assert!(squashed_text(&output)?.contains("№скрыт"));
    Ok(())
}
