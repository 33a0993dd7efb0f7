//! Inspection helpers for produced documents.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};

pub fn load(bytes: &[u8]) -> Result<Document> {
    Document::load_mem(bytes).map_err(|e| anyhow!("not a loadable PDF: {}", e))
}

pub fn page_count(bytes: &[u8]) -> Result<usize> {
    Ok(load(bytes)?.get_pages().len())
}

/// Decoded content operators of a 1-based page, all streams concatenated.
pub fn page_operators(bytes: &[u8], page_number: u32) -> Result<Vec<String>> {
    let doc = load(bytes)?;
    let page_id = *doc
        .get_pages()
        .get(&page_number)
        .ok_or_else(|| anyhow!("no page {}", page_number))?;
    let content = doc.get_page_content(page_id)?;
    Ok(Content::decode(&content)?
        .operations
        .into_iter()
        .map(|op| op.operator)
        .collect())
}

/// Operands of every `re` that is filled straight away, in drawing order,
/// as `[x, y, width, height]`.
pub fn filled_rectangles(bytes: &[u8], page_number: u32) -> Result<Vec<[f64; 4]>> {
    let doc = load(bytes)?;
    let page_id = *doc
        .get_pages()
        .get(&page_number)
        .ok_or_else(|| anyhow!("no page {}", page_number))?;
    let operations = Content::decode(&doc.get_page_content(page_id)?)?.operations;

    let mut rects = Vec::new();
    for pair in operations.windows(2) {
        if pair[0].operator == "re" && pair[1].operator == "f" {
            let values: Vec<f64> = pair[0]
                .operands
                .iter()
                .map(|o| o.as_float().map(f64::from))
                .collect::<std::result::Result<_, _>>()?;
            if let [x, y, w, h] = values[..] {
                rects.push([x, y, w, h]);
            }
        }
    }
    Ok(rects)
}

/// Font dictionaries of a document with the given subtype.
pub fn fonts_with_subtype(bytes: &[u8], subtype: &str) -> Result<Vec<Dictionary>> {
    let doc = load(bytes)?;
    Ok(doc
        .objects
        .values()
        .filter_map(|obj| match obj {
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        })
        .filter(|dict| {
            dict.get(b"Subtype")
                .and_then(Object::as_name_str)
                .map(|name| name == subtype)
                .unwrap_or(false)
        })
        .cloned()
        .collect())
}

/// Follows a reference, or returns the object itself.
pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

pub fn count_operator(bytes: &[u8], page_number: u32, operator: &str) -> Result<usize> {
    Ok(page_operators(bytes, page_number)?
        .iter()
        .filter(|op| op.as_str() == operator)
        .count())
}

/// Number of content stream references on a page.
pub fn content_stream_count(bytes: &[u8], page_number: u32) -> Result<usize> {
    let doc = load(bytes)?;
    let page_id = *doc
        .get_pages()
        .get(&page_number)
        .ok_or_else(|| anyhow!("no page {}", page_number))?;
    Ok(match doc.get_dictionary(page_id)?.get(b"Contents")? {
        Object::Array(items) => items.len(),
        _ => 1,
    })
}

pub fn extract_text(bytes: &[u8]) -> Result<String> {
    phone_redactor::pdf::extract_text(bytes).map_err(|e| anyhow!("extraction failed: {}", e))
}

/// Text with all whitespace removed, for checks that must not depend on
/// how the extractor spaces runs.
pub fn squashed_text(bytes: &[u8]) -> Result<String> {
    Ok(extract_text(bytes)?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect())
}
