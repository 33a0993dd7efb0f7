//! Shared helpers for the integration tests.
//!
//! - [`fixtures`]: builds source documents with text at known positions
//! - [`pdf_helpers`]: inspects produced documents

pub mod fixtures;
pub mod pdf_helpers;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use pdf_helpers::*;
