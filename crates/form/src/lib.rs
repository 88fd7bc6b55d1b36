//! TOB Form - filling the stock-exchange tax declaration
//!
//! This crate provides:
//! - The layout table with every coordinate used on the declaration template
//! - Render plans (one overlay layer per template page that needs one)
//! - Compositing of those layers onto the template document
//!
//! # Example
//!
//! ```ignore
//! use tob_form::FormRenderer;
//!
//! let record = tob_report::parse_report(&text)?;
//! let pdf_bytes = FormRenderer::new().render("tob-template.pdf", &record, &info)?;
//! std::fs::write("tob_2023_01.pdf", pdf_bytes)?;
//! ```

pub mod layout;
mod renderer;

pub use layout::{Layout, Point, TOB_LAYOUT};
pub use renderer::{format_amount, format_place_and_date, FormRenderer, RenderPlan};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while filling the form
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template has {page_count} pages, an overlay targets page index {index}")]
    MissingPage { index: usize, page_count: usize },

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),
}

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;
