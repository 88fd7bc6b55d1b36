//! PDF Core - Low-level PDF manipulation
//!
//! This crate provides functionality for:
//! - Loading PDF templates and serializing the result
//! - Drawing text in the standard Helvetica font on overlay layers
//! - Drawing images (JPEG, PNG) on overlay layers
//! - Compositing an overlay on top of an existing template page
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, Overlay, PdfDocument, StandardFont};
//!
//! let mut doc = PdfDocument::open_from_bytes(&std::fs::read("template.pdf")?)?;
//! let mut overlay = Overlay::a4();
//! overlay.set_font(StandardFont::Helvetica, 10.0);
//! overlay.draw_text("Hello, World!", 100.0, 700.0, Align::Left);
//! doc.stamp(1, overlay)?;
//! std::fs::write("output.pdf", doc.to_bytes()?)?;
//! ```

mod document;
mod font;
mod image;
mod overlay;
mod text;

pub use document::PdfDocument;
pub use font::{encode_win_ansi, StandardFont};
pub use image::{detect_format, ImageFormat, ImageXObject};
pub use overlay::{Overlay, A4_HEIGHT, A4_WIDTH};
pub use text::{generate_text_operators, literal_string, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Right,
}
