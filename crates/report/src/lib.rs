//! TOB Report - Brokerage tax report parsing
//!
//! This crate provides:
//! - The tax data model shared by the form and payment crates
//! - A parser turning layout-preserved report text into a [`TaxRecord`]
//!
//! # Example
//!
//! ```ignore
//! use tob_report::parse_report;
//!
//! let text = std::fs::read_to_string("report.txt")?;
//! let record = parse_report(&text)?;
//! println!("{} {}: {}", record.month_name(), record.year, record.total_tax());
//! ```

mod model;
pub mod parser;

pub use model::{
    month_name, Category, PersonalInfo, TaxLine, TaxRecord, ETF_SECTION_HEADER, MONTH_NAMES,
    SHARE_SECTION_HEADER,
};
pub use parser::parse_report;

use thiserror::Error;

/// Errors that can occur while parsing a tax report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Report has no date header")]
    MissingDateHeader,

    #[error("Unrecognized date header: {0:?}")]
    UnrecognizedDateHeader(String),

    #[error("Unknown month name: {0:?}")]
    UnknownMonth(String),

    #[error("Invalid year: {0:?}")]
    InvalidYear(String),
}

/// Result type for report parsing
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ParseError::UnknownMonth("Janvier".to_string()).to_string(),
            "Unknown month name: \"Janvier\""
        );
        assert_eq!(
            ParseError::MissingDateHeader.to_string(),
            "Report has no date header"
        );
    }
}
