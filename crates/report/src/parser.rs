//! Report text parsing
//!
//! The input is the report rendered to text with its column layout preserved.
//! Every line is trimmed before matching, so alignment whitespace does not matter.

use crate::model::{
    month_from_name, Category, TaxLine, TaxRecord, ETF_SECTION_HEADER, SHARE_SECTION_HEADER,
};
use crate::{ParseError, Result};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

const SECTION_HEADERS: [&str; 2] = [ETF_SECTION_HEADER, SHARE_SECTION_HEADER];

/// `Total <count> <basis> EUR <tax> EUR`, ASCII digits only
static TOTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Total\s+[0-9]+\s+([0-9]+(?:\.[0-9]+)?)\s+EUR\s+([0-9]+(?:\.[0-9]+)?)\s+EUR\b")
        .expect("valid total regex")
});

/// Parse report text into a tax record
///
/// Fails only when the date header cannot be read. Sections that are missing,
/// or that have no total line, leave the category absent.
pub fn parse_report(text: &str) -> Result<TaxRecord> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let header = lines
        .iter()
        .find(|line| !line.is_empty())
        .ok_or(ParseError::MissingDateHeader)?;
    let (month, year) = parse_date_header(header)?;

    let mut record = TaxRecord::new(month, year);
    record.etf = extract_taxed_total(&lines, Category::Etf.section_header());
    record.share = extract_taxed_total(&lines, Category::Share.section_header());

    log::debug!(
        "Parsed report for {}/{}: etf={:?} share={:?}",
        record.month,
        record.year,
        record.etf,
        record.share
    );

    Ok(record)
}

/// Read the month and year from the last two tokens of the header line
///
/// `"Tax report for January 2023"` gives `(1, 2023)`.
pub fn parse_date_header(line: &str) -> Result<(u32, i32)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [.., month_token, year_token] = tokens.as_slice() else {
        return Err(ParseError::UnrecognizedDateHeader(line.to_string()));
    };

    let month = month_from_name(month_token)
        .ok_or_else(|| ParseError::UnknownMonth(month_token.to_string()))?;

    if year_token.len() != 4 || !year_token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidYear(year_token.to_string()));
    }
    let year = year_token
        .parse()
        .map_err(|_| ParseError::InvalidYear(year_token.to_string()))?;

    Ok((month, year))
}

/// Find the taxed total of the section introduced by `header`
///
/// Scans from the line after the header up to the next known section header
/// (or the end of input) for the first total line. Returns `None` when the
/// header is absent or the section holds no total.
pub fn extract_taxed_total(lines: &[&str], header: &str) -> Option<TaxLine> {
    let Some(start) = lines.iter().position(|line| line.trim() == header) else {
        log::debug!("Section not found: {header}");
        return None;
    };

    let section = lines[start + 1..]
        .iter()
        .map(|line| line.trim())
        .take_while(|line| !SECTION_HEADERS.iter().any(|h| h == line));

    for line in section {
        if let Some(total) = parse_total_line(line) {
            return Some(total);
        }
    }

    log::debug!("Section has no total line: {header}");
    None
}

/// Parse a `Total <count> <basis> EUR <tax> EUR` line
pub fn parse_total_line(line: &str) -> Option<TaxLine> {
    let caps = TOTAL_RE.captures(line)?;
    let amount = Decimal::from_str(caps.get(1)?.as_str()).ok()?;
    let tax = Decimal::from_str(caps.get(2)?.as_str()).ok()?;
    Some(TaxLine::new(amount, tax))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_date_header() {
        assert_eq!(
            parse_date_header("Tax report for January 2023").unwrap(),
            (1, 2023)
        );
        assert_eq!(parse_date_header("December 1999").unwrap(), (12, 1999));
    }

    #[test]
    fn test_parse_date_header_all_months() {
        for (i, name) in crate::MONTH_NAMES.iter().enumerate() {
            let line = format!("Report {name} 2024");
            assert_eq!(parse_date_header(&line).unwrap(), (i as u32 + 1, 2024));
        }
    }

    #[test]
    fn test_parse_date_header_errors() {
        assert_eq!(
            parse_date_header("2023"),
            Err(ParseError::UnrecognizedDateHeader("2023".to_string()))
        );
        assert_eq!(
            parse_date_header("Tax report for january 2023"),
            Err(ParseError::UnknownMonth("january".to_string()))
        );
        assert_eq!(
            parse_date_header("Tax report for January 20x3"),
            Err(ParseError::InvalidYear("20x3".to_string()))
        );
        assert_eq!(
            parse_date_header("Tax report for January 23"),
            Err(ParseError::InvalidYear("23".to_string()))
        );
    }

    #[test]
    fn test_parse_total_line() {
        assert_eq!(
            parse_total_line("Total 3 120.00 EUR 1.44 EUR"),
            Some(TaxLine::new(dec!(120.00), dec!(1.44)))
        );
        assert_eq!(
            parse_total_line("Total     12     5000     EUR     17.5 EUR"),
            Some(TaxLine::new(dec!(5000), dec!(17.5)))
        );
    }

    #[test]
    fn test_parse_total_line_rejects() {
        assert_eq!(parse_total_line("Total 120.00 EUR 1.44 EUR"), None);
        assert_eq!(parse_total_line("Total 3 1,120.00 EUR 1.44 EUR"), None);
        assert_eq!(parse_total_line("Total 3 120.00 USD 1.44 USD"), None);
        assert_eq!(parse_total_line("Subtotal 3 120.00 EUR 1.44 EUR"), None);
        assert_eq!(parse_total_line("Total 3 120.00 EUR 1.44 EURO"), None);
        assert_eq!(parse_total_line("Total 3 120.00 EUR 1.44 EURX"), None);
        assert_eq!(parse_total_line(""), None);
    }

    #[test]
    fn test_parse_total_line_ascii_digits_only() {
        assert_eq!(parse_total_line("Total \u{663} 120.00 EUR 1.44 EUR"), None);
        assert_eq!(parse_total_line("Total 3 \u{661}20.00 EUR 1.44 EUR"), None);
        assert_eq!(parse_total_line("Total 3 120.00 EUR \u{661}.44 EUR"), None);
        assert_eq!(
            parse_total_line("Total 3 120.00 EUR 1.44 EUR (0.12%)"),
            Some(TaxLine::new(dec!(120.00), dec!(1.44)))
        );
    }

    #[test]
    fn test_extract_missing_header() {
        let lines = ["Tax report for January 2023", "Total 3 120.00 EUR 1.44 EUR"];
        assert_eq!(extract_taxed_total(&lines, ETF_SECTION_HEADER), None);
    }

    #[test]
    fn test_extract_header_without_total() {
        let lines = ["Tax report for January 2023", ETF_SECTION_HEADER, "nothing"];
        assert_eq!(extract_taxed_total(&lines, ETF_SECTION_HEADER), None);
    }

    #[test]
    fn test_extract_stops_at_next_section() {
        let lines = [
            ETF_SECTION_HEADER,
            "Date  Product  Amount",
            SHARE_SECTION_HEADER,
            "Total 1 500.00 EUR 1.75 EUR",
        ];
        assert_eq!(extract_taxed_total(&lines, ETF_SECTION_HEADER), None);
        assert_eq!(
            extract_taxed_total(&lines, SHARE_SECTION_HEADER),
            Some(TaxLine::new(dec!(500.00), dec!(1.75)))
        );
    }
}
