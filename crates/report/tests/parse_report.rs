//! Integration tests for report parsing
//!
//! The fixtures mimic `pdftotext -layout` output: indented, column-aligned text.

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tob_report::{parse_report, ParseError, TaxLine, TaxRecord};

const JANUARY_REPORT: &str = "\
                         Tax report for January 2023

   Account holder                                   A. Test

   Tax on stock-exchange transactions in ETFs (0.12%)

   Date         Product                      Qty      Amount          Tax
   05/01/2023   VANGUARD FTSE ALL-WORLD        1    40.00 EUR     0.05 EUR
   12/01/2023   ISHARES CORE MSCI WORLD        2    80.00 EUR     0.10 EUR
   Total                                       3   120.00 EUR     1.44 EUR
";

const FULL_REPORT: &str = "\
Tax report for March 2024

   Tax on stock-exchange transactions in ETFs (0.12%)
   Total        2     1000.50 EUR     1.20 EUR

   Tax on stock-exchange transactions in shares (0.35%)
   03/03/2024   SOME COMPANY NV     10    2000.00 EUR    7.00 EUR
   Total       10     2000.00 EUR     7.00 EUR
";

#[test]
fn test_january_scenario() {
    let record = parse_report(JANUARY_REPORT).unwrap();

    let mut expected = TaxRecord::new(1, 2023);
    expected.etf = Some(TaxLine::new(dec!(120.00), dec!(1.44)));
    assert_eq!(record, expected);
    assert_eq!(record.share, None);
}

#[test]
fn test_both_sections() {
    let record = parse_report(FULL_REPORT).unwrap();

    assert_eq!(record.month, 3);
    assert_eq!(record.year, 2024);
    assert_eq!(record.etf, Some(TaxLine::new(dec!(1000.50), dec!(1.20))));
    assert_eq!(record.share, Some(TaxLine::new(dec!(2000.00), dec!(7.00))));
    assert_eq!(record.total_tax(), dec!(8.20));
}

#[test]
fn test_no_sections() {
    let record = parse_report("Tax report for July 2022\nNothing to declare\n").unwrap();
    assert_eq!(record, TaxRecord::new(7, 2022));
    assert_eq!(record.total_tax(), dec!(0));
}

#[test]
fn test_etf_total_not_taken_from_share_section() {
    let text = "\
Tax report for June 2023
Tax on stock-exchange transactions in ETFs (0.12%)
No transactions
Tax on stock-exchange transactions in shares (0.35%)
Total 1 100.00 EUR 0.35 EUR
";
    let record = parse_report(text).unwrap();
    assert_eq!(record.etf, None);
    assert_eq!(record.share, Some(TaxLine::new(dec!(100.00), dec!(0.35))));
}

#[test]
fn test_unknown_month() {
    let err = parse_report("Tax report for Juin 2023\n").unwrap_err();
    assert_eq!(err, ParseError::UnknownMonth("Juin".to_string()));
}

#[test]
fn test_invalid_year() {
    let err = parse_report("Tax report for June twenty\n").unwrap_err();
    assert_eq!(err, ParseError::InvalidYear("twenty".to_string()));
}

#[test]
fn test_empty_input() {
    assert_eq!(parse_report(""), Err(ParseError::MissingDateHeader));
    assert_eq!(parse_report("\n   \n"), Err(ParseError::MissingDateHeader));
}
