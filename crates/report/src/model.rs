//! Tax data model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// English month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Look up a month number (1-12) by its full English name (case-exact)
pub fn month_from_name(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}

/// Full English name of a month number (1-12)
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get((month as usize).checked_sub(1)?).copied()
}

/// Taxable basis and tax due for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxLine {
    pub amount: Decimal,
    pub tax: Decimal,
}

impl TaxLine {
    pub fn new(amount: Decimal, tax: Decimal) -> Self {
        Self { amount, tax }
    }
}

/// Header of the ETF transaction tax section
pub const ETF_SECTION_HEADER: &str = "Tax on stock-exchange transactions in ETFs (0.12%)";

/// Header of the share transaction tax section
pub const SHARE_SECTION_HEADER: &str = "Tax on stock-exchange transactions in shares (0.35%)";

/// Transaction category reported on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Exchange-traded funds (0.12%)
    Etf,
    /// Shares (0.35%)
    Share,
}

impl Category {
    /// All categories in form order (top to bottom)
    pub const ALL: [Category; 2] = [Category::Etf, Category::Share];

    /// Section header introducing this category in the report
    pub fn section_header(self) -> &'static str {
        match self {
            Category::Etf => ETF_SECTION_HEADER,
            Category::Share => SHARE_SECTION_HEADER,
        }
    }
}

/// Tax figures extracted from one monthly report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxRecord {
    /// Month number (1-12)
    pub month: u32,
    pub year: i32,
    pub etf: Option<TaxLine>,
    pub share: Option<TaxLine>,
}

impl TaxRecord {
    /// Create a record with no taxed categories
    pub fn new(month: u32, year: i32) -> Self {
        Self {
            month,
            year,
            etf: None,
            share: None,
        }
    }

    /// Get the line for a category, if present
    pub fn line(&self, category: Category) -> Option<&TaxLine> {
        match category {
            Category::Etf => self.etf.as_ref(),
            Category::Share => self.share.as_ref(),
        }
    }

    /// Present categories in form order
    pub fn lines(&self) -> impl Iterator<Item = (Category, &TaxLine)> {
        Category::ALL
            .into_iter()
            .filter_map(move |c| self.line(c).map(|line| (c, line)))
    }

    /// Sum of tax over present categories (zero when none)
    pub fn total_tax(&self) -> Decimal {
        self.lines().map(|(_, line)| line.tax).sum()
    }

    /// Full English month name ("January")
    pub fn month_name(&self) -> &'static str {
        month_name(self.month).unwrap_or("")
    }
}

/// Personal data printed on the form and used in the payment reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalInfo {
    pub national_number: String,
    pub full_name: String,
    /// Address lines, top to bottom
    pub address: Vec<String>,
    /// Place of signature
    pub location: String,
    pub sign_date: NaiveDate,
    /// Path to a square signature image (JPEG or PNG)
    pub signature: PathBuf,
    pub output: Option<PathBuf>,
}

impl PersonalInfo {
    /// Create personal info; the location defaults to the city of the last address line
    pub fn new(
        national_number: impl Into<String>,
        full_name: impl Into<String>,
        address: Vec<String>,
        sign_date: NaiveDate,
        signature: impl Into<PathBuf>,
    ) -> Self {
        let location = location_from_address(&address);
        Self {
            national_number: national_number.into(),
            full_name: full_name.into(),
            address,
            location,
            sign_date,
            signature: signature.into(),
            output: None,
        }
    }

    /// Override the place of signature
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the output document path
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// Last whitespace-separated token of the last address line
///
/// `["Street 1", "1000 Brussels"]` gives `"Brussels"`.
pub fn location_from_address(address: &[String]) -> String {
    address
        .last()
        .and_then(|line| line.split_whitespace().last())
        .unwrap_or_default()
        .to_string()
}
