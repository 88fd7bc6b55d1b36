//! EPC credit transfer payload
//!
//! Serialized per the EPC069-12 guideline (version 002, UTF-8), the format
//! read by Belgian banking apps when scanning a payment QR code.

use crate::{PaymentError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use tob_report::{PersonalInfo, TaxRecord};

/// Beneficiary of TOB payments
pub const CREDITOR_NAME: &str = "FOD Financien - TOB";
/// Account of the TOB collection office
pub const CREDITOR_IBAN: &str = "BE39679000019219";
pub const CREDITOR_BIC: &str = "PCHQBEBB";

/// Maximum length of unstructured remittance information (characters)
pub const MAX_REMITTANCE_LEN: usize = 140;

const SERVICE_TAG: &str = "BCD";
const VERSION: &str = "002";
/// UTF-8
const CHARACTER_SET: &str = "1";
const IDENTIFICATION: &str = "SCT";

/// A validated payment instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentPayload {
    pub creditor_name: &'static str,
    pub iban: &'static str,
    pub bic: &'static str,
    pub amount: Decimal,
    pub remittance_text: String,
}

impl PaymentPayload {
    /// Build the payload for a month's tax
    ///
    /// Fails with [`PaymentError::RemittanceTooLong`] when the remittance
    /// text exceeds [`MAX_REMITTANCE_LEN`] characters.
    pub fn from_record(record: &TaxRecord, info: &PersonalInfo) -> Result<Self> {
        let remittance_text = remittance_text(record, info);
        let length = remittance_text.chars().count();
        if length > MAX_REMITTANCE_LEN {
            return Err(PaymentError::RemittanceTooLong { length });
        }

        Ok(Self {
            creditor_name: CREDITOR_NAME,
            iban: CREDITOR_IBAN,
            bic: CREDITOR_BIC,
            amount: record.total_tax(),
            remittance_text,
        })
    }

    /// Amount field, e.g. `EUR1.44`; empty for a zero amount
    fn amount_field(&self) -> String {
        if self.amount.is_zero() {
            return String::new();
        }
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("EUR{rounded:.2}")
    }

    /// Line-based EPC representation encoded in the QR code
    pub fn to_epc_string(&self) -> String {
        [
            SERVICE_TAG,
            VERSION,
            CHARACTER_SET,
            IDENTIFICATION,
            self.bic,
            self.creditor_name,
            self.iban,
            self.amount_field().as_str(),
            "", // purpose
            "", // structured reference
            self.remittance_text.as_str(),
        ]
        .join("\n")
    }
}

/// Remittance text: national number, name, address and month
///
/// `"123456789 01 A. Test Street 1, 1000 Brussels january"`
pub fn remittance_text(record: &TaxRecord, info: &PersonalInfo) -> String {
    [
        normalize_national_number(&info.national_number),
        info.full_name.clone(),
        info.address.join(", "),
        record.month_name().to_lowercase(),
    ]
    .join(" ")
}

/// Strip separators from a national number, keeping the check digits apart
///
/// `12.34.56-789.01` becomes `123456789 01`.
pub fn normalize_national_number(number: &str) -> String {
    match number.rsplit_once('.') {
        Some((head, check)) => format!("{} {}", strip_separators(head), strip_separators(check)),
        None => strip_separators(number),
    }
}

fn strip_separators(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '.' | '-')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tob_report::TaxLine;

    fn info(name: &str) -> PersonalInfo {
        PersonalInfo::new(
            "12.34.56-789.01",
            name,
            vec!["Street 1".to_string(), "1000 Brussels".to_string()],
            NaiveDate::from_ymd_opt(2023, 2, 5).unwrap(),
            "signature.png",
        )
    }

    fn january() -> TaxRecord {
        let mut record = TaxRecord::new(1, 2023);
        record.etf = Some(TaxLine::new(dec!(120.00), dec!(1.44)));
        record
    }

    #[test]
    fn test_normalize_national_number() {
        assert_eq!(normalize_national_number("12.34.56-789.01"), "123456789 01");
        assert_eq!(normalize_national_number("85073003328"), "85073003328");
        assert_eq!(normalize_national_number("850730-033-28"), "85073003328");
    }

    #[test]
    fn test_remittance_text() {
        assert_eq!(
            remittance_text(&january(), &info("A. Test")),
            "123456789 01 A. Test Street 1, 1000 Brussels january"
        );
    }

    #[test]
    fn test_remittance_length_boundary() {
        // "123456789 01 " + name + " Street 1, 1000 Brussels january"
        let fixed = remittance_text(&january(), &info("")).chars().count();

        let accepted = info(&"A".repeat(MAX_REMITTANCE_LEN - fixed));
        let payload = PaymentPayload::from_record(&january(), &accepted).unwrap();
        assert_eq!(payload.remittance_text.chars().count(), 140);

        let rejected = info(&"A".repeat(MAX_REMITTANCE_LEN - fixed + 1));
        assert!(matches!(
            PaymentPayload::from_record(&january(), &rejected),
            Err(PaymentError::RemittanceTooLong { length: 141 })
        ));
    }

    #[test]
    fn test_length_counts_characters() {
        let fixed = remittance_text(&january(), &info("")).chars().count();
        let name = "é".repeat(MAX_REMITTANCE_LEN - fixed);
        assert!(PaymentPayload::from_record(&january(), &info(&name)).is_ok());
    }

    #[test]
    fn test_epc_string() {
        let mut record = january();
        record.share = Some(TaxLine::new(dec!(2000), dec!(7)));
        let payload = PaymentPayload::from_record(&record, &info("A. Test")).unwrap();

        assert_eq!(payload.amount, dec!(8.44));
        assert_eq!(
            payload.to_epc_string(),
            "BCD\n002\n1\nSCT\nPCHQBEBB\nFOD Financien - TOB\nBE39679000019219\nEUR8.44\n\n\n\
             123456789 01 A. Test Street 1, 1000 Brussels january"
        );
    }

    #[test]
    fn test_zero_amount_left_empty() {
        let record = TaxRecord::new(6, 2024);
        let payload = PaymentPayload::from_record(&record, &info("A. Test")).unwrap();
        assert_eq!(payload.amount, Decimal::ZERO);

        let epc = payload.to_epc_string();
        assert!(epc.contains("BE39679000019219\n\n\n\n"));
        assert!(epc.ends_with("june"));
    }
}
