//! Integration tests for writing payment QR codes

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tob_payment::{write_payment_code, PaymentOutcome, MAX_REMITTANCE_LEN};
use tob_report::{PersonalInfo, TaxLine, TaxRecord};

fn record() -> TaxRecord {
    let mut record = TaxRecord::new(1, 2023);
    record.etf = Some(TaxLine::new(dec!(120.00), dec!(1.44)));
    record
}

fn info(address: Vec<String>) -> PersonalInfo {
    PersonalInfo::new(
        "12.34.56-789.01",
        "A. Test",
        address,
        NaiveDate::from_ymd_opt(2023, 2, 5).unwrap(),
        "signature.png",
    )
}

#[test]
fn test_write_payment_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tob_2023_01.png");

    let outcome = write_payment_code(
        &record(),
        &info(vec!["Street 1".into(), "1000 Brussels".into()]),
        &path,
    )
    .unwrap();

    assert_eq!(outcome, PaymentOutcome::Written(path.clone()));
    let png = std::fs::read(&path).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}

#[test]
fn test_long_remittance_skipped_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tob_2023_01.png");

    let address = vec!["x".repeat(MAX_REMITTANCE_LEN)];
    let outcome = write_payment_code(&record(), &info(address), &path).unwrap();

    match outcome {
        PaymentOutcome::Skipped { length } => assert!(length > MAX_REMITTANCE_LEN),
        other => panic!("expected a skipped payment code, got {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn test_unwritable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("qr.png");

    let result = write_payment_code(&record(), &info(vec!["Street 1".into()]), &path);
    assert!(matches!(result, Err(tob_payment::PaymentError::Io { .. })));
}
