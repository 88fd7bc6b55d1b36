//! TOB Payment - EPC QR codes for paying the declared tax
//!
//! This crate provides:
//! - The EPC ("SEPA credit transfer") payload for the TOB account
//! - Remittance text assembly and length validation
//! - QR code rendering to PNG
//!
//! # Example
//!
//! ```ignore
//! use tob_payment::{write_payment_code, PaymentOutcome};
//!
//! match write_payment_code(&record, &info, "tob_2023_01.png")? {
//!     PaymentOutcome::Written(path) => println!("QR code: {}", path.display()),
//!     PaymentOutcome::Skipped { length } => println!("remittance too long ({length})"),
//! }
//! ```

pub mod epc;
mod qr;

pub use epc::{
    normalize_national_number, remittance_text, PaymentPayload, CREDITOR_BIC, CREDITOR_IBAN,
    CREDITOR_NAME, MAX_REMITTANCE_LEN,
};
pub use qr::{render_qr_png, QR_MIN_SIZE};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tob_report::{PersonalInfo, TaxRecord};

/// Errors that can occur while building a payment code
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Remittance text is {length} characters, the limit is {MAX_REMITTANCE_LEN}")]
    RemittanceTooLong { length: usize },

    #[error("QR encoding error: {0}")]
    Encode(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for payment operations
pub type Result<T> = std::result::Result<T, PaymentError>;

/// What happened to the payment code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// QR code written to this path
    Written(PathBuf),
    /// Remittance text too long, nothing written
    Skipped { length: usize },
}

/// Build the payment QR code as PNG bytes
pub fn build(record: &TaxRecord, info: &PersonalInfo) -> Result<Vec<u8>> {
    let payload = PaymentPayload::from_record(record, info)?;
    log::debug!("EPC payload: {:?}", payload.to_epc_string());
    render_qr_png(&payload.to_epc_string())
}

/// Build the payment QR code and write it to `path`
///
/// An over-long remittance text is not an error: it is logged and reported
/// as [`PaymentOutcome::Skipped`] without creating the file.
pub fn write_payment_code<P: AsRef<Path>>(
    record: &TaxRecord,
    info: &PersonalInfo,
    path: P,
) -> Result<PaymentOutcome> {
    let path = path.as_ref();

    let png = match build(record, info) {
        Ok(png) => png,
        Err(PaymentError::RemittanceTooLong { length }) => {
            log::warn!(
                "Remittance text is {length} characters (limit {MAX_REMITTANCE_LEN}), \
                 skipping payment QR code"
            );
            return Ok(PaymentOutcome::Skipped { length });
        }
        Err(e) => return Err(e),
    };

    std::fs::write(path, png).map_err(|source| PaymentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Wrote payment QR code to {}", path.display());

    Ok(PaymentOutcome::Written(path.to_path_buf()))
}
