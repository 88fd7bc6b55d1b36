//! TOB CLI - from broker report to filled declaration and payment code
//!
//! The pipeline extracts the report text, parses it, fills the declaration
//! template, writes the payment QR code next to it and finally opens the
//! mail client.

pub mod config;
pub mod extract;
pub mod mail;

pub use config::{Cli, Config, ConfigError, FileConfig};
pub use extract::{extract_text, ExtractError};

use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use tob_form::FormRenderer;
use tob_payment::{write_payment_code, PaymentOutcome};
use tob_report::{parse_report, TaxRecord};

/// Files produced by one run
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub record: TaxRecord,
    pub document: PathBuf,
    pub payment: PaymentOutcome,
}

impl Artifacts {
    /// Written files, document first
    pub fn files(&self) -> Vec<&Path> {
        let mut files = vec![self.document.as_path()];
        if let PaymentOutcome::Written(path) = &self.payment {
            files.push(path.as_path());
        }
        files
    }
}

/// Run the whole pipeline for a resolved configuration
pub fn run(config: &Config) -> anyhow::Result<Artifacts> {
    let text = extract_text(&config.input)
        .with_context(|| format!("Failed to extract text from {}", config.input.display()))?;

    let artifacts = process_report(&text, config)?;

    if config.no_mail {
        log::debug!("Mail client disabled");
    } else {
        mail::open_mail(&artifacts.record, &artifacts.files());
    }

    Ok(artifacts)
}

/// Parse extracted report text and write the declaration and payment code
pub fn process_report(text: &str, config: &Config) -> anyhow::Result<Artifacts> {
    let record = parse_report(text).context("Failed to parse tax report")?;
    log::info!(
        "Report for {} {}: ETF {}, shares {}, total tax {}",
        record.month_name(),
        record.year,
        describe(record.etf.is_some()),
        describe(record.share.is_some()),
        record.total_tax()
    );

    let document = config.output_path(&record);
    let pdf = FormRenderer::new()
        .render(&config.template, &record, &config.personal)
        .context("Failed to fill the declaration")?;
    write_atomic(&document, &pdf)
        .with_context(|| format!("Failed to write {}", document.display()))?;
    log::info!("Wrote declaration to {}", document.display());

    let payment = write_payment_code(&record, &config.personal, document.with_extension("png"))
        .context("Failed to write payment QR code")?;

    Ok(Artifacts {
        record,
        document,
        payment,
    })
}

fn describe(present: bool) -> &'static str {
    if present {
        "present"
    } else {
        "absent"
    }
}

/// Write through a temporary file in the destination directory, then rename
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_atomic(&dir.path().join("nope").join("out.pdf"), b"x").is_err());
    }

    #[test]
    fn test_artifact_files() {
        let artifacts = Artifacts {
            record: TaxRecord::new(1, 2023),
            document: "tob_2023_01.pdf".into(),
            payment: PaymentOutcome::Skipped { length: 150 },
        };
        assert_eq!(artifacts.files(), vec![Path::new("tob_2023_01.pdf")]);
    }
}
