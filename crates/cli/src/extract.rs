//! Text extraction from the broker's PDF report

use std::path::Path;
use std::process::Command;
use thiserror::Error;

/// Extraction tool from poppler-utils
pub const PDFTOTEXT: &str = "pdftotext";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to run {program} (is poppler-utils installed?): {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed (exit {status}): {stderr}")]
    Failed {
        program: String,
        status: i32,
        stderr: String,
    },

    #[error("Extracted text is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Run `pdftotext -layout -enc UTF-8 <path> -` and capture stdout
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    extract_text_with(PDFTOTEXT, path)
}

/// Same as [`extract_text`] with another executable
pub fn extract_text_with(program: &str, path: &Path) -> Result<String, ExtractError> {
    log::debug!("Running {program} on {}", path.display());

    let output = Command::new(program)
        .args(["-layout", "-enc", "UTF-8"])
        .arg(path)
        .arg("-")
        .output()
        .map_err(|source| ExtractError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ExtractError::Failed {
            program: program.to_string(),
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8(output.stdout)?)
}
