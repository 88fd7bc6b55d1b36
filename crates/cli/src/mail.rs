//! Mail client launch
//!
//! The declaration is sent by e-mail; this only prefills a message in the
//! default mail client; the user still attaches the files and sends it.

use std::path::Path;
use tob_report::TaxRecord;

/// Mailbox receiving TOB declarations
pub const RECIPIENT: &str = "tob.dib@minfin.fed.be";

/// Subject line, e.g. `TOB January 2023`
pub fn subject(record: &TaxRecord) -> String {
    format!("TOB {} {}", record.month_name(), record.year)
}

/// Message body listing the files to attach
pub fn body(record: &TaxRecord, attachments: &[&Path]) -> String {
    let mut body = format!(
        "Dear Sir or Madam,\n\nPlease find attached my TOB declaration for {} {}.\n",
        record.month_name(),
        record.year
    );
    if !attachments.is_empty() {
        body.push_str("\nAttachments:\n");
        for path in attachments {
            let name = path.file_name().unwrap_or(path.as_os_str());
            body.push_str(&format!("- {}\n", name.to_string_lossy()));
        }
    }
    body.push_str("\nKind regards\n");
    body
}

/// `mailto:` URI with subject and body
pub fn mailto_uri(record: &TaxRecord, attachments: &[&Path]) -> String {
    format!(
        "mailto:{RECIPIENT}?subject={}&body={}",
        percent_encode(&subject(record)),
        percent_encode(&body(record, attachments))
    )
}

/// Open the default mail client; failures are only logged
pub fn open_mail(record: &TaxRecord, attachments: &[&Path]) {
    let uri = mailto_uri(record, attachments);
    match opener::open(&uri) {
        Ok(()) => log::info!("Opened mail client for {RECIPIENT}"),
        Err(e) => log::warn!("Could not open mail client: {e}"),
    }
}

/// Percent-encode everything except RFC 3986 unreserved characters
fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_subject() {
        assert_eq!(subject(&TaxRecord::new(1, 2023)), "TOB January 2023");
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("TOB January 2023"), "TOB%20January%202023");
        assert_eq!(percent_encode("a&b=c\n"), "a%26b%3Dc%0A");
        assert_eq!(percent_encode("é"), "%C3%A9");
    }

    #[test]
    fn test_body_lists_attachments() {
        let body = body(
            &TaxRecord::new(3, 2024),
            &[
                Path::new("out/tob_2024_03.pdf"),
                Path::new("out/tob_2024_03.png"),
            ],
        );
        assert!(body.contains("for March 2024"));
        assert!(body.contains("- tob_2024_03.pdf\n- tob_2024_03.png\n"));
    }

    #[test]
    fn test_mailto_uri() {
        let uri = mailto_uri(&TaxRecord::new(1, 2023), &[]);
        assert!(uri.starts_with("mailto:tob.dib@minfin.fed.be?subject=TOB%20January%202023&body="));
        assert!(!uri.contains(' '));
        assert!(!uri.contains('\n'));
    }
}
