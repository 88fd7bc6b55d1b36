//! Standard (non-embedded) PDF fonts
//!
//! Overlay text only needs the base-14 Helvetica face, so no font program is
//! embedded. Widths come from the Adobe Helvetica AFM and are used for
//! right/center alignment.

use lopdf::{dictionary, Dictionary};

/// Advance widths (1/1000 em) for WinAnsi codes 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0 - 9
    278, 278, 584, 584, 584, 556, 1015, // : - @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A - M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N - Z
    278, 278, 278, 469, 556, 333, // [ - `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a - m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n - z
    334, 260, 334, 584, // { - ~
];

/// Width used for codes outside the ASCII table
const DEFAULT_WIDTH: u16 = 556;

/// Byte substituted for characters WinAnsi cannot represent
const REPLACEMENT: u8 = b'?';

/// Base-14 font usable without embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StandardFont {
    #[default]
    Helvetica,
}

impl StandardFont {
    /// PostScript name used as `/BaseFont`
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
        }
    }

    /// Advance width of a WinAnsi code in 1/1000 em
    pub fn code_width(self, code: u8) -> u16 {
        match code {
            32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
            _ => DEFAULT_WIDTH,
        }
    }

    /// Width of text in points at the given size
    pub fn text_width_points(self, text: &str, size: f32) -> f64 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|code| self.code_width(code) as u32)
            .sum();
        units as f64 * size as f64 / 1000.0
    }

    /// Font resource dictionary (`/Type /Font /Subtype /Type1`)
    pub fn to_pdf_dict(self) -> Dictionary {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.base_font(),
            "Encoding" => "WinAnsiEncoding",
        }
    }
}

/// Encode text as WinAnsi (Windows-1252) bytes
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_code).collect()
}

fn win_ansi_code(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '…' => 0x85,
        'Š' => 0x8A,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '–' => 0x96,
        '—' => 0x97,
        'š' => 0x9A,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => REPLACEMENT,
    }
}
