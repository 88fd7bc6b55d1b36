//! Text rendering utilities

use crate::font::encode_win_ansi;
use crate::Align;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text width in points (for alignment)
    pub text_width: f64,
}

/// Encode text as a PDF literal string, e.g. `(Total \(EUR\))`
pub fn literal_string(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    for byte in encode_win_ansi(text) {
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b')');
    out
}

/// Generate PDF operators for text insertion
///
/// Creates the text operators (BT, Tf, Td, Tj, ET) that draw `text` anchored
/// at `(x, y)` in PDF coordinates (origin bottom-left). With `Align::Right`
/// the anchor is the right edge of the text.
pub fn generate_text_operators(
    text: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let x_offset = match align {
        Align::Left => 0.0,
        Align::Right => -ctx.text_width,
    };
    let final_x = x + x_offset;

    let font = format!("/{} {} Tf\n", ctx.font_name, ctx.font_size);
    let position = format!("{} {} Td\n", fmt_num(final_x), fmt_num(y));

    let mut ops = Vec::new();
    ops.extend_from_slice(b"BT\n");
    ops.extend_from_slice(font.as_bytes());
    ops.extend_from_slice(position.as_bytes());
    ops.extend_from_slice(&literal_string(text));
    ops.extend_from_slice(b" Tj\nET\n");
    ops
}

/// Format a coordinate with at most 3 decimals and no trailing zeros
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // avoid "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
