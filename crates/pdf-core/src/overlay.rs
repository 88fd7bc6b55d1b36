//! Single-page overlay layers
//!
//! An [`Overlay`] collects drawing instructions on a blank canvas. It is turned
//! into a Form XObject and drawn on top of a template page by
//! [`PdfDocument::stamp`](crate::PdfDocument::stamp).

use crate::font::StandardFont;
use crate::image::{generate_image_operators, ImageXObject};
use crate::text::{fmt_num, generate_text_operators, TextRenderContext};
use crate::{Align, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeMap;

/// A4 width in points
pub const A4_WIDTH: f64 = 595.28;
/// A4 height in points
pub const A4_HEIGHT: f64 = 841.89;

/// Drawing layer for one page, coordinates in points from the bottom-left corner
#[derive(Debug, Clone)]
pub struct Overlay {
    width: f64,
    height: f64,
    font: StandardFont,
    font_size: f32,
    /// Fonts used so far (font -> resource name)
    fonts: BTreeMap<StandardFont, String>,
    /// Images in drawing order (resource name, image)
    images: Vec<(String, ImageXObject)>,
    content: Vec<u8>,
}

impl Overlay {
    /// Create an empty layer with the given canvas size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            font: StandardFont::default(),
            font_size: 12.0,
            fonts: BTreeMap::new(),
            images: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Create an empty A4 portrait layer
    pub fn a4() -> Self {
        Self::new(A4_WIDTH, A4_HEIGHT)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Set the font used by subsequent text
    pub fn set_font(&mut self, font: StandardFont, size: f32) {
        self.font = font;
        self.font_size = size;
    }

    /// Width of text in the current font and size
    pub fn text_width(&self, text: &str) -> f64 {
        self.font.text_width_points(text, self.font_size)
    }

    /// Draw text anchored at `(x, y)`; `Align::Right` anchors the right edge
    pub fn draw_text(&mut self, text: &str, x: f64, y: f64, align: Align) {
        if text.is_empty() {
            return;
        }

        let next = format!("F{}", self.fonts.len() + 1);
        let font_name = self.fonts.entry(self.font).or_insert(next).clone();

        let ctx = TextRenderContext {
            font_name,
            font_size: self.font_size,
            text_width: self.text_width(text),
        };
        let ops = generate_text_operators(text, x, y, align, &ctx);
        self.content.extend_from_slice(&ops);
    }

    /// Draw a JPEG or PNG image stretched into the box at `(x, y)` (lower-left corner)
    pub fn draw_image(
        &mut self,
        data: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let xobject = ImageXObject::from_bytes(data)?;
        let name = format!("Im{}", self.images.len() + 1);

        let ops = generate_image_operators(&name, x, y, width, height);
        self.content.extend_from_slice(&ops);
        self.images.push((name, xobject));

        Ok(())
    }

    /// True when nothing has been drawn
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Raw content stream operators
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Add this layer to `doc` as a Form XObject and return its object id
    pub(crate) fn into_form_xobject(self, doc: &mut Document) -> ObjectId {
        let mut font_dict = Dictionary::new();
        for (font, name) in &self.fonts {
            let font_id = doc.add_object(font.to_pdf_dict());
            font_dict.set(name.as_bytes(), Object::Reference(font_id));
        }

        let mut xobject_dict = Dictionary::new();
        for (name, image) in &self.images {
            let image_id = doc.add_object(image.to_pdf_stream());
            xobject_dict.set(name.as_bytes(), Object::Reference(image_id));
        }

        let mut resources = Dictionary::new();
        if !self.fonts.is_empty() {
            resources.set("Font", Object::Dictionary(font_dict));
        }
        if !self.images.is_empty() {
            resources.set("XObject", Object::Dictionary(xobject_dict));
        }

        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => 1,
            "BBox" => vec![
                0.into(),
                0.into(),
                Object::Integer(self.width.ceil() as i64),
                Object::Integer(self.height.ceil() as i64),
            ],
            "Resources" => resources,
        };

        doc.add_object(Stream::new(dict, self.content))
    }
}

/// Operators that draw a Form XObject with its origin at `(x, y)`
pub(crate) fn form_operators(name: &str, x: f64, y: f64) -> Vec<u8> {
    let (x, y) = (fmt_num(x), fmt_num(y));
    let ops = format!("\nQ\nq\n1 0 0 1 {x} {y} cm\n/{name} Do\nQ\n");
    ops.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_overlay_is_empty() {
        let overlay = Overlay::a4();
        assert!(overlay.is_empty());
        assert_eq!(overlay.width(), A4_WIDTH);
        assert_eq!(overlay.height(), A4_HEIGHT);
    }

    #[test]
    fn test_draw_text() {
        let mut overlay = Overlay::a4();
        overlay.set_font(StandardFont::Helvetica, 10.0);
        overlay.draw_text("01", 100.0, 700.0, Align::Left);
        overlay.draw_text("", 100.0, 600.0, Align::Left);

        let content = String::from_utf8(overlay.content().to_vec()).unwrap();
        assert_eq!(content, "BT\n/F1 10 Tf\n100 700 Td\n(01) Tj\nET\n");
    }

    #[test]
    fn test_font_resource_shared() {
        let mut overlay = Overlay::a4();
        overlay.draw_text("a", 0.0, 0.0, Align::Left);
        overlay.draw_text("b", 0.0, 10.0, Align::Right);
        assert_eq!(overlay.fonts.len(), 1);
    }

    #[test]
    fn test_form_xobject() {
        let mut doc = Document::with_version("1.5");
        let mut overlay = Overlay::new(100.0, 200.0);
        overlay.draw_text("x", 10.0, 10.0, Align::Left);

        let id = overlay.into_form_xobject(&mut doc);
        let stream = doc.get_object(id).unwrap().as_stream().unwrap();

        assert_eq!(
            stream.dict.get(b"Subtype").unwrap().as_name().unwrap(),
            b"Form"
        );
        let resources = stream.dict.get(b"Resources").unwrap().as_dict().unwrap();
        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        assert!(fonts.has(b"F1"));
        assert!(!resources.has(b"XObject"));
    }

    #[test]
    fn test_form_operators() {
        let ops = String::from_utf8(form_operators("Ov1", 0.0, 0.0)).unwrap();
        assert_eq!(ops, "\nQ\nq\n1 0 0 1 0 0 cm\n/Ov1 Do\nQ\n");
    }
}
