//! PDF Document wrapper

use crate::overlay::{form_operators, Overlay};
use crate::{PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Maximum depth followed when looking up inherited page attributes
const MAX_INHERITANCE_DEPTH: usize = 10;

/// PDF Document wrapper providing template compositing
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
}

impl PdfDocument {
    /// Open a PDF document from bytes
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::open_from_bytes(&std::fs::read("template.pdf")?)?;
    /// ```
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Draw an overlay layer on top of a page (1-indexed)
    ///
    /// The existing page content is wrapped in `q`/`Q` so its graphics state
    /// cannot leak into the overlay, then the overlay is drawn as a Form
    /// XObject aligned with the page's MediaBox origin. Page size, rotation
    /// and the order of pages are left untouched.
    pub fn stamp(&mut self, page: usize, overlay: Overlay) -> Result<()> {
        let page_id = self.page_id(page)?;
        let (origin_x, origin_y) = self.media_box_origin(page_id)?;

        let mut page_dict = self.inner.get_object(page_id)?.as_dict()?.clone();

        let mut resources = match self.inherited_attribute(page_id, b"Resources")? {
            Some(obj) => self.resolve_dict(&obj)?,
            None => Dictionary::new(),
        };
        let mut xobjects = match resources.get(b"XObject") {
            Ok(obj) => self.resolve_dict(obj)?,
            Err(_) => Dictionary::new(),
        };

        let name = (1..)
            .map(|n| format!("Ov{n}"))
            .find(|name| !xobjects.has(name.as_bytes()))
            .unwrap_or_default();

        let contents = self.content_refs(&page_dict)?;
        let form_id = overlay.into_form_xobject(&mut self.inner);

        xobjects.set(name.as_bytes(), Object::Reference(form_id));
        resources.set("XObject", Object::Dictionary(xobjects));
        page_dict.set("Resources", Object::Dictionary(resources));

        let prefix = self.add_stream(b"q\n".to_vec());
        let suffix = self.add_stream(form_operators(&name, origin_x, origin_y));

        let mut new_contents = Vec::with_capacity(contents.len() + 2);
        new_contents.push(Object::Reference(prefix));
        new_contents.extend(contents);
        new_contents.push(Object::Reference(suffix));
        page_dict.set("Contents", Object::Array(new_contents));

        self.inner.objects.insert(page_id, page_dict.into());

        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        pages
            .get(&(page as u32))
            .copied()
            .ok_or(PdfError::InvalidPage(page, pages.len()))
    }

    fn add_stream(&mut self, content: Vec<u8>) -> ObjectId {
        self.inner
            .add_object(Stream::new(Dictionary::new(), content))
    }

    /// Existing page content as a list of stream references
    fn content_refs(&mut self, page_dict: &Dictionary) -> Result<Vec<Object>> {
        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents.clone(),
            Err(_) => return Ok(Vec::new()),
        };

        let refs = match contents {
            Object::Reference(id) => match self.inner.get_object(id)? {
                // Contents may point to an indirect array of streams
                Object::Array(arr) => arr.clone(),
                _ => vec![Object::Reference(id)],
            },
            Object::Array(arr) => arr,
            Object::Stream(stream) => vec![Object::Reference(self.inner.add_object(stream))],
            _ => {
                return Err(PdfError::ParseError(
                    "Page Contents is not a stream or array".to_string(),
                ))
            }
        };

        Ok(refs)
    }

    /// Look up a page attribute, following the Parent chain for inheritable keys
    fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Result<Option<Object>> {
        let mut current_id = page_id;

        for _ in 0..MAX_INHERITANCE_DEPTH {
            let dict = self
                .inner
                .get_object(current_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

            if let Ok(value) = dict.get(key) {
                return Ok(Some(value.clone()));
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }

        Ok(None)
    }

    /// Resolve a dictionary that may be stored inline or behind a reference
    fn resolve_dict(&self, obj: &Object) -> Result<Dictionary> {
        match obj {
            Object::Dictionary(dict) => Ok(dict.clone()),
            Object::Reference(id) => self
                .inner
                .get_object(*id)?
                .as_dict()
                .cloned()
                .map_err(|_| PdfError::ParseError("Reference is not a dictionary".to_string())),
            _ => Err(PdfError::ParseError("Expected a dictionary".to_string())),
        }
    }

    /// Lower-left corner of the page MediaBox (A4 at the origin when absent)
    fn media_box_origin(&self, page_id: ObjectId) -> Result<(f64, f64)> {
        let media_box = match self.inherited_attribute(page_id, b"MediaBox")? {
            Some(Object::Array(arr)) => arr,
            Some(Object::Reference(id)) => self
                .inner
                .get_object(id)?
                .as_array()
                .map_err(|_| {
                    PdfError::ParseError("MediaBox reference is not an array".to_string())
                })?
                .clone(),
            Some(_) => return Err(PdfError::ParseError("MediaBox is not an array".to_string())),
            None => return Ok((0.0, 0.0)),
        };

        if media_box.len() < 4 {
            return Err(PdfError::ParseError("Invalid MediaBox format".to_string()));
        }
        let x = number(&media_box[0])
            .ok_or_else(|| PdfError::ParseError("Invalid MediaBox x1".to_string()))?;
        let y = number(&media_box[1])
            .ok_or_else(|| PdfError::ParseError("Invalid MediaBox y1".to_string()))?;

        Ok((x, y))
    }
}

fn number(obj: &Object) -> Option<f64> {
    obj.as_f32()
        .map(|v| v as f64)
        .ok()
        .or_else(|| obj.as_i64().ok().map(|v| v as f64))
}
