//! Form rendering

use crate::layout::{Layout, TOB_LAYOUT};
use crate::{FormError, Result};
use chrono::NaiveDate;
use pdf_core::{Align, Overlay, PdfDocument, StandardFont};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::path::Path;
use tob_report::{PersonalInfo, TaxRecord};

/// Overlay layers keyed by template page index (0-indexed)
pub type RenderPlan = BTreeMap<usize, Overlay>;

/// Fills the TOB declaration template
pub struct FormRenderer<'a> {
    layout: &'a Layout,
}

impl Default for FormRenderer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl FormRenderer<'static> {
    /// Create a renderer for the current template layout
    pub fn new() -> Self {
        Self {
            layout: &TOB_LAYOUT,
        }
    }
}

impl<'a> FormRenderer<'a> {
    /// Create a renderer for another template layout
    pub fn with_layout(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Render the filled form from a template file
    ///
    /// # Arguments
    /// * `template` - Path of the blank declaration PDF
    /// * `record` - Parsed tax figures
    /// * `info` - Declarant details, including the signature image path
    pub fn render<P: AsRef<Path>>(
        &self,
        template: P,
        record: &TaxRecord,
        info: &PersonalInfo,
    ) -> Result<Vec<u8>> {
        let template_bytes = read_file(template.as_ref())?;
        self.render_bytes(&template_bytes, record, info)
    }

    /// Render the filled form from template bytes
    pub fn render_bytes(
        &self,
        template: &[u8],
        record: &TaxRecord,
        info: &PersonalInfo,
    ) -> Result<Vec<u8>> {
        let signature = read_file(&info.signature)?;
        let plan = self.plan(record, info, &signature)?;

        let mut doc = PdfDocument::open_from_bytes(template)?;
        composite(&mut doc, plan)?;

        let bytes = doc.to_bytes()?;
        log::debug!(
            "Rendered {} page form ({} bytes)",
            doc.page_count(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Build the overlay layers without touching a template
    pub fn plan(
        &self,
        record: &TaxRecord,
        info: &PersonalInfo,
        signature: &[u8],
    ) -> Result<RenderPlan> {
        let mut plan = RenderPlan::new();
        plan.insert(
            self.layout.identity_page,
            self.identity_overlay(record, info),
        );
        plan.insert(
            self.layout.signature_page,
            self.signature_overlay(record, info, signature)?,
        );
        Ok(plan)
    }

    fn new_overlay(&self) -> Overlay {
        let mut overlay = Overlay::a4();
        overlay.set_font(StandardFont::Helvetica, self.layout.font_size);
        overlay
    }

    /// Period, identity, address and amounts
    fn identity_overlay(&self, record: &TaxRecord, info: &PersonalInfo) -> Overlay {
        let layout = self.layout;
        let mut overlay = self.new_overlay();

        let month = format!("{:02}", record.month);
        let year = format!("{:02}", record.year.rem_euclid(100));
        overlay.draw_text(&month, layout.month.x, layout.month.y, Align::Left);
        overlay.draw_text(&year, layout.year.x, layout.year.y, Align::Left);

        for mark in &layout.placeholders {
            overlay.draw_text(layout.placeholder_mark, mark.x, mark.y, Align::Left);
        }

        overlay.draw_text(
            &info.national_number,
            layout.national_number.x,
            layout.national_number.y,
            Align::Left,
        );
        overlay.draw_text(
            &info.full_name,
            layout.full_name.x,
            layout.full_name.y,
            Align::Left,
        );

        let origins = layout.address_lines(info.address.len());
        for (line, origin) in info.address.iter().zip(origins) {
            overlay.draw_text(line, origin.x, origin.y, Align::Left);
        }

        for (category, line) in record.lines() {
            let y = layout.category_y(category);
            overlay.draw_text(&format_amount(line.amount), layout.basis_x, y, Align::Right);
            overlay.draw_text(&format_amount(line.tax), layout.tax_x, y, Align::Right);
        }

        overlay.draw_text(
            &format_amount(record.total_tax()),
            layout.total.x,
            layout.total.y,
            Align::Right,
        );

        overlay
    }

    /// Total, place, date and signature
    fn signature_overlay(
        &self,
        record: &TaxRecord,
        info: &PersonalInfo,
        signature: &[u8],
    ) -> Result<Overlay> {
        let layout = self.layout;
        let mut overlay = self.new_overlay();

        overlay.draw_text(
            &format_amount(record.total_tax()),
            layout.signature_total.x,
            layout.signature_total.y,
            Align::Right,
        );
        overlay.draw_text(
            &format_place_and_date(&info.location, info.sign_date),
            layout.place_and_date.x,
            layout.place_and_date.y,
            Align::Left,
        );
        overlay.draw_image(
            signature,
            layout.signature.x,
            layout.signature.y,
            layout.signature_size,
            layout.signature_size,
        )?;

        Ok(overlay)
    }
}

/// Stamp each planned layer onto its template page
///
/// Pages without a layer pass through unchanged.
fn composite(doc: &mut PdfDocument, mut plan: RenderPlan) -> Result<()> {
    let page_count = doc.page_count();

    for index in 0..page_count {
        if let Some(overlay) = plan.remove(&index) {
            doc.stamp(index + 1, overlay)?;
        }
    }

    match plan.keys().next() {
        Some(&index) => Err(FormError::MissingPage { index, page_count }),
        None => Ok(()),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| FormError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Format an amount with exactly two decimals, e.g. `1.44`
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Format the place and signing date, e.g. `Brussels, January 5, 2023`
pub fn format_place_and_date(location: &str, date: NaiveDate) -> String {
    format!("{location}, {}", date.format("%B %-d, %Y"))
}
