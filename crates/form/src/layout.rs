//! Field positions on the declaration template
//!
//! All coordinates are PDF points on an A4 canvas with the origin at the
//! bottom-left corner. Text positions are baselines; amounts are anchored on
//! their right edge.

use tob_report::Category;

/// A position on the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Every fixed position used when filling one template version
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Font size for all overlay text
    pub font_size: f32,

    /// Template page holding identity and amounts
    pub identity_page: usize,
    /// Template page holding the signature
    pub signature_page: usize,

    pub month: Point,
    pub year: Point,
    /// Reserved administrative fields
    pub placeholders: [Point; 2],
    pub placeholder_mark: &'static str,
    pub national_number: Point,
    pub full_name: Point,
    /// Baseline of the first address line
    pub address: Point,
    /// Vertical distance between address lines
    pub address_step: f64,

    /// Right edge of the taxable basis column
    pub basis_x: f64,
    /// Right edge of the tax column
    pub tax_x: f64,
    pub etf_y: f64,
    pub share_y: f64,
    pub total: Point,

    pub signature_total: Point,
    pub place_and_date: Point,
    /// Lower-left corner of the signature image
    pub signature: Point,
    /// Side of the (square) signature box
    pub signature_size: f64,
}

/// Layout of the 2023 TOB declaration template
pub const TOB_LAYOUT: Layout = Layout {
    font_size: 10.0,

    identity_page: 0,
    signature_page: 1,

    month: Point::new(452.0, 742.0),
    year: Point::new(500.0, 742.0),
    placeholders: [Point::new(150.0, 690.0), Point::new(150.0, 668.0)],
    placeholder_mark: "-------------------------",
    national_number: Point::new(150.0, 640.0),
    full_name: Point::new(150.0, 616.0),
    address: Point::new(150.0, 592.0),
    address_step: 12.0,

    basis_x: 360.0,
    tax_x: 520.0,
    etf_y: 404.0,
    share_y: 380.0,
    total: Point::new(520.0, 300.0),

    signature_total: Point::new(430.0, 705.0),
    place_and_date: Point::new(90.0, 180.0),
    signature: Point::new(380.0, 120.0),
    signature_size: 100.0,
};

impl Default for Layout {
    fn default() -> Self {
        TOB_LAYOUT
    }
}

impl Layout {
    /// Baseline of the amount row for a tax category
    pub fn category_y(&self, category: Category) -> f64 {
        match category {
            Category::Etf => self.etf_y,
            Category::Share => self.share_y,
        }
    }

    /// Baselines of `count` address lines, top to bottom
    pub fn address_lines(&self, count: usize) -> impl Iterator<Item = Point> + '_ {
        (0..count).map(move |i| {
            let y = self.address.y - self.address_step * i as f64;
            Point::new(self.address.x, y)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholder_width() {
        assert_eq!(TOB_LAYOUT.placeholder_mark.chars().count(), 25);
    }

    #[test]
    fn test_etf_row_above_share_row() {
        assert!(TOB_LAYOUT.category_y(Category::Etf) > TOB_LAYOUT.category_y(Category::Share));
    }

    #[test]
    fn test_address_lines_step_down() {
        let lines: Vec<Point> = TOB_LAYOUT.address_lines(5).collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], TOB_LAYOUT.address);
        for pair in lines.windows(2) {
            assert_eq!(pair[0].x, pair[1].x);
            assert_eq!(pair[0].y - pair[1].y, 12.0);
        }
    }

    #[test]
    fn test_address_stays_above_amounts() {
        let last = TOB_LAYOUT.address_lines(5).last().unwrap();
        assert!(last.y > TOB_LAYOUT.etf_y);
    }
}
