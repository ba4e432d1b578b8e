//! Greedy row-major packing of equally sized markers onto pages.

use crate::SheetError;
use serde::{Deserialize, Serialize};

/// Slack for millimetre comparisons, so an exact fit never wraps.
const FIT_EPS_MM: f64 = 1e-6;

/// Page size and uniform margin, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl PageGeometry {
    /// A4 portrait with a 15 mm margin.
    pub const fn a4() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 15.0,
        }
    }

    pub fn printable_width(&self) -> f64 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn printable_height(&self) -> f64 {
        self.height_mm - 2.0 * self.margin_mm
    }

    fn right_edge(&self) -> f64 {
        self.width_mm - self.margin_mm
    }

    fn bottom_edge(&self) -> f64 {
        self.height_mm - self.margin_mm
    }

    fn validate(&self) -> Result<(), SheetError> {
        let ok = [self.width_mm, self.height_mm, self.margin_mm]
            .iter()
            .all(|v| v.is_finite())
            && self.margin_mm >= 0.0
            && self.printable_width() > 0.0
            && self.printable_height() > 0.0;
        if ok {
            Ok(())
        } else {
            Err(SheetError::InvalidGeometry)
        }
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Top-left corner of the next free slot on the current page.
///
/// Cursors are plain values: every step returns a new cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutCursor {
    pub x_mm: f64,
    pub y_mm: f64,
}

impl LayoutCursor {
    /// Top-left corner of the printable area.
    pub fn origin(geometry: &PageGeometry) -> Self {
        Self {
            x_mm: geometry.margin_mm,
            y_mm: geometry.margin_mm,
        }
    }

    /// Next slot in the same row.
    pub fn advance(self, size_mm: f64) -> Self {
        Self {
            x_mm: self.x_mm + size_mm,
            ..self
        }
    }

    /// First slot of the next row.
    pub fn wrap_row(self, size_mm: f64, geometry: &PageGeometry) -> Self {
        Self {
            x_mm: geometry.margin_mm,
            y_mm: self.y_mm + size_mm,
        }
    }

    /// First slot of a fresh page.
    pub fn new_page(self, geometry: &PageGeometry) -> Self {
        Self::origin(geometry)
    }

    fn overflows_row(&self, size_mm: f64, geometry: &PageGeometry) -> bool {
        self.x_mm + size_mm > geometry.right_edge() + FIT_EPS_MM
    }

    fn overflows_page(&self, size_mm: f64, geometry: &PageGeometry) -> bool {
        self.y_mm + size_mm > geometry.bottom_edge() + FIT_EPS_MM
    }
}

/// Where one request lands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub page: usize,
    pub x_mm: f64,
    pub y_mm: f64,
    pub size_mm: f64,
    /// Index into the request list.
    pub request_index: usize,
}

/// Result of [`layout_sheet`]: placements grouped per page, in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub geometry: PageGeometry,
    pub size_mm: f64,
    pub pages: Vec<Vec<Placement>>,
}

impl SheetLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All placements in request order.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.pages.iter().flatten()
    }
}

/// Pack `count` markers of `size_mm` onto pages of `geometry`.
///
/// Row overflow is checked before page overflow: a marker that does not fit
/// to the right wraps to the next row, and if that row does not fit either
/// it starts a new page. At least one page is always produced.
pub fn layout_sheet(
    count: usize,
    size_mm: f64,
    geometry: &PageGeometry,
) -> Result<SheetLayout, SheetError> {
    geometry.validate()?;
    if !size_mm.is_finite() || size_mm <= 0.0 {
        return Err(SheetError::InvalidSize { size_mm });
    }
    if size_mm > geometry.printable_width() + FIT_EPS_MM
        || size_mm > geometry.printable_height() + FIT_EPS_MM
    {
        return Err(SheetError::MarkerTooLarge {
            size_mm,
            printable_width_mm: geometry.printable_width(),
            printable_height_mm: geometry.printable_height(),
        });
    }

    let mut pages = vec![Vec::new()];
    let mut cursor = LayoutCursor::origin(geometry);
    for request_index in 0..count {
        if cursor.overflows_row(size_mm, geometry) {
            cursor = cursor.wrap_row(size_mm, geometry);
        }
        if cursor.overflows_page(size_mm, geometry) {
            cursor = cursor.new_page(geometry);
            pages.push(Vec::new());
        }
        let page = pages.len() - 1;
        pages[page].push(Placement {
            page,
            x_mm: cursor.x_mm,
            y_mm: cursor.y_mm,
            size_mm,
            request_index,
        });
        cursor = cursor.advance(size_mm);
    }

    log::debug!(
        "laid out {count} markers of {size_mm} mm on {} page(s)",
        pages.len()
    );
    Ok(SheetLayout {
        geometry: *geometry,
        size_mm,
        pages,
    })
}
