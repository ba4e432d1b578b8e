//! Printable ArUco marker sheets.
//!
//! Current focus:
//! - bordered markers: white margin, dashed cut guide, numeric id label,
//! - greedy row-major packing of equally sized markers onto A4 pages,
//! - PDF output (one image XObject per distinct marker) plus the
//!   intermediate PNG per marker.
//!
//! Marker dictionaries and bitmaps come from `aruco-sheets-aruco`.

mod bordered;
mod error;
mod io;
mod layout;
mod pdf;
mod request;
mod sheet;

pub use bordered::{
    border_thickness, bordered_marker, canvas_side, fit_label_scale, label_thickness,
    BorderedMarkerParams, DASH_ON_PX, DASH_PERIOD_PX,
};
pub use error::SheetError;
pub use io::SheetConfig;
pub use layout::{layout_sheet, LayoutCursor, PageGeometry, Placement, SheetLayout};
pub use pdf::PdfSheetWriter;
pub use request::MarkerRequest;
pub use sheet::{compose_sheet, marker_file_name, SheetComposer, SheetOutput, DEFAULT_PDF_NAME};
