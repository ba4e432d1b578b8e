//! High-level facade crate for the `aruco-sheets-*` workspace.
//!
//! This crate provides:
//! - re-exports of the underlying crates,
//! - end-to-end helpers for the two workflows: composing a printable sheet
//!   from a JSON config, and running the live detector over a directory of
//!   frames (or a webcam with the `opencv` feature),
//! - the `aruco-sheets` command-line tool (feature `cli`, on by default).
//!
//! ## Quickstart
//!
//! ```no_run
//! use aruco_sheets::print::{compose_sheet, MarkerRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let requests = [MarkerRequest::new(4, 2, 1000), MarkerRequest::new(4, 1, 1000)];
//! let out = compose_sheet(&requests, 70.0, "ArucoMarkers")?;
//! println!("{} page(s) in {}", out.layout.page_count(), out.pdf_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `aruco_sheets::core`: rasters, homography, stroke font, logger.
//! - `aruco_sheets::aruco`: dictionaries, marker rendering, quad decoding.
//! - `aruco_sheets::print`: bordered markers, page layout, PDF output.
//! - `aruco_sheets::live`: frame sources/sinks, detector, live loop.
//! - `aruco_sheets::workflow`: the end-to-end helpers used by the CLI.

pub use aruco_sheets_aruco as aruco;
pub use aruco_sheets_core as core;
pub use aruco_sheets_live as live;
pub use aruco_sheets_print as print;

pub use aruco_sheets_aruco::PredefinedDictionary;
pub use aruco_sheets_live::{Detection, LiveConfig, LiveSummary, StopReason};
pub use aruco_sheets_print::{MarkerRequest, SheetConfig, SheetOutput};

pub mod workflow;
