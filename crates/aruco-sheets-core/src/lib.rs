//! Core types and utilities shared by the `aruco-sheets` crates.
//!
//! Rasters are `image` buffers; decoding code reads them through the
//! borrowed [`GrayImageView`], and the stroke font draws onto any
//! `imageproc` canvas.

pub mod font;
mod homography;
mod raster;
mod logger;

pub use homography::{homography_from_4pt, Homography};
pub use raster::GrayImageView;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
