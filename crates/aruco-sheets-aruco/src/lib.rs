//! ArUco marker dictionaries, rendering and decoding utilities.
//!
//! This crate focuses on:
//! - embedded predefined dictionaries (compiled into the binary),
//! - rendering a marker bitmap for a `(dictionary, id, side)` request,
//! - matching observed marker codes against a dictionary,
//! - decoding a marker from an image quad.
//!
//! It does **not** search images for candidate quads; that lives in
//! `aruco-sheets-live`.

pub mod builtins;
mod dictionary;
mod error;
mod matcher;
#[cfg(feature = "opencv")]
mod opencv_tables;
mod render;
mod scan;
mod threshold;

pub use dictionary::{Dictionary, PredefinedDictionary};
pub use error::ArucoError;
pub use matcher::{rotate_code_u64, Match, Matcher};
pub use render::render_marker;
pub use scan::{decode_marker_in_quad, QuadDecode, QuadDecodeConfig};
pub use threshold::otsu_threshold;
