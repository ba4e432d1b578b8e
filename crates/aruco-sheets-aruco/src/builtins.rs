//! Embedded built-in dictionaries.
//!
//! Family tables are generated at build time from `data/DICT_*_1000.json`.
//! Every predefined dictionary of one grid size is a prefix of its family
//! table, so a table of `k` codes completes each dictionary with at most `k`
//! ids. With the `opencv` feature the families are read from OpenCV's
//! predefined dictionaries on first use, which covers every id of the 4x4 to
//! 7x7 families.

#![allow(clippy::unreadable_literal)]

use crate::{Dictionary, PredefinedDictionary};

include!(concat!(env!("OUT_DIR"), "/builtins.rs"));

/// Code table of the `marker_size × marker_size` family.
///
/// Prefers the OpenCV table when the `opencv` feature is on and OpenCV
/// provides one; falls back to the embedded table otherwise.
pub fn family_codes(marker_size: usize) -> &'static [u64] {
    #[cfg(feature = "opencv")]
    {
        let codes = crate::opencv_tables::family(marker_size);
        if !codes.is_empty() {
            return codes;
        }
    }
    embedded_family(marker_size)
}

/// Look up a predefined dictionary by name, but only if every one of its
/// codes is available.
pub fn builtin_dictionary(name: &str) -> Option<Dictionary> {
    let dict = name.parse::<PredefinedDictionary>().ok()?.dictionary();
    dict.is_complete().then_some(dict)
}

/// All predefined dictionaries with their complete code table available.
pub fn complete_dictionaries() -> impl Iterator<Item = Dictionary> {
    PredefinedDictionary::ALL
        .into_iter()
        .map(PredefinedDictionary::dictionary)
        .filter(Dictionary::is_complete)
}
