//! Dictionary metadata and packed marker codes.

use crate::builtins::family_codes;
use crate::ArucoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed ArUco dictionary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dictionary {
    /// OpenCV-style name, e.g. `DICT_4X4_50`.
    pub name: &'static str,
    /// Marker side length (number of inner bits per side).
    pub marker_size: usize,
    /// Maximum error-correcting Hamming distance supported by the dictionary.
    pub max_correction_bits: u8,
    /// Number of ids the dictionary defines.
    pub len: usize,
    /// One `u64` per embedded marker id, encoding the inner
    /// `marker_size × marker_size` bits.
    ///
    /// Bits are stored in row-major order (`idx = y * n + x`) with
    /// **white = 1**. May be shorter than `len` when only a prefix of the
    /// family is embedded.
    pub codes: &'static [u64],
}

impl Dictionary {
    /// Total number of inner bits per marker.
    #[inline]
    pub fn bit_count(&self) -> usize {
        self.marker_size * self.marker_size
    }

    /// Packed code for `id`.
    pub fn code(&self, id: u32) -> Result<u64, ArucoError> {
        let idx = id as usize;
        if idx >= self.len {
            return Err(ArucoError::InvalidId {
                dictionary: self.name,
                id,
                len: self.len,
            });
        }
        self.codes
            .get(idx)
            .copied()
            .ok_or(ArucoError::NotEmbedded {
                dictionary: self.name,
                id,
            })
    }

    /// True when every id of the dictionary has its code embedded.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.codes.len() >= self.len
    }
}

/// The OpenCV predefined ArUco dictionaries, keyed by grid size and id count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredefinedDictionary {
    #[serde(rename = "DICT_4X4_50")]
    Dict4x4_50,
    #[serde(rename = "DICT_4X4_100")]
    Dict4x4_100,
    #[serde(rename = "DICT_4X4_250")]
    Dict4x4_250,
    #[serde(rename = "DICT_4X4_1000")]
    Dict4x4_1000,
    #[serde(rename = "DICT_5X5_50")]
    Dict5x5_50,
    #[serde(rename = "DICT_5X5_100")]
    Dict5x5_100,
    #[serde(rename = "DICT_5X5_250")]
    Dict5x5_250,
    #[serde(rename = "DICT_5X5_1000")]
    Dict5x5_1000,
    #[serde(rename = "DICT_6X6_50")]
    Dict6x6_50,
    #[serde(rename = "DICT_6X6_100")]
    Dict6x6_100,
    #[serde(rename = "DICT_6X6_250")]
    Dict6x6_250,
    #[serde(rename = "DICT_6X6_1000")]
    Dict6x6_1000,
    #[serde(rename = "DICT_7X7_50")]
    Dict7x7_50,
    #[serde(rename = "DICT_7X7_100")]
    Dict7x7_100,
    #[serde(rename = "DICT_7X7_250")]
    Dict7x7_250,
    #[serde(rename = "DICT_7X7_1000")]
    Dict7x7_1000,
}

impl PredefinedDictionary {
    pub const ALL: [PredefinedDictionary; 16] = [
        Self::Dict4x4_50,
        Self::Dict4x4_100,
        Self::Dict4x4_250,
        Self::Dict4x4_1000,
        Self::Dict5x5_50,
        Self::Dict5x5_100,
        Self::Dict5x5_250,
        Self::Dict5x5_1000,
        Self::Dict6x6_50,
        Self::Dict6x6_100,
        Self::Dict6x6_250,
        Self::Dict6x6_1000,
        Self::Dict7x7_50,
        Self::Dict7x7_100,
        Self::Dict7x7_250,
        Self::Dict7x7_1000,
    ];

    /// Look up the dictionary for a `size × size` grid with `count` ids.
    pub fn for_marker_size(marker_size: u32, count: u32) -> Result<Self, ArucoError> {
        Self::ALL
            .into_iter()
            .find(|d| d.marker_size() as u32 == marker_size && d.count() as u32 == count)
            .ok_or(ArucoError::UnsupportedMarkerSize { marker_size, count })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dict4x4_50 => "DICT_4X4_50",
            Self::Dict4x4_100 => "DICT_4X4_100",
            Self::Dict4x4_250 => "DICT_4X4_250",
            Self::Dict4x4_1000 => "DICT_4X4_1000",
            Self::Dict5x5_50 => "DICT_5X5_50",
            Self::Dict5x5_100 => "DICT_5X5_100",
            Self::Dict5x5_250 => "DICT_5X5_250",
            Self::Dict5x5_1000 => "DICT_5X5_1000",
            Self::Dict6x6_50 => "DICT_6X6_50",
            Self::Dict6x6_100 => "DICT_6X6_100",
            Self::Dict6x6_250 => "DICT_6X6_250",
            Self::Dict6x6_1000 => "DICT_6X6_1000",
            Self::Dict7x7_50 => "DICT_7X7_50",
            Self::Dict7x7_100 => "DICT_7X7_100",
            Self::Dict7x7_250 => "DICT_7X7_250",
            Self::Dict7x7_1000 => "DICT_7X7_1000",
        }
    }

    pub fn marker_size(self) -> usize {
        match self {
            Self::Dict4x4_50 | Self::Dict4x4_100 | Self::Dict4x4_250 | Self::Dict4x4_1000 => 4,
            Self::Dict5x5_50 | Self::Dict5x5_100 | Self::Dict5x5_250 | Self::Dict5x5_1000 => 5,
            Self::Dict6x6_50 | Self::Dict6x6_100 | Self::Dict6x6_250 | Self::Dict6x6_1000 => 6,
            Self::Dict7x7_50 | Self::Dict7x7_100 | Self::Dict7x7_250 | Self::Dict7x7_1000 => 7,
        }
    }

    pub fn count(self) -> usize {
        match self {
            Self::Dict4x4_50 | Self::Dict5x5_50 | Self::Dict6x6_50 | Self::Dict7x7_50 => 50,
            Self::Dict4x4_100 | Self::Dict5x5_100 | Self::Dict6x6_100 | Self::Dict7x7_100 => 100,
            Self::Dict4x4_250 | Self::Dict5x5_250 | Self::Dict6x6_250 | Self::Dict7x7_250 => 250,
            Self::Dict4x4_1000 | Self::Dict5x5_1000 | Self::Dict6x6_1000 | Self::Dict7x7_1000 => {
                1000
            }
        }
    }

    fn max_correction_bits(self) -> u8 {
        match self {
            Self::Dict4x4_50 | Self::Dict4x4_100 | Self::Dict4x4_250 => 1,
            Self::Dict4x4_1000 => 0,
            Self::Dict5x5_50 | Self::Dict5x5_100 => 3,
            Self::Dict5x5_250 | Self::Dict5x5_1000 => 2,
            Self::Dict6x6_50 => 6,
            Self::Dict6x6_100 | Self::Dict6x6_250 => 5,
            Self::Dict6x6_1000 => 4,
            Self::Dict7x7_50 => 9,
            Self::Dict7x7_100 | Self::Dict7x7_250 => 8,
            Self::Dict7x7_1000 => 6,
        }
    }

    /// Resolve to a [`Dictionary`] with whatever prefix of its codes is available.
    ///
    /// Predefined dictionaries of one grid size are prefixes of a single
    /// family table, so `DICT_4X4_50` is the first 50 codes of
    /// `DICT_4X4_1000`.
    pub fn dictionary(self) -> Dictionary {
        let len = self.count();
        let family = family_codes(self.marker_size());
        Dictionary {
            name: self.name(),
            marker_size: self.marker_size(),
            max_correction_bits: self.max_correction_bits(),
            len,
            codes: &family[..family.len().min(len)],
        }
    }
}

impl fmt::Display for PredefinedDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PredefinedDictionary {
    type Err = ArucoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let key = upper.strip_prefix("DICT_").unwrap_or(&upper);
        Self::ALL
            .into_iter()
            .find(|d| &d.name()[5..] == key)
            .ok_or_else(|| ArucoError::UnknownDictionary(s.to_string()))
    }
}
