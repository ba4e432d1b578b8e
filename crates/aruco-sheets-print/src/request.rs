use serde::{Deserialize, Serialize};

/// One marker to print: grid size class, dictionary id and raster side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerRequest {
    /// Inner bits per side (4 for 4x4 markers).
    pub marker_size: u32,
    pub id: u32,
    /// Raw marker raster side in pixels, before the border is added.
    pub resolution: u32,
}

impl MarkerRequest {
    pub fn new(marker_size: u32, id: u32, resolution: u32) -> Self {
        Self {
            marker_size,
            id,
            resolution,
        }
    }
}
