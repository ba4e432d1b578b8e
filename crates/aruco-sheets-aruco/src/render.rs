//! Marker bitmap synthesis.

use crate::{ArucoError, Dictionary};
use image::{GrayImage, Luma};

/// Render marker `id` of `dict` as a `side_px × side_px` raster.
///
/// The marker is a grid of `marker_size + 2 * border_bits` cells: a black
/// border of `border_bits` cells around the inner bits (white for 1, black
/// for 0). The cell grid is scaled to `side_px` with nearest-neighbour
/// sampling, so `side_px` need not be a multiple of the cell count.
pub fn render_marker(
    dict: &Dictionary,
    id: u32,
    side_px: usize,
    border_bits: usize,
) -> Result<GrayImage, ArucoError> {
    let code = dict.code(id)?;
    let n = dict.marker_size;
    let cells = n + 2 * border_bits;
    if side_px < cells {
        return Err(ArucoError::InvalidSize { side_px, cells });
    }

    let cell_of = |px: usize| px * cells / side_px;
    let is_white = |cx: usize, cy: usize| {
        let inner = border_bits..border_bits + n;
        if !inner.contains(&cx) || !inner.contains(&cy) {
            return false;
        }
        let idx = (cy - border_bits) * n + (cx - border_bits);
        (code >> idx) & 1 == 1
    };

    let side = side_px as u32;
    Ok(GrayImage::from_fn(side, side, |x, y| {
        if is_white(cell_of(x as usize), cell_of(y as usize)) {
            Luma([255])
        } else {
            Luma([0])
        }
    }))
}
