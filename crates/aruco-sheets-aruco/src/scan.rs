//! Marker decoding from image-space quads.

use crate::threshold::otsu_threshold;
use crate::Matcher;
use aruco_sheets_core::{homography_from_4pt, GrayImageView, Homography};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Decoder configuration for reading one marker from a quad.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadDecodeConfig {
    /// Marker border width in cells (OpenCV uses 1).
    pub border_bits: usize,
    /// Fraction of a cell to ignore near its edges when sampling.
    pub inset_frac: f32,
    /// Require border-black ratio >= this.
    pub min_border_score: f32,
    /// Quads whose shortest side is below this many pixels are skipped.
    pub min_side_px: f32,
}

impl Default for QuadDecodeConfig {
    fn default() -> Self {
        Self {
            border_bits: 1,
            inset_frac: 0.15,
            min_border_score: 0.85,
            min_side_px: 12.0,
        }
    }
}

/// One marker decoded from a quad.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadDecode {
    pub id: u32,
    /// Rotation `0..=3` such that `observed == rotate(dict_code, rotation)`.
    ///
    /// With quad corners given clockwise, the marker's own top-left corner
    /// is quad corner `rotation`.
    pub rotation: u8,
    pub hamming: u8,
    pub border_score: f32,
    /// Observed inner bits (row-major, white=1).
    pub code: u64,
}

/// Canonical square side, in sampling units per cell.
const UNITS_PER_CELL: f32 = 10.0;
const THRESH_SUBDIV: usize = 3;

/// Decode a single marker from an image quad.
///
/// `quad` holds the marker's outer corners (including the black border) in
/// clockwise image order, starting anywhere.
pub fn decode_marker_in_quad(
    image: &GrayImageView<'_>,
    quad: &[Point2<f32>; 4],
    cfg: &QuadDecodeConfig,
    matcher: &Matcher,
) -> Option<QuadDecode> {
    let bits = matcher.dictionary().marker_size;
    let cells = bits + 2 * cfg.border_bits;
    if bits * bits > 64 || cells == 0 {
        return None;
    }
    if shortest_side(quad) < cfg.min_side_px {
        return None;
    }

    let side = cells as f32 * UNITS_PER_CELL;
    let square = [
        Point2::new(0.0, 0.0),
        Point2::new(side, 0.0),
        Point2::new(side, side),
        Point2::new(0.0, side),
    ];
    let h = homography_from_4pt(&square, quad)?;

    let samples = sample_cells(image, &h, cells, cfg.inset_frac)?;
    let thr_samples = sample_threshold_grid(image, &h, cells);
    let thr = if thr_samples.is_empty() {
        otsu_threshold(&samples)
    } else {
        otsu_threshold(&thr_samples)
    };

    let (code, border_score) = read_code(&samples, thr, cells, bits, cfg.border_bits);
    if border_score < cfg.min_border_score {
        return None;
    }

    let m = matcher.match_code(code)?;
    Some(QuadDecode {
        id: m.id,
        rotation: m.rotation,
        hamming: m.hamming,
        border_score,
        code,
    })
}

fn shortest_side(quad: &[Point2<f32>; 4]) -> f32 {
    (0..4)
        .map(|i| (quad[(i + 1) % 4] - quad[i]).norm())
        .fold(f32::INFINITY, f32::min)
}

/// Mean intensity around each cell center; `None` if any center falls
/// outside the image.
fn sample_cells(
    image: &GrayImageView<'_>,
    h: &Homography,
    cells: usize,
    inset_frac: f32,
) -> Option<Vec<u8>> {
    let inset = inset_frac.clamp(0.0, 0.45) * UNITS_PER_CELL;
    let mut out = Vec::with_capacity(cells * cells);
    for cy in 0..cells {
        for cx in 0..cells {
            // Average the four inset quarter points of the cell plus its center.
            let x0 = cx as f32 * UNITS_PER_CELL;
            let y0 = cy as f32 * UNITS_PER_CELL;
            let c = 0.5 * UNITS_PER_CELL;
            let pts = [
                (x0 + c, y0 + c),
                (x0 + inset, y0 + inset),
                (x0 + UNITS_PER_CELL - inset, y0 + inset),
                (x0 + UNITS_PER_CELL - inset, y0 + UNITS_PER_CELL - inset),
                (x0 + inset, y0 + UNITS_PER_CELL - inset),
            ];
            let mut sum = 0u32;
            for (x, y) in pts {
                let q = h.apply(Point2::new(x, y));
                sum += sample_mean_3x3(image, q.x, q.y)? as u32;
            }
            out.push((sum / pts.len() as u32) as u8);
        }
    }
    Some(out)
}

fn sample_threshold_grid(image: &GrayImageView<'_>, h: &Homography, cells: usize) -> Vec<u8> {
    let grid = cells * THRESH_SUBDIV;
    let step = cells as f32 * UNITS_PER_CELL / grid as f32;
    let mut out = Vec::with_capacity(grid * grid);
    for ty in 0..grid {
        for tx in 0..grid {
            let p = Point2::new((tx as f32 + 0.5) * step, (ty as f32 + 0.5) * step);
            let q = h.apply(p);
            if let Some(v) = sample_mean_3x3(image, q.x, q.y) {
                out.push(v);
            }
        }
    }
    out
}

/// Split cell samples into the inner code and the border-black ratio.
fn read_code(samples: &[u8], thr: u8, cells: usize, bits: usize, border: usize) -> (u64, f32) {
    let mut border_ok = 0u32;
    let mut border_total = 0u32;
    let mut code = 0u64;

    for cy in 0..cells {
        for cx in 0..cells {
            let is_white = samples[cy * cells + cx] > thr;
            let inner =
                (border..border + bits).contains(&cx) && (border..border + bits).contains(&cy);
            if inner {
                if is_white {
                    code |= 1u64 << ((cy - border) * bits + (cx - border));
                }
            } else {
                border_total += 1;
                if !is_white {
                    border_ok += 1;
                }
            }
        }
    }

    let border_score = if border_total == 0 {
        1.0
    } else {
        border_ok as f32 / border_total as f32
    };
    (code, border_score)
}

fn sample_mean_3x3(img: &GrayImageView<'_>, x: f32, y: f32) -> Option<u8> {
    let ix = x.floor() as i32;
    let iy = y.floor() as i32;
    if ix - 1 < 0 || iy - 1 < 0 || ix + 1 >= img.width as i32 || iy + 1 >= img.height as i32 {
        return None;
    }

    let mut sum = 0u32;
    for dy in -1..=1 {
        for dx in -1..=1 {
            sum += img.get_clamped(ix + dx, iy + dy) as u32;
        }
    }
    Some((sum / 9) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render_marker, PredefinedDictionary};
    use image::{imageops, GrayImage, Luma};

    /// Paste `marker` into a white canvas at `(ox, oy)`.
    fn on_canvas(marker: &GrayImage, side: u32, ox: i64, oy: i64) -> GrayImage {
        let mut canvas = GrayImage::from_pixel(side, side, Luma([255]));
        imageops::replace(&mut canvas, marker, ox, oy);
        canvas
    }

    fn square_quad(ox: f32, oy: f32, s: f32) -> [Point2<f32>; 4] {
        [
            Point2::new(ox, oy),
            Point2::new(ox + s, oy),
            Point2::new(ox + s, oy + s),
            Point2::new(ox, oy + s),
        ]
    }

    #[test]
    fn decodes_axis_aligned_marker() {
        let dict = PredefinedDictionary::Dict4x4_50.dictionary();
        let matcher = Matcher::new(dict, 0);
        let marker = render_marker(&dict, 17, 60, 1).expect("render");
        let img = on_canvas(&marker, 100, 20, 20);

        let det = decode_marker_in_quad(
            &GrayImageView::from(&img),
            &square_quad(20.0, 20.0, 60.0),
            &QuadDecodeConfig::default(),
            &matcher,
        )
        .expect("decode marker");
        assert_eq!(det.id, 17);
        assert_eq!(det.rotation, 0);
        assert_eq!(det.hamming, 0);
        assert!(det.border_score > 0.99);
    }

    #[test]
    fn quad_starting_at_top_right_reports_rotation_three() {
        let dict = PredefinedDictionary::Dict4x4_50.dictionary();
        let matcher = Matcher::new(dict, 0);
        let marker = render_marker(&dict, 5, 60, 1).expect("render");
        let img = on_canvas(&marker, 100, 20, 20);

        let q = square_quad(20.0, 20.0, 60.0);
        let shifted = [q[1], q[2], q[3], q[0]];
        let view = GrayImageView::from(&img);
        let det = decode_marker_in_quad(&view, &shifted, &QuadDecodeConfig::default(), &matcher)
            .expect("decode marker");
        assert_eq!(det.id, 5);
        assert_eq!(det.rotation, 3);
        // Corner `rotation` of the quad is the marker's own top-left.
        assert_eq!(shifted[det.rotation as usize], q[0]);
    }

    #[test]
    fn blank_quad_is_rejected() {
        let dict = PredefinedDictionary::Dict4x4_50.dictionary();
        let matcher = Matcher::new(dict, 0);
        let img = GrayImage::from_pixel(100, 100, Luma([255]));
        let det = decode_marker_in_quad(
            &GrayImageView::from(&img),
            &square_quad(20.0, 20.0, 60.0),
            &QuadDecodeConfig::default(),
            &matcher,
        );
        assert!(det.is_none());
    }

    #[test]
    fn tiny_or_out_of_frame_quads_are_skipped() {
        let dict = PredefinedDictionary::Dict4x4_50.dictionary();
        let matcher = Matcher::new(dict, 0);
        let img = GrayImage::from_pixel(100, 100, Luma([255]));
        let view = GrayImageView::from(&img);
        let cfg = QuadDecodeConfig::default();
        for quad in [square_quad(10.0, 10.0, 8.0), square_quad(60.0, 60.0, 60.0)] {
            assert!(decode_marker_in_quad(&view, &quad, &cfg, &matcher).is_none());
        }
    }
}
