//! Marker detection in a full frame.
//!
//! Pipeline:
//! 1. global Otsu threshold,
//! 2. 4-connected dark components (the marker's black border plus the dark
//!    bits touching it form one component),
//! 3. size / aspect / fill filter on the component bounding box,
//! 4. four extreme points of the component as the outer quad,
//! 5. `decode_marker_in_quad` against the dictionary.

use crate::LiveError;
use aruco_sheets_aruco::{
    decode_marker_in_quad, otsu_threshold, Dictionary, Matcher, QuadDecodeConfig,
};
use aruco_sheets_core::GrayImageView;
use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::region_labelling::{connected_components, Connectivity};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Half a pixel diagonal: moves a boundary pixel center onto the outer edge.
const CORNER_EXPAND_PX: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Candidate filtering and decoding parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Minimum bounding-box side of a candidate, in pixels.
    pub min_side_px: u32,
    /// Maximum long/short ratio of the bounding box.
    pub max_aspect: f32,
    /// Accepted range of dark pixels over bounding-box area.
    pub min_fill: f32,
    pub max_fill: f32,
    /// Components closer than this to the frame edge are dropped.
    pub edge_margin_px: u32,
    /// Hamming threshold, capped by the dictionary's correction capacity.
    pub max_hamming: u8,
    pub quad: QuadDecodeConfig,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            min_side_px: 12,
            max_aspect: 2.0,
            min_fill: 0.2,
            max_fill: 0.95,
            edge_margin_px: 3,
            max_hamming: 1,
            quad: QuadDecodeConfig::default(),
        }
    }
}

/// One detected marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub id: u32,
    /// Outer corners in image pixels, clockwise, starting at the marker's own
    /// top-left corner.
    pub corners: [Point2<f32>; 4],
    pub rotation: u8,
    pub hamming: u8,
}

impl Detection {
    pub fn center(&self) -> Point2<f32> {
        let sum = self
            .corners
            .iter()
            .fold(Vector2::zeros(), |acc, c| acc + c.coords);
        Point2::from(sum / 4.0)
    }
}

/// Detects markers of one dictionary in grayscale frames.
#[derive(Clone, Debug)]
pub struct MarkerDetector {
    matcher: Matcher,
    params: DetectorParams,
}

struct Component {
    pixels: Vec<(u32, u32)>,
    min: (u32, u32),
    max: (u32, u32),
}

impl MarkerDetector {
    /// Build a detector; dictionaries with no embedded codes are rejected.
    pub fn new(dict: Dictionary, params: DetectorParams) -> Result<Self, LiveError> {
        if dict.codes.is_empty() {
            return Err(LiveError::EmptyDictionary(dict.name));
        }
        if !dict.is_complete() {
            log::warn!(
                "{}: only ids 0..{} are embedded, other ids will not be reported",
                dict.name,
                dict.codes.len()
            );
        }
        Ok(Self {
            matcher: Matcher::new(dict, params.max_hamming),
            params,
        })
    }

    pub fn dictionary(&self) -> Dictionary {
        self.matcher.dictionary()
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Detect markers in an RGB frame.
    pub fn detect_rgb(&self, frame: &RgbImage) -> Vec<Detection> {
        self.detect(&image::imageops::grayscale(frame))
    }

    /// Detect markers in a grayscale frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, img),
            fields(width = img.width(), height = img.height())
        )
    )]
    pub fn detect(&self, img: &GrayImage) -> Vec<Detection> {
        if img.width() == 0 || img.height() == 0 {
            return Vec::new();
        }
        let thr = otsu_threshold(img.as_raw());
        let components = dark_components(img, thr);
        let view = GrayImageView::from(img);

        let mut out = Vec::new();
        for comp in components.iter().filter(|c| self.keep(c, img)) {
            let Some(quad) = quad_corners(&comp.pixels) else {
                continue;
            };
            let Some(dec) = decode_marker_in_quad(&view, &quad, &self.params.quad, &self.matcher)
            else {
                continue;
            };
            let r = dec.rotation as usize;
            out.push(Detection {
                id: dec.id,
                corners: std::array::from_fn(|k| quad[(r + k) % 4]),
                rotation: dec.rotation,
                hamming: dec.hamming,
            });
        }
        log::trace!(
            "{} dark components, {} markers (threshold {thr})",
            components.len(),
            out.len()
        );
        out
    }

    fn keep(&self, c: &Component, img: &GrayImage) -> bool {
        let p = &self.params;
        let bw = c.max.0 - c.min.0 + 1;
        let bh = c.max.1 - c.min.1 + 1;
        if bw.min(bh) < p.min_side_px {
            return false;
        }
        let m = p.edge_margin_px;
        if c.min.0 < m
            || c.min.1 < m
            || c.max.0 + m >= img.width()
            || c.max.1 + m >= img.height()
        {
            return false;
        }
        if bw.max(bh) as f32 > p.max_aspect * bw.min(bh) as f32 {
            return false;
        }
        let fill = c.pixels.len() as f32 / (bw as f32 * bh as f32);
        (p.min_fill..=p.max_fill).contains(&fill)
    }
}

/// 4-connected components of pixels at or below `thr`.
fn dark_components(img: &GrayImage, thr: u8) -> Vec<Component> {
    let mask = threshold(img, thr, ThresholdType::BinaryInverted);
    let labels = connected_components(&mask, Connectivity::Four, Luma([0u8]));

    // Labels are 1..=count; 0 is background.
    let count = labels.pixels().map(|p| p.0[0]).max().unwrap_or(0) as usize;
    let mut out: Vec<Component> = (0..count)
        .map(|_| Component {
            pixels: Vec::new(),
            min: (u32::MAX, u32::MAX),
            max: (0, 0),
        })
        .collect();
    for (x, y, label) in labels.enumerate_pixels() {
        let Some(comp) = (label.0[0] as usize)
            .checked_sub(1)
            .and_then(|k| out.get_mut(k))
        else {
            continue;
        };
        comp.pixels.push((x, y));
        comp.min = (comp.min.0.min(x), comp.min.1.min(y));
        comp.max = (comp.max.0.max(x), comp.max.1.max(y));
    }
    out.retain(|c| !c.pixels.is_empty());
    out
}

/// Outer quad of a blob from its extreme points, clockwise in image space.
///
/// `A` is the pixel farthest from the centroid, `C` the pixel farthest from
/// `A`, and `B` / `D` the pixels farthest from line `AC` on either side.
fn quad_corners(pixels: &[(u32, u32)]) -> Option<[Point2<f32>; 4]> {
    if pixels.len() < 4 {
        return None;
    }
    let pts: Vec<Point2<f32>> = pixels
        .iter()
        .map(|&(x, y)| Point2::new(x as f32 + 0.5, y as f32 + 0.5))
        .collect();
    let n = pts.len() as f32;
    let centroid = Point2::from(pts.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords) / n);

    let farthest_from = |q: Point2<f32>| {
        pts.iter()
            .copied()
            .fold((q, -1.0f32), |best, p| {
                let d = (p - q).norm_squared();
                if d > best.1 {
                    (p, d)
                } else {
                    best
                }
            })
            .0
    };
    let a = farthest_from(centroid);
    let c = farthest_from(a);
    let ac = c - a;
    let side = |p: &Point2<f32>| ac.x * (p.y - a.y) - ac.y * (p.x - a.x);

    let (mut b, mut b_side) = (a, 0.0f32);
    let (mut d, mut d_side) = (a, 0.0f32);
    for p in &pts {
        let s = side(p);
        if s > b_side {
            (b, b_side) = (*p, s);
        }
        if s < d_side {
            (d, d_side) = (*p, s);
        }
    }
    if b_side <= 0.0 || d_side >= 0.0 {
        return None;
    }

    let mut quad = [a, b, c, d].map(|p| {
        let dir = p - centroid;
        let len = dir.norm();
        if len > 0.0 {
            p + dir * (CORNER_EXPAND_PX / len)
        } else {
            p
        }
    });
    // Ascending angle is clockwise with y pointing down.
    quad.sort_by(|p, q| {
        let ap = (p.y - centroid.y).atan2(p.x - centroid.x);
        let aq = (q.y - centroid.y).atan2(q.x - centroid.x);
        ap.total_cmp(&aq)
    });
    Some(quad)
}
