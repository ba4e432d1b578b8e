//! Bordered marker raster: white ring, dashed cut guide and id label.
//!
//! Layout of a bordered marker of resolution `r` and size class `n`:
//!
//! - `border = r / (n + 2)` (integer division),
//! - canvas side `r + 2 * border + 2`, white,
//! - the raw `r × r` marker pasted at `(border + 1, border + 1)`,
//! - a dashed outline on the outermost pixel ring (2 px black, 2 px white),
//! - the decimal id in the bottom-right corner of the white ring.

use crate::{MarkerRequest, SheetError};
use aruco_sheets_aruco::{render_marker, PredefinedDictionary};
use aruco_sheets_core::font::{draw_text_mut, text_size};
use image::{imageops, GrayImage, Luma};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Period of the dashed outline, in pixels.
pub const DASH_PERIOD_PX: u32 = 4;
/// Black run at the start of every dash period.
pub const DASH_ON_PX: u32 = 2;

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);
const LABEL_SCALE_STEP: f64 = 0.1;

/// Parameters shared by every marker of a sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderedMarkerParams {
    /// Id count of the predefined dictionary picked for each size class.
    pub dictionary_count: u32,
    /// Minimum label height as a fraction of the marker resolution.
    pub label_height_frac: f64,
    /// Label offset from the right and bottom edges, fraction of resolution.
    pub label_margin_frac: f64,
}

impl Default for BorderedMarkerParams {
    fn default() -> Self {
        Self {
            dictionary_count: 250,
            label_height_frac: 0.07,
            label_margin_frac: 0.02,
        }
    }
}

/// White ring width for a marker of `resolution` pixels and `marker_size` bits.
#[inline]
pub fn border_thickness(resolution: u32, marker_size: u32) -> u32 {
    resolution / (marker_size + 2)
}

/// Side of the bordered canvas.
#[inline]
pub fn canvas_side(resolution: u32, marker_size: u32) -> u32 {
    resolution + 2 * border_thickness(resolution, marker_size) + 2
}

/// Stroke width of the id label.
#[inline]
pub fn label_thickness(resolution: u32) -> u32 {
    (resolution / 500).max(1)
}

/// Smallest font scale in `0.1` steps whose text height reaches `target_height`.
pub fn fit_label_scale(text: &str, target_height: f64, thickness: u32) -> f64 {
    if !target_height.is_finite() {
        return LABEL_SCALE_STEP;
    }
    let mut steps = 1u32;
    loop {
        let scale = steps as f64 * LABEL_SCALE_STEP;
        if text_size(text, scale, thickness).height as f64 >= target_height {
            return scale;
        }
        steps += 1;
    }
}

/// Render the bordered, labelled marker for `req`.
///
/// The dictionary is the predefined one of size class `req.marker_size` with
/// `params.dictionary_count` ids. Unknown size classes and out-of-range ids
/// surface as [`SheetError::Marker`].
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(params), fields(id = req.id, resolution = req.resolution))
)]
pub fn bordered_marker(
    req: &MarkerRequest,
    params: &BorderedMarkerParams,
) -> Result<GrayImage, SheetError> {
    if req.resolution == 0 {
        return Err(SheetError::ZeroResolution);
    }
    let dict = PredefinedDictionary::for_marker_size(req.marker_size, params.dictionary_count)?
        .dictionary();
    let marker = render_marker(&dict, req.id, req.resolution as usize, 1)?;

    let res = req.resolution;
    let offset = border_thickness(res, req.marker_size) + 1;
    let side = canvas_side(res, req.marker_size);

    let mut canvas = GrayImage::from_pixel(side, side, WHITE);
    imageops::replace(&mut canvas, &marker, offset as i64, offset as i64);

    draw_dashed_outline(&mut canvas);
    draw_label(&mut canvas, req, params);
    Ok(canvas)
}

fn draw_dashed_outline(canvas: &mut GrayImage) {
    let side = canvas.width();
    for start in (0..side).step_by(DASH_PERIOD_PX as usize) {
        for i in start..(start + DASH_ON_PX).min(side) {
            canvas.put_pixel(i, 0, BLACK);
            canvas.put_pixel(i, side - 1, BLACK);
            canvas.put_pixel(0, i, BLACK);
            canvas.put_pixel(side - 1, i, BLACK);
        }
    }
}

fn draw_label(canvas: &mut GrayImage, req: &MarkerRequest, params: &BorderedMarkerParams) {
    let res = req.resolution as f64;
    let text = req.id.to_string();
    let thickness = label_thickness(req.resolution);
    let scale = fit_label_scale(&text, params.label_height_frac * res, thickness);
    let size = text_size(&text, scale, thickness);

    let side = canvas.width() as i32;
    let margin = (params.label_margin_frac * res).floor() as i32;
    let origin = (side - size.width - margin, side - margin);
    draw_text_mut(canvas, &text, origin, scale, thickness, BLACK);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_black(img: &GrayImage, x: u32, y: u32) -> bool {
        img.get_pixel(x, y).0[0] == 0
    }

    #[test]
    fn canvas_grows_by_twice_the_border_plus_two() {
        let img = bordered_marker(&MarkerRequest::new(4, 2, 1000), &BorderedMarkerParams::default())
            .expect("bordered marker");
        assert_eq!(border_thickness(1000, 4), 166);
        assert_eq!(img.dimensions(), (1334, 1334));
        assert_eq!(canvas_side(1000, 4), 1334);
    }

    #[test]
    fn marker_sits_inside_white_ring() {
        let img = bordered_marker(&MarkerRequest::new(4, 1, 600), &BorderedMarkerParams::default())
            .expect("bordered marker");
        let b = border_thickness(600, 4);
        // Ring pixel just outside the marker, marker border pixel just inside.
        assert!(!is_black(&img, b, b));
        assert!(is_black(&img, b + 1, b + 1));
        assert!(is_black(&img, b + 600, b + 600));
        assert!(!is_black(&img, b + 601, b + 601));
    }

    #[test]
    fn outline_is_dashed_with_period_four_on_every_edge() {
        let img = bordered_marker(&MarkerRequest::new(4, 2, 1000), &BorderedMarkerParams::default())
            .expect("bordered marker");
        let side = img.width();
        for i in 1..side - 1 {
            let expected = i % DASH_PERIOD_PX < DASH_ON_PX;
            assert_eq!(is_black(&img, i, 0), expected, "top edge at {i}");
            assert_eq!(is_black(&img, i, side - 1), expected, "bottom edge at {i}");
            assert_eq!(is_black(&img, 0, i), expected, "left edge at {i}");
            assert_eq!(is_black(&img, side - 1, i), expected, "right edge at {i}");
        }
    }

    #[test]
    fn label_scale_is_the_first_step_reaching_target_height() {
        let target = 70.0;
        let scale = fit_label_scale("17", target, 2);
        assert!(text_size("17", scale, 2).height as f64 >= target);
        assert!((text_size("17", scale - 0.1, 2).height as f64) < target);
        assert_eq!(fit_label_scale("17", 0.0, 1), 0.1);
    }

    #[test]
    fn label_is_drawn_in_bottom_right_corner() {
        let res = 1000;
        let img = bordered_marker(&MarkerRequest::new(4, 7, res), &BorderedMarkerParams::default())
            .expect("bordered marker");
        let side = img.width();
        let margin = 20;
        let thickness = label_thickness(res);
        let scale = fit_label_scale("7", 70.0, thickness);
        let size = text_size("7", scale, thickness);

        let x0 = side - margin - size.width as u32;
        let y0 = side - margin - size.height as u32;
        let ink = (y0..side - margin)
            .flat_map(|y| (x0..side - margin).map(move |x| (x, y)))
            .filter(|&(x, y)| is_black(&img, x, y))
            .count();
        assert!(ink > 0, "label pixels expected in the bottom-right box");

        // Top-left of the white ring stays clean.
        let b = border_thickness(res, 4);
        for y in 2..b {
            for x in 2..b {
                assert!(!is_black(&img, x, y));
            }
        }
    }

    #[test]
    fn invalid_requests_come_from_the_dictionary_layer() {
        let params = BorderedMarkerParams::default();
        assert!(matches!(
            bordered_marker(&MarkerRequest::new(4, 250, 200), &params),
            Err(SheetError::Marker(_))
        ));
        assert!(matches!(
            bordered_marker(&MarkerRequest::new(3, 0, 200), &params),
            Err(SheetError::Marker(_))
        ));
        assert!(matches!(
            bordered_marker(&MarkerRequest::new(4, 0, 0), &params),
            Err(SheetError::ZeroResolution)
        ));
    }

    #[cfg(not(feature = "opencv"))]
    #[test]
    fn larger_families_need_the_opencv_tables() {
        use aruco_sheets_aruco::ArucoError;

        let params = BorderedMarkerParams::default();
        assert!(matches!(
            bordered_marker(&MarkerRequest::new(5, 3, 200), &params),
            Err(SheetError::Marker(ArucoError::NotEmbedded { id: 3, .. }))
        ));
        assert!(matches!(
            bordered_marker(&MarkerRequest::new(4, 200, 200), &params),
            Err(SheetError::Marker(ArucoError::NotEmbedded { id: 200, .. }))
        ));
    }

    #[cfg(feature = "opencv")]
    #[test]
    fn opencv_tables_render_every_family() {
        let params = BorderedMarkerParams::default();
        for req in [MarkerRequest::new(4, 200, 500), MarkerRequest::new(5, 3, 500)] {
            let img = bordered_marker(&req, &params).expect("bordered marker");
            let side = canvas_side(req.resolution, req.marker_size);
            assert_eq!(img.dimensions(), (side, side));
            let b = border_thickness(req.resolution, req.marker_size);
            assert!(is_black(&img, b + 1, b + 1));
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let req = MarkerRequest::new(4, 9, 300);
        let params = BorderedMarkerParams::default();
        let a = bordered_marker(&req, &params).expect("first");
        let b = bordered_marker(&req, &params).expect("second");
        assert_eq!(a, b);
    }
}
