//! Detection overlay drawing.

use crate::Detection;
use aruco_sheets_core::font::{draw_stroke_mut, draw_text_mut, text_size};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Colors and sizes used by [`draw_detections`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    pub outline: Rgb<u8>,
    pub first_corner: Rgb<u8>,
    pub text: Rgb<u8>,
    pub line_thickness: u32,
    pub corner_half_px: i32,
    pub text_scale: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            outline: Rgb([0, 255, 0]),
            first_corner: Rgb([255, 0, 0]),
            text: Rgb([0, 0, 255]),
            line_thickness: 1,
            corner_half_px: 3,
            text_scale: 0.5,
        }
    }
}

/// Draw every detection with the default style.
pub fn draw_detections(img: &mut RgbImage, detections: &[Detection]) {
    draw_detections_with(img, detections, &OverlayStyle::default());
}

/// Outline each marker, mark its first corner and print `id=N` at its center.
pub fn draw_detections_with(img: &mut RgbImage, detections: &[Detection], style: &OverlayStyle) {
    for det in detections {
        if style.line_thickness <= 1 {
            let outline = det.corners.map(|c| Point::new(c.x, c.y));
            if outline[0] != outline[3] {
                draw_hollow_polygon_mut(img, &outline, style.outline);
            }
        } else {
            for k in 0..4 {
                let a = det.corners[k];
                let b = det.corners[(k + 1) % 4];
                draw_stroke_mut(img, (a.x, a.y), (b.x, b.y), style.line_thickness, style.outline);
            }
        }

        let c0 = det.corners[0];
        let r = style.corner_half_px.max(0);
        let side = (2 * r + 1) as u32;
        let (cx, cy) = (c0.x.round() as i32, c0.y.round() as i32);
        let corner = Rect::at(cx - r, cy - r).of_size(side, side);
        draw_filled_rect_mut(img, corner, style.first_corner);

        let label = format!("id={}", det.id);
        let thickness = 2;
        let size = text_size(&label, style.text_scale, thickness);
        let center = det.center();
        let origin = (
            center.x.round() as i32 - size.width / 2,
            center.y.round() as i32 + size.height / 2,
        );
        draw_text_mut(img, &label, origin, style.text_scale, thickness, style.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn detection() -> Detection {
        Detection {
            id: 4,
            corners: [
                Point2::new(20.0, 20.0),
                Point2::new(80.0, 20.0),
                Point2::new(80.0, 80.0),
                Point2::new(20.0, 80.0),
            ],
            rotation: 0,
            hamming: 0,
        }
    }

    #[test]
    fn overlay_uses_all_three_colors() {
        let mut img = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        draw_detections(&mut img, &[detection()]);
        let style = OverlayStyle::default();

        assert_eq!(*img.get_pixel(50, 20), style.outline);
        assert_eq!(*img.get_pixel(20, 20), style.first_corner);
        assert!(img.pixels().any(|p| *p == style.text));
    }

    #[test]
    fn detections_near_the_border_are_clipped() {
        let mut img = RgbImage::new(30, 30);
        let mut det = detection();
        det.corners[0] = Point2::new(-10.0, -10.0);
        draw_detections(&mut img, &[det]);
    }

    #[test]
    fn thick_outline_covers_both_sides_of_the_edge() {
        let mut img = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let style = OverlayStyle {
            line_thickness: 4,
            ..OverlayStyle::default()
        };
        draw_detections_with(&mut img, &[detection()], &style);
        for y in 19..=21 {
            assert_eq!(*img.get_pixel(50, y), style.outline, "row {y}");
        }
        assert_eq!(*img.get_pixel(50, 26), Rgb([255, 255, 255]));
    }

    #[test]
    fn empty_detection_list_leaves_frame_untouched() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([7, 7, 7]));
        let before = img.clone();
        draw_detections(&mut img, &[]);
        assert_eq!(img, before);
    }
}
