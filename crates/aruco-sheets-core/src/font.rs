//! Hershey-style stroke font for marker labels and detection overlays.
//!
//! Glyphs are polylines on a grid where the cap line is `y = 0` and the
//! baseline is `y = CAP_HEIGHT`. Only the characters needed for labels
//! (`0-9`, `-`, `=`, `i`, `d`, space) carry strokes; anything else advances
//! the pen without drawing.
//!
//! Measurement follows the usual stroke-font convention: text height is the
//! scaled cap height plus half the pen thickness, width is the scaled sum of
//! advances plus the pen thickness.

use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut, Canvas};
use imageproc::point::Point;

/// Cap height in glyph units.
pub const CAP_HEIGHT: f64 = 21.0;
/// Descender depth below the baseline in glyph units.
pub const DESCENT: f64 = 9.0;

/// Measured extent of a rendered string, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextSize {
    pub width: i32,
    /// Height above the baseline.
    pub height: i32,
    /// Depth below the baseline.
    pub baseline: i32,
}

struct Glyph {
    advance: f64,
    strokes: &'static [&'static [(f64, f64)]],
}

const SPACE: Glyph = Glyph {
    advance: 16.0,
    strokes: &[],
};

#[rustfmt::skip]
fn glyph(c: char) -> Glyph {
    let (advance, strokes): (f64, &'static [&'static [(f64, f64)]]) = match c {
        '0' => (20.0, &[&[
            (9.0, 0.0), (6.0, 1.0), (4.0, 4.0), (3.0, 9.0), (3.0, 12.0), (4.0, 17.0),
            (6.0, 20.0), (9.0, 21.0), (11.0, 21.0), (14.0, 20.0), (16.0, 17.0),
            (17.0, 12.0), (17.0, 9.0), (16.0, 4.0), (14.0, 1.0), (11.0, 0.0), (9.0, 0.0),
        ]]),
        '1' => (20.0, &[&[(6.0, 4.0), (8.0, 3.0), (11.0, 0.0), (11.0, 21.0)]]),
        '2' => (20.0, &[&[
            (4.0, 5.0), (4.0, 4.0), (5.0, 2.0), (6.0, 1.0), (8.0, 0.0), (12.0, 0.0),
            (14.0, 1.0), (15.0, 2.0), (16.0, 4.0), (16.0, 6.0), (15.0, 8.0),
            (13.0, 11.0), (3.0, 21.0), (17.0, 21.0),
        ]]),
        '3' => (20.0, &[&[
            (5.0, 0.0), (16.0, 0.0), (10.0, 8.0), (13.0, 8.0), (15.0, 9.0), (16.0, 10.0),
            (17.0, 13.0), (17.0, 15.0), (16.0, 18.0), (14.0, 20.0), (11.0, 21.0),
            (8.0, 21.0), (5.0, 20.0), (4.0, 19.0), (3.0, 17.0),
        ]]),
        '4' => (20.0, &[
            &[(13.0, 0.0), (3.0, 14.0), (18.0, 14.0)],
            &[(13.0, 0.0), (13.0, 21.0)],
        ]),
        '5' => (20.0, &[&[
            (15.0, 0.0), (5.0, 0.0), (4.0, 9.0), (5.0, 8.0), (8.0, 7.0), (11.0, 7.0),
            (14.0, 8.0), (16.0, 10.0), (17.0, 13.0), (17.0, 15.0), (16.0, 18.0),
            (14.0, 20.0), (11.0, 21.0), (8.0, 21.0), (5.0, 20.0), (4.0, 19.0), (3.0, 17.0),
        ]]),
        '6' => (20.0, &[&[
            (16.0, 3.0), (15.0, 1.0), (12.0, 0.0), (10.0, 0.0), (7.0, 1.0), (5.0, 4.0),
            (4.0, 9.0), (4.0, 14.0), (5.0, 18.0), (7.0, 20.0), (10.0, 21.0),
            (11.0, 21.0), (14.0, 20.0), (16.0, 18.0), (17.0, 15.0), (17.0, 14.0),
            (16.0, 11.0), (14.0, 9.0), (11.0, 8.0), (10.0, 8.0), (7.0, 9.0),
            (5.0, 11.0), (4.0, 14.0),
        ]]),
        '7' => (20.0, &[&[(3.0, 0.0), (17.0, 0.0), (7.0, 21.0)]]),
        '8' => (20.0, &[&[
            (8.0, 0.0), (5.0, 1.0), (4.0, 3.0), (4.0, 5.0), (5.0, 7.0), (7.0, 8.0),
            (11.0, 9.0), (14.0, 10.0), (16.0, 12.0), (17.0, 14.0), (17.0, 17.0),
            (16.0, 19.0), (15.0, 20.0), (12.0, 21.0), (8.0, 21.0), (5.0, 20.0),
            (4.0, 19.0), (3.0, 17.0), (3.0, 14.0), (4.0, 12.0), (6.0, 10.0), (9.0, 9.0),
            (13.0, 8.0), (15.0, 7.0), (16.0, 5.0), (16.0, 3.0), (15.0, 1.0),
            (12.0, 0.0), (8.0, 0.0),
        ]]),
        '9' => (20.0, &[&[
            (16.0, 7.0), (15.0, 10.0), (13.0, 12.0), (10.0, 13.0), (9.0, 13.0),
            (6.0, 12.0), (4.0, 10.0), (3.0, 7.0), (3.0, 6.0), (4.0, 3.0), (6.0, 1.0),
            (9.0, 0.0), (10.0, 0.0), (13.0, 1.0), (15.0, 3.0), (16.0, 7.0),
            (16.0, 12.0), (15.0, 17.0), (13.0, 20.0), (10.0, 21.0), (8.0, 21.0),
            (5.0, 20.0), (4.0, 18.0),
        ]]),
        '-' => (20.0, &[&[(4.0, 12.0), (16.0, 12.0)]]),
        '=' => (20.0, &[&[(4.0, 9.0), (16.0, 9.0)], &[(4.0, 15.0), (16.0, 15.0)]]),
        'i' => (8.0, &[&[(4.0, 0.0), (4.0, 2.0)], &[(4.0, 7.0), (4.0, 21.0)]]),
        'd' => (19.0, &[
            &[(15.0, 0.0), (15.0, 21.0)],
            &[
                (15.0, 10.0), (13.0, 8.0), (11.0, 7.0), (8.0, 7.0), (6.0, 8.0), (4.0, 10.0),
                (3.0, 13.0), (3.0, 15.0), (4.0, 18.0), (6.0, 20.0), (8.0, 21.0),
                (11.0, 21.0), (13.0, 20.0), (15.0, 18.0),
            ],
        ]),
        _ => return SPACE,
    };
    Glyph { advance, strokes }
}

/// Measure `text` at `scale` with pen `thickness` (pixels).
pub fn text_size(text: &str, scale: f64, thickness: u32) -> TextSize {
    let advance: f64 = text.chars().map(|c| glyph(c).advance).sum();
    let t = thickness as f64;
    TextSize {
        width: (advance * scale + t).round() as i32,
        height: (CAP_HEIGHT * scale + ((thickness + 1) / 2) as f64).round() as i32,
        baseline: (DESCENT * scale + t / 2.0).round() as i32,
    }
}

/// Render `text` with its bottom-left (baseline) corner at `origin`.
///
/// Strokes outside the canvas are clipped.
pub fn draw_text_mut<C>(
    canvas: &mut C,
    text: &str,
    origin: (i32, i32),
    scale: f64,
    thickness: u32,
    color: C::Pixel,
) where
    C: Canvas,
{
    let mut pen_x = origin.0 as f64 + thickness as f64 / 2.0;
    let base_y = origin.1 as f64;
    let to_canvas = |pen_x: f64, (gx, gy): (f64, f64)| {
        (
            (pen_x + gx * scale) as f32,
            (base_y - (CAP_HEIGHT - gy) * scale) as f32,
        )
    };
    for c in text.chars() {
        let g = glyph(c);
        for stroke in g.strokes {
            for seg in stroke.windows(2) {
                let a = to_canvas(pen_x, seg[0]);
                let b = to_canvas(pen_x, seg[1]);
                draw_stroke_mut(canvas, a, b, thickness, color);
            }
        }
        pen_x += g.advance * scale;
    }
}

/// Draw a line segment with a round pen of width `thickness`.
///
/// Hairlines (`thickness <= 1`) go through the Bresenham segment; wider pens
/// fill the segment's quad and cap both ends with discs.
pub fn draw_stroke_mut<C>(
    canvas: &mut C,
    a: (f32, f32),
    b: (f32, f32),
    thickness: u32,
    color: C::Pixel,
) where
    C: Canvas,
{
    if thickness <= 1 {
        draw_line_segment_mut(canvas, a, b, color);
        return;
    }

    let half = thickness as f32 / 2.0;
    let radius = (thickness / 2) as i32;
    let round = |p: (f32, f32)| (p.0.round() as i32, p.1.round() as i32);

    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = dx.hypot(dy);
    if len > f32::EPSILON {
        let (nx, ny) = (-dy / len * half, dx / len * half);
        let quad = [
            (a.0 + nx, a.1 + ny),
            (b.0 + nx, b.1 + ny),
            (b.0 - nx, b.1 - ny),
            (a.0 - nx, a.1 - ny),
        ]
        .map(|p| {
            let (x, y) = round(p);
            Point::new(x, y)
        });
        if quad[0] != quad[3] {
            draw_polygon_mut(canvas, &quad, color);
        }
        draw_filled_circle_mut(canvas, round(b), radius, color);
    }
    draw_filled_circle_mut(canvas, round(a), radius, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    const PAPER: Luma<u8> = Luma([255]);
    const INK: Luma<u8> = Luma([0]);

    fn ink_pixels(img: &GrayImage) -> Vec<(i32, i32)> {
        img.enumerate_pixels()
            .filter(|(_, _, p)| **p == INK)
            .map(|(x, y, _)| (x as i32, y as i32))
            .collect()
    }

    #[test]
    fn text_height_grows_with_scale() {
        let small = text_size("42", 1.0, 1);
        let large = text_size("42", 2.0, 1);
        assert_eq!(small.height, 22);
        assert!(large.height > small.height);
        assert!(large.width > small.width);
    }

    #[test]
    fn rendered_digits_stay_inside_measured_box() {
        let scale = 3.0;
        let thickness = 2;
        let size = text_size("0123456789", scale, thickness);
        let origin = (10, 100);

        let mut img = GrayImage::from_pixel(700, 160, PAPER);
        draw_text_mut(&mut img, "0123456789", origin, scale, thickness, INK);
        let ink = ink_pixels(&img);
        assert!(!ink.is_empty());

        let min_x = ink.iter().map(|p| p.0).min().unwrap_or_default();
        let max_x = ink.iter().map(|p| p.0).max().unwrap_or_default();
        let min_y = ink.iter().map(|p| p.1).min().unwrap_or_default();
        let max_y = ink.iter().map(|p| p.1).max().unwrap_or_default();

        assert!(min_x >= origin.0);
        assert!(max_x <= origin.0 + size.width);
        assert!(min_y >= origin.1 - size.height - 1);
        assert!(max_y <= origin.1 + thickness as i32);
    }

    #[test]
    fn unknown_characters_only_advance() {
        let mut img = GrayImage::from_pixel(80, 60, PAPER);
        draw_text_mut(&mut img, "??", (0, 50), 1.0, 1, INK);
        assert!(ink_pixels(&img).is_empty());
        assert_eq!(text_size("??", 1.0, 1).width, text_size("  ", 1.0, 1).width);
    }

    #[test]
    fn hairline_is_connected() {
        let mut img = GrayImage::from_pixel(30, 12, PAPER);
        draw_stroke_mut(&mut img, (0.0, 0.0), (20.0, 7.0), 1, INK);
        let ink = ink_pixels(&img);
        for x in 0..=20 {
            assert!(ink.iter().any(|&(px, _)| px == x), "gap at column {x}");
        }
    }

    #[test]
    fn wide_pen_covers_its_width() {
        let mut img = GrayImage::from_pixel(40, 40, PAPER);
        draw_stroke_mut(&mut img, (5.0, 20.0), (35.0, 20.0), 6, INK);
        for y in 18..=22 {
            assert_eq!(*img.get_pixel(20, y), INK, "row {y}");
        }
        assert_eq!(*img.get_pixel(20, 10), PAPER);
        assert_eq!(*img.get_pixel(20, 30), PAPER);
    }

    #[test]
    fn strokes_off_canvas_are_clipped() {
        let mut img = GrayImage::from_pixel(20, 20, PAPER);
        draw_stroke_mut(&mut img, (-10.0, 5.0), (30.0, 5.0), 3, INK);
        draw_text_mut(&mut img, "88", (-15, 40), 2.0, 2, INK);
        assert_eq!(*img.get_pixel(10, 5), INK);
    }
}
