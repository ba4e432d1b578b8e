/// Borrowed row-major 8-bit grayscale raster.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl<'a> From<&'a image::GrayImage> for GrayImageView<'a> {
    fn from(img: &'a image::GrayImage) -> Self {
        Self {
            width: img.width() as usize,
            height: img.height() as usize,
            data: img.as_raw(),
        }
    }
}

impl GrayImageView<'_> {
    /// Pixel at signed coordinates; out-of-bounds reads return black.
    #[inline]
    pub fn get_clamped(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.data[y as usize * self.width + x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn view_borrows_the_image_buffer() {
        let mut img = image::GrayImage::from_pixel(3, 2, Luma([255]));
        img.put_pixel(1, 1, Luma([9]));
        let view = GrayImageView::from(&img);
        assert_eq!((view.width, view.height), (3, 2));
        assert_eq!(view.get_clamped(1, 1), 9);
        assert_eq!(view.get_clamped(2, 1), 255);
        assert_eq!(view.get_clamped(-1, 0), 0);
        assert_eq!(view.get_clamped(3, 0), 0);
    }
}
