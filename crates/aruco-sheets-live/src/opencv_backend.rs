//! Webcam capture and HighGUI display through OpenCV.

use crate::{FrameSink, LiveError};
use image::RgbImage;
use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::prelude::*;
use opencv::{highgui, imgproc, videoio};
use std::time::Duration;

/// Frames from a capture device, converted to RGB.
pub struct OpenCvCamera {
    index: i32,
    capture: videoio::VideoCapture,
    bgr: Mat,
}

impl OpenCvCamera {
    pub fn open(index: i32) -> Result<Self, LiveError> {
        let capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(LiveError::CameraUnavailable(index));
        }
        log::info!("opened camera {index}");
        Ok(Self {
            index,
            capture,
            bgr: Mat::default(),
        })
    }

    fn grab(&mut self) -> Result<Option<RgbImage>, LiveError> {
        if !self.capture.read(&mut self.bgr)? || self.bgr.empty() {
            return Ok(None);
        }
        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&self.bgr, &mut rgb, imgproc::COLOR_BGR2RGB)?;
        let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
        let frame = RgbImage::from_raw(width, height, rgb.data_bytes()?.to_vec())
            .ok_or(LiveError::BadFrame { width, height })?;
        Ok(Some(frame))
    }
}

impl Iterator for OpenCvCamera {
    type Item = Result<RgbImage, LiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.grab() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                log::warn!("camera {} returned no frame", self.index);
                None
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// A HighGUI window; destroyed on drop.
pub struct HighGuiWindow {
    name: String,
}

impl HighGuiWindow {
    pub fn new(name: impl Into<String>) -> Result<Self, LiveError> {
        let name = name.into();
        highgui::named_window(&name, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self { name })
    }
}

impl FrameSink for HighGuiWindow {
    fn show(&mut self, frame: &RgbImage) -> Result<(), LiveError> {
        let (w, h) = frame.dimensions();
        let mut rgb =
            Mat::new_rows_cols_with_default(h as i32, w as i32, CV_8UC3, Scalar::all(0.0))?;
        rgb.data_bytes_mut()?.copy_from_slice(frame.as_raw());
        let mut bgr = Mat::default();
        imgproc::cvt_color_def(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR)?;
        highgui::imshow(&self.name, &bgr)?;
        Ok(())
    }

    fn wait_key(&mut self, timeout: Duration) -> Result<Option<i32>, LiveError> {
        let delay = timeout.as_millis().clamp(1, i32::MAX as u128) as i32;
        let key = highgui::wait_key(delay)?;
        Ok((key >= 0).then_some(key & 0xff))
    }
}

impl Drop for HighGuiWindow {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(&self.name) {
            log::warn!("failed to close window {}: {e}", self.name);
        }
    }
}
