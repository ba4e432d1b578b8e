//! Frame sources.

use crate::LiveError;
use image::{ImageFormat, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

/// A lazy stream of RGB frames; a source error ends the live loop.
pub trait FrameSource: Iterator<Item = Result<RgbImage, LiveError>> {}

impl<T> FrameSource for T where T: Iterator<Item = Result<RgbImage, LiveError>> {}

/// Image files of a directory, in file-name order.
#[derive(Clone, Debug)]
pub struct ImageSequence {
    paths: std::vec::IntoIter<PathBuf>,
}

impl ImageSequence {
    /// List the images in `dir`; files with an unknown image extension are skipped.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LiveError> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && ImageFormat::from_path(&path).is_ok() {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(LiveError::NoFrames(dir.to_path_buf()));
        }
        paths.sort();
        log::info!("{} frame(s) in {}", paths.len(), dir.display());
        Ok(Self::from_paths(paths))
    }

    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            paths: paths.into_iter(),
        }
    }

    /// Frames not yet read.
    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl Iterator for ImageSequence {
    type Item = Result<RgbImage, LiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        log::debug!("reading {}", path.display());
        Some(
            image::open(&path)
                .map(|img| img.to_rgb8())
                .map_err(LiveError::from),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn frames_come_back_sorted_by_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        for (name, v) in [("b.png", 20u8), ("a.png", 10), ("c.png", 30)] {
            RgbImage::from_pixel(4, 4, Rgb([v, v, v]))
                .save(dir.path().join(name))
                .expect("save");
        }
        fs::write(dir.path().join("notes.txt"), "not a frame").expect("write");

        let seq = ImageSequence::open(dir.path()).expect("open");
        assert_eq!(seq.remaining(), 3);
        let firsts: Vec<u8> = seq
            .map(|f| f.expect("frame").get_pixel(0, 0).0[0])
            .collect();
        assert_eq!(firsts, vec![10, 20, 30]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            ImageSequence::open(dir.path()),
            Err(LiveError::NoFrames(_))
        ));
    }

    #[test]
    fn unreadable_file_surfaces_as_error_item() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.png");
        fs::write(&path, b"not png").expect("write");
        let mut seq = ImageSequence::from_paths(vec![path]);
        assert!(matches!(seq.next(), Some(Err(LiveError::Image(_)))));
        assert!(seq.next().is_none());
    }
}
