//! Frame sinks: where annotated frames go and where cancel keys come from.

use crate::LiveError;
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Display target of the live loop.
pub trait FrameSink {
    /// Present an annotated frame.
    fn show(&mut self, frame: &RgbImage) -> Result<(), LiveError>;

    /// Wait up to `timeout` for a key press; `None` when nothing was pressed.
    fn wait_key(&mut self, timeout: Duration) -> Result<Option<i32>, LiveError>;
}

/// Writes every annotated frame as `frame_NNNNN.png`; never reports a key.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: usize,
}

impl DirectorySink {
    /// Create `dir` (and parents) if needed.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self, LiveError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: 0 })
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:05}.png"))
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl FrameSink for DirectorySink {
    fn show(&mut self, frame: &RgbImage) -> Result<(), LiveError> {
        let path = self.frame_path(self.written);
        frame.save(&path)?;
        self.written += 1;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    fn wait_key(&mut self, _timeout: Duration) -> Result<Option<i32>, LiveError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_numbered_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = DirectorySink::create(dir.path().join("out")).expect("sink");
        let frame = RgbImage::new(8, 8);
        sink.show(&frame).expect("first");
        sink.show(&frame).expect("second");
        assert_eq!(sink.written(), 2);
        assert!(sink.frame_path(0).exists());
        assert!(sink.frame_path(1).ends_with("frame_00001.png"));
        assert_eq!(sink.wait_key(Duration::from_millis(10)).expect("key"), None);
    }
}
