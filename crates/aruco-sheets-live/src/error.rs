use aruco_sheets_aruco::ArucoError;
use std::path::PathBuf;

/// Errors raised by frame sources, sinks and the live loop.
#[derive(thiserror::Error, Debug)]
pub enum LiveError {
    #[error(transparent)]
    Dictionary(#[from] ArucoError),
    #[error("dictionary {0} has no embedded codes to match against")]
    EmptyDictionary(&'static str),
    #[error("no readable frames in {}", .0.display())]
    NoFrames(PathBuf),
    #[error("camera {0} could not be opened")]
    CameraUnavailable(i32),
    #[error("frame buffer does not match its {width}x{height} size")]
    BadFrame { width: u32, height: u32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[cfg(feature = "opencv")]
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
}
