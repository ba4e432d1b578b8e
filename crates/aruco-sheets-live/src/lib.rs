//! Live ArUco detection over a stream of frames.
//!
//! The loop is deliberately thin: pull a frame, find markers, draw them,
//! hand the annotated frame to a sink and poll the sink for a cancel key.
//! Sources and sinks are traits so the same loop drives a webcam window
//! (feature `opencv`) or a directory of images in and annotated PNGs out.

mod detector;
mod error;
mod overlay;
mod run;
mod sink;
mod source;

#[cfg(feature = "opencv")]
mod opencv_backend;

pub use detector::{Detection, DetectorParams, MarkerDetector};
pub use error::LiveError;
pub use overlay::{draw_detections, draw_detections_with, OverlayStyle};
pub use run::{run_live, LiveConfig, LiveSummary, StopReason, ESC_KEY};
pub use sink::{DirectorySink, FrameSink};
pub use source::{FrameSource, ImageSequence};

#[cfg(feature = "opencv")]
pub use opencv_backend::{HighGuiWindow, OpenCvCamera};
