//! The cancellable detection loop.

use crate::{
    draw_detections, DetectorParams, FrameSink, FrameSource, LiveError, MarkerDetector,
};
use aruco_sheets_aruco::PredefinedDictionary;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Key code of Escape as reported by HighGUI.
pub const ESC_KEY: i32 = 27;

/// Live loop settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    pub dictionary: PredefinedDictionary,
    /// Key that stops the loop.
    pub cancel_key: i32,
    /// How long the sink waits for a key after each frame.
    pub frame_interval_ms: u64,
    pub detector: DetectorParams,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            dictionary: PredefinedDictionary::Dict4x4_50,
            cancel_key: ESC_KEY,
            frame_interval_ms: 10,
            detector: DetectorParams::default(),
        }
    }
}

impl LiveConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn build_detector(&self) -> Result<MarkerDetector, LiveError> {
        MarkerDetector::new(self.dictionary.dictionary(), self.detector.clone())
    }
}

/// Why the loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The cancel key was pressed.
    Cancelled,
    /// The frame source ran dry.
    Exhausted,
}

/// Totals of one live run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveSummary {
    pub frames: usize,
    pub detections: usize,
    pub stop: StopReason,
}

/// Pull frames until the source ends or the cancel key is pressed.
///
/// Each frame is searched for markers, the ids and corners are logged, the
/// detections are drawn onto the frame and the result is shown. A source
/// error ends the loop with that error.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
pub fn run_live<S, K>(
    frames: S,
    detector: &MarkerDetector,
    sink: &mut K,
    config: &LiveConfig,
) -> Result<LiveSummary, LiveError>
where
    S: FrameSource,
    K: FrameSink + ?Sized,
{
    let mut summary = LiveSummary {
        frames: 0,
        detections: 0,
        stop: StopReason::Exhausted,
    };

    for frame in frames {
        let mut frame = frame?;
        let detections = detector.detect_rgb(&frame);
        for det in &detections {
            let c = &det.corners;
            log::info!(
                "frame {}: id {} corners [({:.1}, {:.1}), ({:.1}, {:.1}), ({:.1}, {:.1}), ({:.1}, {:.1})]",
                summary.frames,
                det.id,
                c[0].x,
                c[0].y,
                c[1].x,
                c[1].y,
                c[2].x,
                c[2].y,
                c[3].x,
                c[3].y
            );
        }

        draw_detections(&mut frame, &detections);
        sink.show(&frame)?;
        summary.frames += 1;
        summary.detections += detections.len();

        if sink.wait_key(config.frame_interval())? == Some(config.cancel_key) {
            summary.stop = StopReason::Cancelled;
            break;
        }
    }

    log::info!(
        "live loop stopped ({:?}) after {} frame(s), {} detection(s)",
        summary.stop,
        summary.frames,
        summary.detections
    );
    Ok(summary)
}
