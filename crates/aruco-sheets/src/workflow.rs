//! End-to-end helpers shared by the CLI and embedding applications.

use crate::live::{run_live, DirectorySink, ImageSequence, LiveConfig, LiveError, LiveSummary};
use crate::print::{SheetConfig, SheetError, SheetOutput};
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the workflow helpers.
#[derive(thiserror::Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error(transparent)]
    Live(#[from] LiveError),
}

/// Load a sheet config (or use the built-in one) and compose it.
///
/// `size_mm` and `output_dir` override the config values when given.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
pub fn compose_from_config(
    config_path: Option<&Path>,
    size_mm: Option<f64>,
    output_dir: Option<&Path>,
) -> Result<SheetOutput, WorkflowError> {
    let mut cfg = match config_path {
        Some(path) => {
            log::info!("loading sheet config {}", path.display());
            SheetConfig::load_json(path)?
        }
        None => SheetConfig::default(),
    };
    if let Some(size_mm) = size_mm {
        cfg.size_mm = size_mm;
    }
    if let Some(dir) = output_dir {
        cfg.output_dir = dir.to_path_buf();
    }
    Ok(cfg.run()?)
}

/// Run the live loop over the images in `frames_dir`, writing annotated
/// frames to `out_dir`.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
pub fn detect_directory(
    frames_dir: &Path,
    out_dir: &Path,
    config: &LiveConfig,
) -> Result<LiveSummary, WorkflowError> {
    let detector = config.build_detector()?;
    let frames = ImageSequence::open(frames_dir)?;
    let mut sink = DirectorySink::create(out_dir)?;
    Ok(run_live(frames, &detector, &mut sink, config)?)
}

/// Run the live loop on camera `index`, showing frames in a HighGUI window
/// until Escape (or `config.cancel_key`) is pressed.
#[cfg(feature = "opencv")]
pub fn detect_camera(index: i32, config: &LiveConfig) -> Result<LiveSummary, WorkflowError> {
    use crate::live::{HighGuiWindow, OpenCvCamera};

    let detector = config.build_detector()?;
    let camera = OpenCvCamera::open(index)?;
    let mut window = HighGuiWindow::new("aruco-sheets")?;
    Ok(run_live(camera, &detector, &mut window, config)?)
}
