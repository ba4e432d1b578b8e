//! `aruco-sheets` command-line tool.

use aruco_sheets::aruco::builtins::complete_dictionaries;
use aruco_sheets::aruco::PredefinedDictionary;
use aruco_sheets::workflow::{compose_from_config, detect_directory};
use aruco_sheets::LiveConfig;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "aruco-sheets")]
#[command(about = "Print ArUco marker sheets and detect markers in frames")]
#[command(version)]
struct Cli {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose bordered markers into PNG files and an A4 PDF.
    Sheet {
        /// JSON sheet config; the built-in marker list is used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Printed marker side in millimetres.
        #[arg(long)]
        size_mm: Option<f64>,

        /// Output directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Detect markers in a directory of frames (or a camera).
    Detect {
        /// Directory of input frames, read in file-name order.
        #[arg(long, required_unless_present = "camera")]
        frames: Option<PathBuf>,

        /// Directory for annotated frames.
        #[arg(long, default_value = "detections")]
        out: PathBuf,

        /// Capture device index (requires the `opencv` feature).
        #[arg(long, conflicts_with = "frames")]
        camera: Option<i32>,

        /// Predefined dictionary, e.g. DICT_4X4_50.
        #[arg(long, default_value = "DICT_4X4_50")]
        dictionary: PredefinedDictionary,
    },
    /// List dictionaries whose codes are fully embedded.
    Dictionaries,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;

    match cli.command {
        Commands::Sheet {
            config,
            size_mm,
            out,
        } => run_sheet(config, size_mm, out),
        Commands::Detect {
            frames,
            out,
            camera,
            dictionary,
        } => run_detect(frames, out, camera, dictionary),
        Commands::Dictionaries => {
            for dict in complete_dictionaries() {
                println!(
                    "{} ({} ids, {}x{})",
                    dict.name, dict.len, dict.marker_size, dict.marker_size
                );
            }
            Ok(())
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LevelFilter) -> CliResult<()> {
    aruco_sheets::core::init_with_level(level)?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(_level: LevelFilter) -> CliResult<()> {
    tracing_log::LogTracer::init()?;
    aruco_sheets::core::init_tracing(false);
    Ok(())
}

fn run_sheet(config: Option<PathBuf>, size_mm: Option<f64>, out: Option<PathBuf>) -> CliResult<()> {
    let output = compose_from_config(config.as_deref(), size_mm, out.as_deref())?;
    println!(
        "{} marker(s) on {} page(s): {}",
        output.marker_paths.len(),
        output.layout.page_count(),
        output.pdf_path.display()
    );
    Ok(())
}

fn run_detect(
    frames: Option<PathBuf>,
    out: PathBuf,
    camera: Option<i32>,
    dictionary: PredefinedDictionary,
) -> CliResult<()> {
    let config = LiveConfig {
        dictionary,
        ..LiveConfig::default()
    };

    let summary = match (frames, camera) {
        (Some(frames), _) => detect_directory(&frames, &out, &config)?,
        (None, Some(index)) => detect_camera(index, &config)?,
        (None, None) => return Err("either --frames or --camera is required".into()),
    };
    println!(
        "{} frame(s), {} detection(s), stopped: {:?}",
        summary.frames, summary.detections, summary.stop
    );
    Ok(())
}

#[cfg(feature = "opencv")]
fn detect_camera(index: i32, config: &LiveConfig) -> CliResult<aruco_sheets::LiveSummary> {
    Ok(aruco_sheets::workflow::detect_camera(index, config)?)
}

#[cfg(not(feature = "opencv"))]
fn detect_camera(_index: i32, _config: &LiveConfig) -> CliResult<aruco_sheets::LiveSummary> {
    Err("camera capture requires building with the `opencv` feature".into())
}
