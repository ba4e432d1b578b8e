//! Stderr logging for the `aruco-sheets` binaries.
//!
//! Records from the workspace crates are printed at the configured level as
//! `[elapsed LEVEL module] message`; records from third-party crates (PDF
//! and image codecs) only from `warn` up. Binaries call `init_with_level`
//! once at startup, or `init_tracing` with the `tracing` feature.

use std::fmt::Arguments;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const WORKSPACE_PREFIX: &str = "aruco_sheets";
const FOREIGN_LEVEL: Level = Level::Warn;

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

fn is_workspace_target(target: &str) -> bool {
    target.starts_with(WORKSPACE_PREFIX)
}

/// `aruco_sheets_print::sheet` -> `print::sheet`.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix("aruco_sheets_")
        .or_else(|| target.strip_prefix("aruco_sheets::"))
        .unwrap_or(target)
}

fn format_line(elapsed_s: f64, level: Level, target: &str, args: &Arguments<'_>) -> String {
    format!(
        "[{elapsed_s:7.3}s {level:>5} {}] {args}",
        short_target(target)
    )
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let level = metadata.level();
        if is_workspace_target(metadata.target()) {
            level <= self.level
        } else {
            level <= self.level && level <= FOREIGN_LEVEL
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger at `level`.
///
/// Only the first call installs the logger; later calls return `Ok(())`
/// and leave the original level in place.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing-subscriber` formatter filtered by `RUST_LOG`
/// (default `info`). `json = true` emits one JSON object per event.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
