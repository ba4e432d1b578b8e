//! JSON sheet configuration.

use crate::{
    BorderedMarkerParams, MarkerRequest, PageGeometry, SheetComposer, SheetError, SheetOutput,
    DEFAULT_PDF_NAME,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_size_mm() -> f64 {
    70.0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("ArucoMarkers")
}

/// Everything needed to produce one marker sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    pub markers: Vec<MarkerRequest>,
    /// Printed side of every marker, in millimetres.
    #[serde(default = "default_size_mm")]
    pub size_mm: f64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub pdf_name: Option<String>,
    #[serde(default)]
    pub page: Option<PageGeometry>,
    #[serde(default)]
    pub marker: Option<BorderedMarkerParams>,
}

impl Default for SheetConfig {
    /// Fifteen pairs of 4x4 markers 2 and 1 at 1000 px, printed at 70 mm.
    fn default() -> Self {
        let markers = (0..15)
            .flat_map(|_| [MarkerRequest::new(4, 2, 1000), MarkerRequest::new(4, 1, 1000)])
            .collect();
        Self {
            markers,
            size_mm: default_size_mm(),
            output_dir: default_output_dir(),
            pdf_name: None,
            page: None,
            marker: None,
        }
    }
}

impl SheetConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SheetError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the PDF file name.
    pub fn pdf_name(&self) -> &str {
        self.pdf_name.as_deref().unwrap_or(DEFAULT_PDF_NAME)
    }

    /// Build a composer, applying overrides from the config.
    pub fn build_composer(&self) -> SheetComposer {
        let mut composer = SheetComposer::new().with_pdf_name(self.pdf_name());
        if let Some(page) = self.page {
            composer = composer.with_geometry(page);
        }
        if let Some(marker) = self.marker.clone() {
            composer = composer.with_params(marker);
        }
        composer
    }

    /// Compose the configured sheet into `output_dir`.
    pub fn run(&self) -> Result<SheetOutput, SheetError> {
        self.build_composer()
            .compose(&self.markers, self.size_mm, &self.output_dir)
    }
}
