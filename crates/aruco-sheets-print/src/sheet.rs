//! End-to-end sheet composition: rasters, PNG files, layout and PDF.

use crate::{
    bordered_marker, layout_sheet, BorderedMarkerParams, MarkerRequest, PageGeometry,
    PdfSheetWriter, SheetError, SheetLayout,
};
use image::GrayImage;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Default name of the combined document.
pub const DEFAULT_PDF_NAME: &str = "ArucoMarkers.pdf";

/// File name of the intermediate PNG for marker `id`.
pub fn marker_file_name(id: u32) -> String {
    format!("aruco_marker_{id}_with_border.png")
}

/// Files produced by a composition run.
#[derive(Clone, Debug)]
pub struct SheetOutput {
    pub pdf_path: PathBuf,
    /// One entry per request, in request order.
    pub marker_paths: Vec<PathBuf>,
    pub layout: SheetLayout,
}

/// Configurable sheet composition.
#[derive(Clone, Debug)]
pub struct SheetComposer {
    geometry: PageGeometry,
    params: BorderedMarkerParams,
    pdf_name: String,
}

impl Default for SheetComposer {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::a4(),
            params: BorderedMarkerParams::default(),
            pdf_name: DEFAULT_PDF_NAME.to_string(),
        }
    }
}

impl SheetComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_params(mut self, params: BorderedMarkerParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_pdf_name(mut self, name: impl Into<String>) -> Self {
        self.pdf_name = name.into();
        self
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Render, lay out and write every request into `out_dir`.
    ///
    /// Nothing is written unless every marker renders and the layout is
    /// valid. Identical requests are rendered once and share one PDF image.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, requests, out_dir), fields(markers = requests.len()))
    )]
    pub fn compose(
        &self,
        requests: &[MarkerRequest],
        size_mm: f64,
        out_dir: impl AsRef<Path>,
    ) -> Result<SheetOutput, SheetError> {
        let out_dir = out_dir.as_ref();
        let layout = layout_sheet(requests.len(), size_mm, &self.geometry)?;

        let mut distinct: Vec<MarkerRequest> = Vec::new();
        let mut rendered: HashMap<MarkerRequest, GrayImage> = HashMap::new();
        for req in requests {
            if !rendered.contains_key(req) {
                if distinct.iter().any(|d| d.id == req.id) {
                    log::warn!(
                        "id {} requested with different size or resolution; {} is overwritten",
                        req.id,
                        marker_file_name(req.id)
                    );
                }
                rendered.insert(*req, bordered_marker(req, &self.params)?);
                distinct.push(*req);
            }
        }

        fs::create_dir_all(out_dir)?;
        for req in &distinct {
            if let Some(img) = rendered.get(req) {
                let path = out_dir.join(marker_file_name(req.id));
                img.save(&path)?;
                log::debug!("wrote {}", path.display());
            }
        }
        let marker_paths = requests
            .iter()
            .map(|req| out_dir.join(marker_file_name(req.id)))
            .collect();

        let mut writer = PdfSheetWriter::new(self.geometry);
        let mut image_ids = HashMap::new();
        for req in &distinct {
            if let Some(img) = rendered.get(req) {
                image_ids.insert(*req, writer.add_image(img)?);
            }
        }
        for page in &layout.pages {
            let items: Vec<_> = page
                .iter()
                .filter_map(|p| {
                    let id = image_ids.get(&requests[p.request_index])?;
                    Some((*id, *p))
                })
                .collect();
            writer.add_page(&items)?;
        }
        let pdf_path = out_dir.join(&self.pdf_name);
        writer.save(&pdf_path)?;

        log::info!(
            "composed {} markers ({} distinct) onto {} page(s) -> {}",
            requests.len(),
            rendered.len(),
            layout.page_count(),
            pdf_path.display()
        );
        Ok(SheetOutput {
            pdf_path,
            marker_paths,
            layout,
        })
    }
}

/// Compose `requests` at `size_mm` onto A4 pages in `out_dir` with defaults.
pub fn compose_sheet(
    requests: &[MarkerRequest],
    size_mm: f64,
    out_dir: impl AsRef<Path>,
) -> Result<SheetOutput, SheetError> {
    SheetComposer::default().compose(requests, size_mm, out_dir)
}
