use aruco_sheets_aruco::ArucoError;

/// Errors produced while composing a marker sheet.
#[derive(thiserror::Error, Debug)]
pub enum SheetError {
    #[error(transparent)]
    Marker(#[from] ArucoError),
    #[error("marker resolution must be > 0")]
    ZeroResolution,
    #[error("placement size must be a positive finite length, got {size_mm} mm")]
    InvalidSize { size_mm: f64 },
    #[error(
        "{size_mm} mm markers do not fit the printable area ({printable_width_mm} x {printable_height_mm} mm)"
    )]
    MarkerTooLarge {
        size_mm: f64,
        printable_width_mm: f64,
        printable_height_mm: f64,
    },
    #[error("page geometry leaves no printable area")]
    InvalidGeometry,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Pdf(#[from] lopdf::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
