/// Errors returned by dictionary lookup and marker rendering.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ArucoError {
    #[error("unknown dictionary `{0}`")]
    UnknownDictionary(String),
    #[error("no predefined dictionary for {marker_size}x{marker_size} markers with {count} ids")]
    UnsupportedMarkerSize { marker_size: u32, count: u32 },
    #[error("marker id {id} is out of range for {dictionary} ({len} ids)")]
    InvalidId {
        dictionary: &'static str,
        id: u32,
        len: usize,
    },
    #[error("codes for {dictionary} id {id} are not embedded in this build")]
    NotEmbedded { dictionary: &'static str, id: u32 },
    #[error("marker side of {side_px}px cannot hold {cells} cells")]
    InvalidSize { side_px: usize, cells: usize },
}
