//! Export and rendering errors.

use thiserror::Error;

/// Failure fetching one external asset. Recovered per element.
#[derive(Debug, Error)]
pub enum AssetFetchError {
    #[error("Asset not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unsupported image format: {0}")]
    Unsupported(String),
}

pub type AssetFetchResult<T> = Result<T, AssetFetchError>;

/// Terminal failure converting a vector document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parsing failed: {0}")]
    SvgParse(String),
    #[error("Failed to allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Errors from an export call.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Superseded while in flight. Callers drop these silently.
    #[error("Export superseded by a newer request")]
    Stale,
}

pub type ExportResult<T> = Result<T, ExportError>;

impl ExportError {
    pub fn is_stale(&self) -> bool {
        matches!(self, ExportError::Stale)
    }
}

/// Errors from a thumbnail job.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Thumbnail superseded by a newer request")]
    Stale,
}

pub type ThumbnailResult<T> = Result<T, ThumbnailError>;

impl From<ExportError> for ThumbnailError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Render(e) => ThumbnailError::Render(e),
            ExportError::Stale => ThumbnailError::Stale,
        }
    }
}
