//! PrintKit Render Library
//!
//! Export pipeline and preview rendering for PrintKit designs. Both paths
//! emit elements through the same [`SvgEmitter`] and shape table.

mod cancel;
mod config;
mod error;
mod export;
mod fetch;
mod print;
mod raster;
mod renderer;
mod svg;
mod thumbnail;

pub use cancel::CancellationToken;
pub use config::{DEFAULT_RESOLUTION, ExportConfig};
pub use error::{
    AssetFetchError, AssetFetchResult, ExportError, ExportResult, RenderError, RenderResult,
    ThumbnailError, ThumbnailResult,
};
pub use export::{Exporter, PageExport, PageInput, SvgExport};
pub use fetch::{AssetFetcher, BoxFuture, FetchedAsset, FsAssetFetcher, MemoryAssetFetcher};
pub use print::{PrintOutput, page_size_mm, print_document};
pub use raster::{encode_png, rasterize, render_png};
pub use renderer::{RenderContext, Renderer, SvgPreviewRenderer};
pub use svg::{Placement, SvgEmitter, escape_xml};
pub use thumbnail::{Thumbnail, ThumbnailJob, ThumbnailService};
