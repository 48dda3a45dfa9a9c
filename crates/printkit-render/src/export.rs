//! Export pipeline.
//!
//! Turns a page's element list into a vector document at a given resolution,
//! plus raster, printable and thumbnail derivatives. Image fetching is the
//! only asynchronous step: all fetches run concurrently, then the document is
//! assembled serially in z-order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::join_all;
use kurbo::Size;
use printkit_core::shapes::ShapeTable;
use printkit_core::{Element, SizeUnit};

use crate::cancel::CancellationToken;
use crate::config::ExportConfig;
use crate::error::{ExportResult, RenderResult};
use crate::fetch::AssetFetcher;
use crate::print::{PrintOutput, print_document};
use crate::raster;
use crate::svg::SvgEmitter;

/// A page to export.
#[derive(Debug, Clone, Copy)]
pub struct PageInput<'a> {
    pub elements: &'a [Element],
    /// Canvas size in physical units.
    pub canvas: Size,
    pub unit: SizeUnit,
}

impl<'a> PageInput<'a> {
    pub fn new(elements: &'a [Element], canvas: Size, unit: SizeUnit) -> Self {
        Self { elements, canvas, unit }
    }
}

/// Vector document plus which image sources could not be embedded.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgExport {
    pub svg: String,
    pub embedded: usize,
    /// Sources left as external references.
    pub fallbacks: Vec<String>,
}

/// Every derivative of one page.
#[derive(Debug, Clone)]
pub struct PageExport {
    pub svg: SvgExport,
    pub png: Vec<u8>,
    pub print: PrintOutput,
}

/// Runs exports against an injected shape table.
#[derive(Debug, Clone)]
pub struct Exporter {
    emitter: SvgEmitter,
    config: ExportConfig,
}

impl Exporter {
    pub fn new(shapes: Arc<ShapeTable>, config: ExportConfig) -> Self {
        Self {
            emitter: SvgEmitter::new(shapes, config.text_inset),
            config,
        }
    }

    /// Standard shape catalog and default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ShapeTable::standard(), ExportConfig::default())
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn emitter(&self) -> &SvgEmitter {
        &self.emitter
    }

    /// Vector document with images embedded as data URIs.
    ///
    /// A source that fails to fetch or is not a recognisable image keeps its
    /// original reference. Returns `Stale` if `cancel` fires while fetching.
    pub async fn export_svg(
        &self,
        page: PageInput<'_>,
        fetcher: &dyn AssetFetcher,
        cancel: &CancellationToken,
    ) -> ExportResult<SvgExport> {
        cancel.check()?;

        let mut seen = HashSet::new();
        let sources: Vec<&str> = page
            .elements
            .iter()
            .filter(|e| e.visible)
            .filter_map(|e| e.kind.image_source())
            .map(|image| image.src.as_str())
            .filter(|src| !src.starts_with("data:") && seen.insert(*src))
            .collect();

        let results = join_all(sources.iter().map(|src| fetcher.fetch(src))).await;
        cancel.check()?;

        let mut embedded = HashMap::with_capacity(sources.len());
        let mut fallbacks = Vec::new();
        for (src, result) in sources.iter().zip(results) {
            match result.and_then(|asset| asset.to_data_uri()) {
                Ok(uri) => {
                    log::debug!("Embedded {}", src);
                    embedded.insert(src.to_string(), uri);
                }
                Err(e) => {
                    log::warn!("Keeping external reference for {}: {}", src, e);
                    fallbacks.push(src.to_string());
                }
            }
        }

        let svg = self
            .emitter
            .document(page.elements, page.canvas, self.config.resolution, &embedded);
        log::info!(
            "Exported {} elements ({} images embedded, {} external)",
            page.elements.iter().filter(|e| e.visible).count(),
            embedded.len(),
            fallbacks.len()
        );
        Ok(SvgExport {
            svg,
            embedded: embedded.len(),
            fallbacks,
        })
    }

    /// Vector document without embedding, for fast previews.
    pub fn preview_svg(&self, page: PageInput<'_>) -> String {
        self.preview_svg_at(page, self.config.resolution)
    }

    fn preview_svg_at(&self, page: PageInput<'_>, resolution: f64) -> String {
        self.emitter
            .document(page.elements, page.canvas, resolution, &HashMap::new())
    }

    /// Raster derivative of a document produced by this exporter.
    pub fn render_png(&self, svg: &str) -> RenderResult<Vec<u8>> {
        raster::render_png(svg, self.config.background)
    }

    /// Printable derivative of a raster of `page`.
    pub fn print(&self, title: &str, png: Vec<u8>, page: PageInput<'_>) -> PrintOutput {
        print_document(title, png, page.canvas.width, page.canvas.height, page.unit)
    }

    /// Vector, raster and printable output for one page.
    pub async fn export_page(
        &self,
        title: &str,
        page: PageInput<'_>,
        fetcher: &dyn AssetFetcher,
        cancel: &CancellationToken,
    ) -> ExportResult<PageExport> {
        let svg = self.export_svg(page, fetcher, cancel).await?;
        let png = self.render_png(&svg.svg)?;
        let print = self.print(title, png.clone(), page);
        Ok(PageExport { svg, png, print })
    }

    /// Resolution at which the longer canvas edge fits the thumbnail size.
    pub fn thumbnail_resolution(&self, canvas: Size) -> f64 {
        let longest = canvas.width.max(canvas.height).max(f64::EPSILON);
        f64::from(self.config.thumbnail_max_px) / longest
    }

    /// Low-resolution PNG from the preview path.
    pub fn thumbnail_png(&self, page: PageInput<'_>) -> RenderResult<Vec<u8>> {
        let svg = self.preview_svg_at(page, self.thumbnail_resolution(page.canvas));
        self.render_png(&svg)
    }

    /// [`Exporter::thumbnail_png`] as a data URI.
    pub fn thumbnail_data_uri(&self, page: PageInput<'_>) -> RenderResult<String> {
        let png = self.thumbnail_png(page)?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}
