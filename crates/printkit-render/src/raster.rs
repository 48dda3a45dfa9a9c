//! Raster derivative: SVG to an opaque PNG through resvg and tiny-skia.

use std::sync::{Arc, LazyLock};

use printkit_core::Rgba;

use crate::error::{RenderError, RenderResult};

static FONTS: LazyLock<Arc<usvg::fontdb::Database>> = LazyLock::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    log::debug!("Loaded {} font faces for rasterization", db.len());
    Arc::new(db)
});

/// Parse and draw `svg` over a `background` fill. The pixmap takes the
/// document's own size, rounded up.
pub fn rasterize(svg: &str, background: Rgba) -> RenderResult<tiny_skia::Pixmap> {
    let options = usvg::Options {
        fontdb: Arc::clone(&FONTS),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| {
        log::error!("Failed to parse export document: {}", e);
        RenderError::SvgParse(e.to_string())
    })?;

    let width = tree.size().width().ceil().max(1.0) as u32;
    let height = tree.size().height().ceil().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        log::error!("Failed to allocate {}x{} pixmap", width, height);
        RenderError::Pixmap { width, height }
    })?;

    pixmap.fill(tiny_skia::Color::from_rgba8(background.r, background.g, background.b, 255));
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}

pub fn encode_png(pixmap: &tiny_skia::Pixmap) -> RenderResult<Vec<u8>> {
    pixmap
        .encode_png()
        .map_err(|e| RenderError::Encode(e.to_string()))
}

/// Rasterize straight to PNG bytes.
pub fn render_png(svg: &str, background: Rgba) -> RenderResult<Vec<u8>> {
    encode_png(&rasterize(svg, background)?)
}
