//! Printable document derivative.
//!
//! With the `print` feature the raster is placed on a single PDF page of the
//! exact physical size. Without it, or when PDF assembly fails, the PNG is
//! handed back as is.

use printkit_core::SizeUnit;

/// Result of [`print_document`].
#[derive(Debug, Clone, PartialEq)]
pub enum PrintOutput {
    Pdf(Vec<u8>),
    /// PDF output unavailable; the raster is offered instead.
    RasterFallback(Vec<u8>),
}

impl PrintOutput {
    pub fn bytes(&self) -> &[u8] {
        match self {
            PrintOutput::Pdf(bytes) | PrintOutput::RasterFallback(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            PrintOutput::Pdf(bytes) | PrintOutput::RasterFallback(bytes) => bytes,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            PrintOutput::Pdf(_) => "pdf",
            PrintOutput::RasterFallback(_) => "png",
        }
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self, PrintOutput::Pdf(_))
    }
}

/// Physical page size in millimetres.
pub fn page_size_mm(width: f64, height: f64, unit: SizeUnit) -> (f64, f64) {
    let mm = unit.millimeters_per_unit();
    (width * mm, height * mm)
}

/// Wrap a PNG of the page into a printable document `width` x `height`
/// physical units in size.
pub fn print_document(title: &str, png: Vec<u8>, width: f64, height: f64, unit: SizeUnit) -> PrintOutput {
    #[cfg(feature = "print")]
    {
        let (width_mm, height_mm) = page_size_mm(width, height, unit);
        match pdf::build(title, &png, width_mm, height_mm) {
            Ok(bytes) => {
                log::info!(
                    "Built {:.1}x{:.1} mm print document ({} bytes)",
                    width_mm,
                    height_mm,
                    bytes.len()
                );
                return PrintOutput::Pdf(bytes);
            }
            Err(e) => log::warn!("PDF assembly failed, offering raster instead: {}", e),
        }
    }
    #[cfg(not(feature = "print"))]
    {
        let _ = (title, width, height, unit);
        log::warn!("Built without print support, offering raster instead");
    }
    PrintOutput::RasterFallback(png)
}

#[cfg(feature = "print")]
mod pdf {
    use printpdf::image_crate::GenericImageView;
    use printpdf::{Image, ImageTransform, Mm, PdfDocument};

    pub(super) fn build(title: &str, png: &[u8], width_mm: f64, height_mm: f64) -> Result<Vec<u8>, String> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(width_mm as f32), Mm(height_mm as f32), "Artwork");
        let layer = doc.get_page(page).get_layer(layer);

        let decoded = printpdf::image_crate::load_from_memory(png)
            .map_err(|e| format!("Failed to decode raster: {}", e))?;
        let (px_w, px_h) = decoded.dimensions();
        let (px_w, px_h) = (px_w.max(1), px_h.max(1));
        let image = Image::from_dynamic_image(&decoded);

        // dpi sizes the width exactly; scale_y absorbs pixel rounding
        let dpi = px_w as f64 / (width_mm / 25.4);
        let natural_height_mm = px_h as f64 / dpi * 25.4;
        let transform = ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(0.0)),
            dpi: Some(dpi as f32),
            scale_y: Some((height_mm / natural_height_mm) as f32),
            ..Default::default()
        };
        image.add_to_layer(layer, transform);

        doc.save_to_bytes().map_err(|e| format!("Failed to save PDF: {}", e))
    }
}
