//! Renderer trait abstraction and the SVG preview renderer.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use kurbo::{Rect, Size};
use printkit_core::interaction::Guides;
use printkit_core::selection::{Handle, HandleKind};
use printkit_core::shapes::ShapeTable;
use printkit_core::{Element, ElementId, Rgba, Viewport};

use crate::svg::{Num, Placement, SvgEmitter};

/// Opacity of hidden elements in the editor.
const HIDDEN_OPACITY: f64 = 0.3;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Elements of the active page in z-order.
    pub elements: &'a [Element],
    /// Canvas size in physical units.
    pub canvas_size: Size,
    pub viewport: Viewport,
    /// Output surface size in pixels.
    pub surface_size: Size,
    /// Surface color around the page.
    pub background_color: Rgba,
    /// Page color.
    pub page_color: Rgba,
    pub selection_color: Rgba,
    /// Handles of the primary selection, in screen space.
    pub handles: Vec<Handle>,
    /// Bounds of selected elements, in canvas units.
    pub selected_bounds: Vec<Rect>,
    /// Marquee in canvas units.
    pub marquee: Option<Rect>,
    pub guides: Guides,
    /// Text element under an overlay editor; skipped.
    pub editing: Option<ElementId>,
}

impl<'a> RenderContext<'a> {
    pub fn new(elements: &'a [Element], canvas_size: Size, surface_size: Size) -> Self {
        Self {
            elements,
            canvas_size,
            viewport: Viewport::default(),
            surface_size,
            background_color: Rgba::rgb(0xF3, 0xF4, 0xF6),
            page_color: Rgba::WHITE,
            selection_color: Rgba::rgb(0x3B, 0x82, 0xF6),
            handles: Vec::new(),
            selected_bounds: Vec::new(),
            marquee: None,
            guides: Guides::default(),
            editing: None,
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_background(mut self, color: Rgba) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_handles(mut self, handles: Vec<Handle>) -> Self {
        self.handles = handles;
        self
    }

    pub fn with_selected_bounds(mut self, bounds: Vec<Rect>) -> Self {
        self.selected_bounds = bounds;
        self
    }

    pub fn with_marquee(mut self, marquee: Option<Rect>) -> Self {
        self.marquee = marquee;
        self
    }

    pub fn with_guides(mut self, guides: Guides) -> Self {
        self.guides = guides;
        self
    }

    pub fn with_editing(mut self, id: Option<ElementId>) -> Self {
        self.editing = id;
        self
    }
}

/// Trait for rendering backends.
///
/// Every backend receives the same shape table the exporter uses.
pub trait Renderer {
    /// Build the drawing commands for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Rgba {
        ctx.background_color
    }
}

/// Renders frames as screen-space SVG through the export emitter.
#[derive(Debug, Clone)]
pub struct SvgPreviewRenderer {
    emitter: SvgEmitter,
    handle_size: f64,
    scene: String,
}

impl SvgPreviewRenderer {
    pub fn new(shapes: Arc<ShapeTable>, text_inset: f64) -> Self {
        Self {
            emitter: SvgEmitter::new(shapes, text_inset),
            handle_size: 10.0,
            scene: String::new(),
        }
    }

    pub fn with_handle_size(mut self, size: f64) -> Self {
        self.handle_size = size;
        self
    }

    /// Markup of the last built frame.
    pub fn scene(&self) -> &str {
        &self.scene
    }

    fn overlays(&self, out: &mut String, ctx: &RenderContext, page: Rect) {
        let color = ctx.selection_color.to_hex();

        if ctx.guides.vertical {
            let x = page.center().x;
            let _ = write!(
                out,
                "<line class=\"guide\" x1=\"{0}\" y1=\"{1}\" x2=\"{0}\" y2=\"{2}\" stroke=\"#EC4899\" stroke-width=\"1\"/>",
                Num(x),
                Num(page.y0),
                Num(page.y1)
            );
        }
        if ctx.guides.horizontal {
            let y = page.center().y;
            let _ = write!(
                out,
                "<line class=\"guide\" x1=\"{1}\" y1=\"{0}\" x2=\"{2}\" y2=\"{0}\" stroke=\"#EC4899\" stroke-width=\"1\"/>",
                Num(y),
                Num(page.x0),
                Num(page.x1)
            );
        }

        for bounds in &ctx.selected_bounds {
            let r = ctx.viewport.canvas_rect_to_screen(*bounds);
            let _ = write!(
                out,
                "<rect class=\"selection\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"1\"/>",
                Num(r.x0),
                Num(r.y0),
                Num(r.width()),
                Num(r.height())
            );
        }

        if let Some(marquee) = ctx.marquee {
            let r = ctx.viewport.canvas_rect_to_screen(marquee);
            let _ = write!(
                out,
                "<rect class=\"marquee\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{color}\" fill-opacity=\"0.1\" stroke=\"{color}\" stroke-dasharray=\"4 2\"/>",
                Num(r.x0),
                Num(r.y0),
                Num(r.width()),
                Num(r.height())
            );
        }

        let half = self.handle_size / 2.0;
        for handle in &ctx.handles {
            let p = handle.position;
            match handle.kind {
                HandleKind::Rotate => {
                    let _ = write!(
                        out,
                        "<circle class=\"handle rotate\" cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"white\" stroke=\"{color}\"/>",
                        Num(p.x),
                        Num(p.y),
                        Num(half)
                    );
                }
                _ => {
                    let _ = write!(
                        out,
                        "<rect class=\"handle\" x=\"{}\" y=\"{}\" width=\"{2}\" height=\"{2}\" fill=\"white\" stroke=\"{color}\"/>",
                        Num(p.x - half),
                        Num(p.y - half),
                        Num(self.handle_size)
                    );
                }
            }
        }
    }
}

impl Renderer for SvgPreviewRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        let placement = Placement::from_viewport(&ctx.viewport);
        let page = ctx
            .viewport
            .canvas_rect_to_screen(Rect::from_origin_size((0.0, 0.0), ctx.canvas_size));
        let no_embeds = HashMap::new();

        let mut out = String::with_capacity(2048 + ctx.elements.len() * 256);
        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{0}\" height=\"{1}\" viewBox=\"0 0 {0} {1}\">",
            Num(ctx.surface_size.width),
            Num(ctx.surface_size.height)
        );
        let _ = write!(
            out,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            self.background_color(ctx).to_hex()
        );
        let _ = write!(
            out,
            "<rect class=\"page\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            Num(page.x0),
            Num(page.y0),
            Num(page.width()),
            Num(page.height()),
            ctx.page_color.to_hex()
        );

        for element in ctx.elements {
            if ctx.editing == Some(element.id) {
                continue;
            }
            if element.visible {
                self.emitter.element(&mut out, element, placement, &no_embeds);
            } else {
                let _ = write!(out, "<g opacity=\"{}\">", Num(HIDDEN_OPACITY));
                self.emitter.element(&mut out, element, placement, &no_embeds);
                out.push_str("</g>");
            }
        }

        self.overlays(&mut out, ctx, page);
        out.push_str("</svg>");
        self.scene = out;
    }
}
