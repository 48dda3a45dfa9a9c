//! Insertion interface used by asset pickers.
//!
//! Every insert appends the new element on top, centers it on the canvas and
//! selects it.

use crate::element::{
    Element, ElementId, ElementKind, FontWeight, Frame, ImageContent, Rgba, ShapeContent,
    TextContent,
};
use crate::store::ElementStore;
use crate::units::MIN_ELEMENT_SIZE;

/// Default fill for inserted shapes.
pub const DEFAULT_SHAPE_FILL: Rgba = Rgba::rgb(0x3B, 0x82, 0xF6);
pub const DEFAULT_FONT_FAMILY: &str = "Inter";

/// Size tier of inserted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextTier {
    Heading,
    Subheading,
    #[default]
    Body,
}

impl TextTier {
    /// Font size as a fraction of the canvas height.
    pub fn height_fraction(self) -> f64 {
        match self {
            TextTier::Heading => 0.12,
            TextTier::Subheading => 0.08,
            TextTier::Body => 0.05,
        }
    }

    fn weight(self) -> FontWeight {
        match self {
            TextTier::Heading => FontWeight::Bold,
            TextTier::Subheading | TextTier::Body => FontWeight::Normal,
        }
    }
}

/// Text to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPreset {
    pub content: String,
    pub font_family: String,
    pub tier: TextTier,
}

impl TextPreset {
    pub fn new(content: impl Into<String>, tier: TextTier) -> Self {
        Self {
            content: content.into(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            tier,
        }
    }

    pub fn heading(content: impl Into<String>) -> Self {
        Self::new(content, TextTier::Heading)
    }

    pub fn subheading(content: impl Into<String>) -> Self {
        Self::new(content, TextTier::Subheading)
    }

    pub fn body(content: impl Into<String>) -> Self {
        Self::new(content, TextTier::Body)
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }
}

impl ElementStore {
    fn centered_frame(&self, width: f64, height: f64) -> Frame {
        let canvas = self.canvas_size();
        let width = width.max(MIN_ELEMENT_SIZE);
        let height = height.max(MIN_ELEMENT_SIZE);
        Frame::new(
            (canvas.width - width) / 2.0,
            (canvas.height - height) / 2.0,
            width,
            height,
            0.0,
        )
    }

    fn insert(&mut self, element: Element) -> ElementId {
        let id = self.add_element(element);
        self.set_selection(&[id], Some(id));
        id
    }

    pub fn insert_text(&mut self, preset: TextPreset) -> ElementId {
        let canvas = self.canvas_size();
        let font_size = canvas.height * preset.tier.height_fraction();
        let lines = preset.content.lines().count().max(1) as f64;
        let frame = self.centered_frame(canvas.width * 0.6, font_size * 1.4 * lines);

        let mut text = TextContent::new(preset.content, preset.font_family, font_size);
        text.font_weight = preset.tier.weight();
        self.insert(Element::new(frame, ElementKind::Text(text)))
    }

    pub fn insert_shape(&mut self, shape_id: &str, color: Option<Rgba>) -> ElementId {
        let side = self.default_side(0.3);
        let frame = self.centered_frame(side, side);
        let shape = ShapeContent::new(shape_id, color.unwrap_or(DEFAULT_SHAPE_FILL));
        self.insert(Element::new(frame, ElementKind::Shape(shape)))
    }

    pub fn insert_image(&mut self, uri: &str) -> ElementId {
        let side = self.default_side(0.4);
        let frame = self.centered_frame(side, side);
        self.insert(Element::new(frame, ElementKind::Image(ImageContent::new(uri))))
    }

    pub fn insert_clipart(&mut self, uri: &str) -> ElementId {
        let side = self.default_side(0.25);
        let frame = self.centered_frame(side, side);
        self.insert(Element::new(frame, ElementKind::Clipart(ImageContent::new(uri))))
    }

    fn default_side(&self, fraction: f64) -> f64 {
        let canvas = self.canvas_size();
        canvas.width.min(canvas.height) * fraction
    }
}
