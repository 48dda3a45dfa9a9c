//! Design elements: text, images, clipart and shapes.

use crate::units::{clamp_size, normalize_degrees};
use kurbo::{Affine, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Serializable color (RGBA8), persisted as a `#RRGGBB` / `#RRGGBBAA` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or `transparent`/`none`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("transparent") || value.eq_ignore_ascii_case("none") {
            return Some(Self::TRANSPARENT);
        }
        let hex = value.strip_prefix('#').filter(|h| h.is_ascii())?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Some(Self::rgb(r, g, b))
            }
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// `#RRGGBB` hex string (alpha dropped).
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Alpha as a 0..=1 opacity.
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::parse(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        if color.a == 255 {
            color.to_hex()
        } else {
            format!("{}{:02X}", color.to_hex(), color.a)
        }
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Position, size and rotation of an element, in physical units.
///
/// `x`/`y` is the top-left corner of the unrotated box; rotation is in
/// degrees about the box center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
}

impl Frame {
    /// Create a frame, clamping the size and normalizing the rotation.
    pub fn new(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Self {
        let mut frame = Self { x, y, width, height, rotation };
        frame.normalize();
        frame
    }

    /// Enforce the size minimum and rotation range.
    pub fn normalize(&mut self) {
        self.width = clamp_size(self.width);
        self.height = clamp_size(self.height);
        self.rotation = normalize_degrees(self.rotation);
    }

    /// Unrotated box.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Rotation about the center, in the element's own coordinate space.
    pub fn rotation_transform(&self) -> Affine {
        if self.rotation == 0.0 {
            Affine::IDENTITY
        } else {
            Affine::rotate_about(self.rotation.to_radians(), self.center())
        }
    }

    /// Check if a canvas point lies inside the (rotated) box.
    pub fn contains(&self, point: Point) -> bool {
        let local = self.rotation_transform().inverse() * point;
        self.rect().contains(local)
    }

    /// Axis-aligned bounding box of the rotated box.
    pub fn bounding_box(&self) -> Rect {
        if self.rotation == 0.0 {
            return self.rect();
        }
        let rect = self.rect();
        let rot = self.rotation_transform();
        let corners = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ];
        let mut bbox = Rect::from_points(rot * corners[0], rot * corners[0]);
        for corner in &corners[1..] {
            bbox = bbox.union_pt(rot * *corner);
        }
        bbox
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// Numeric CSS/SVG weight.
    pub fn numeric(&self) -> u16 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Normal => 400,
            FontWeight::Bold => 700,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
    Overline,
}

impl TextDecoration {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDecoration::None => "none",
            TextDecoration::Underline => "underline",
            TextDecoration::LineThrough => "line-through",
            TextDecoration::Overline => "overline",
        }
    }
}

/// Outline drawn around text glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStroke {
    pub color: Rgba,
    /// Width in physical units.
    pub width: f64,
}

/// Drop shadow behind text. Offsets and blur are in physical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShadow {
    pub color: Rgba,
    pub offset_x: f64,
    pub offset_y: f64,
    #[serde(default)]
    pub blur: f64,
}

/// Payload of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub content: String,
    pub font_family: String,
    /// Font size in physical units.
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub color: Rgba,
    #[serde(default)]
    pub align: TextAlign,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    /// Extra spacing between glyphs as a fraction of the font size.
    #[serde(default)]
    pub letter_spacing: f64,
    #[serde(default)]
    pub decoration: TextDecoration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<TextStroke>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<TextShadow>,
}

fn default_line_height() -> f64 {
    1.2
}

impl TextContent {
    pub fn new(content: impl Into<String>, font_family: impl Into<String>, font_size: f64) -> Self {
        Self {
            content: content.into(),
            font_family: font_family.into(),
            font_size,
            font_weight: FontWeight::default(),
            font_style: FontStyle::default(),
            color: Rgba::BLACK,
            align: TextAlign::default(),
            line_height: default_line_height(),
            letter_spacing: 0.0,
            decoration: TextDecoration::default(),
            stroke: None,
            shadow: None,
        }
    }
}

/// Payload shared by image and clipart elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    /// External source reference (URL or path).
    pub src: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Visual filter passed through to the output (e.g. `grayscale(100%)`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

fn default_opacity() -> f64 {
    1.0
}

impl ImageContent {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            opacity: 1.0,
            filter: None,
        }
    }
}

/// Coordinate space of an explicit path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Explicit outline overriding the catalog entry of a shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathOverride {
    /// SVG path data.
    pub d: String,
    pub view_box: ViewBox,
}

/// Payload of a shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeContent {
    /// Identifier into the shape geometry table.
    pub shape_id: String,
    pub fill: Rgba,
    #[serde(default = "transparent")]
    pub stroke: Rgba,
    /// Stroke width in physical units.
    #[serde(default)]
    pub stroke_width: f64,
    /// Corner radius in physical units (rectangles only).
    #[serde(default)]
    pub border_radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathOverride>,
}

fn transparent() -> Rgba {
    Rgba::TRANSPARENT
}

impl ShapeContent {
    pub fn new(shape_id: impl Into<String>, fill: Rgba) -> Self {
        Self {
            shape_id: shape_id.into(),
            fill,
            stroke: Rgba::TRANSPARENT,
            stroke_width: 0.0,
            border_radius: 0.0,
            path: None,
        }
    }
}

/// Type-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextContent),
    Image(ImageContent),
    Clipart(ImageContent),
    Shape(ShapeContent),
}

impl ElementKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Text(_) => "text",
            ElementKind::Image(_) => "image",
            ElementKind::Clipart(_) => "clipart",
            ElementKind::Shape(_) => "shape",
        }
    }

    /// Source reference for image-like elements.
    pub fn image_source(&self) -> Option<&ImageContent> {
        match self {
            ElementKind::Image(img) | ElementKind::Clipart(img) => Some(img),
            _ => None,
        }
    }
}

/// A single element on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(flatten)]
    pub kind: ElementKind,
}

fn default_visible() -> bool {
    true
}

impl Element {
    /// Create a new unlocked, visible element with a fresh id.
    pub fn new(frame: Frame, kind: ElementKind) -> Self {
        let mut frame = frame;
        frame.normalize();
        Self {
            id: Uuid::new_v4(),
            frame,
            locked: false,
            visible: true,
            kind,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text(_))
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether the element can be picked, selected or manipulated. Hidden
    /// elements stay pickable so they can be found and shown again.
    pub fn is_interactive(&self) -> bool {
        !self.locked
    }

    /// Clone with a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    /// Merge a patch into this element.
    ///
    /// Sizes are clamped and rotation normalized. A payload of a different
    /// element type is ignored.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.frame.x = x;
        }
        if let Some(y) = patch.y {
            self.frame.y = y;
        }
        if let Some(width) = patch.width {
            self.frame.width = width;
        }
        if let Some(height) = patch.height {
            self.frame.height = height;
        }
        if let Some(rotation) = patch.rotation {
            self.frame.rotation = rotation;
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(kind) = &patch.kind {
            if std::mem::discriminant(kind) == std::mem::discriminant(&self.kind) {
                self.kind = kind.clone();
            } else {
                log::warn!(
                    "Ignoring {} payload patch for {} element {}",
                    kind.type_name(),
                    self.kind.type_name(),
                    self.id
                );
            }
        }
        self.frame.normalize();
    }
}

/// Partial update of an element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
    pub kind: Option<ElementKind>,
}

impl ElementPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn rotation(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Default::default()
        }
    }

    pub fn frame(frame: Frame) -> Self {
        Self {
            x: Some(frame.x),
            y: Some(frame.y),
            width: Some(frame.width),
            height: Some(frame.height),
            rotation: Some(frame.rotation),
            ..Default::default()
        }
    }
}
