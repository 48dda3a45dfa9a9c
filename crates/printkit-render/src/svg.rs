//! SVG element emitter shared by the exporter and the live preview.
//!
//! Everything that draws an element goes through [`SvgEmitter`], so export
//! and preview can only differ in [`Placement`].

use std::collections::HashMap;
use std::fmt::{self, Write};
use std::sync::Arc;

use kurbo::{Point, Rect, Size};
use printkit_core::element::{
    Element, ElementKind, Frame, ImageContent, Rgba, ShapeContent, TextAlign, TextContent,
    TextDecoration,
};
use printkit_core::shapes::{ResolvedOutline, ShapeTable, resolve_outline};
use printkit_core::viewport::Viewport;

/// Maps physical canvas coordinates to output coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Output units per physical unit.
    pub scale: f64,
    /// Output position of the canvas origin.
    pub origin: Point,
}

impl Placement {
    /// Export placement: canvas origin at the document origin.
    pub fn export(resolution: f64) -> Self {
        Self {
            scale: resolution,
            origin: Point::ZERO,
        }
    }

    /// Screen placement for the live editor.
    pub fn from_viewport(viewport: &Viewport) -> Self {
        Self {
            scale: viewport.scale_factor(),
            origin: viewport.offset.to_point(),
        }
    }

    pub fn rect(&self, frame: &Frame) -> Rect {
        Rect::from_origin_size(
            (self.origin.x + frame.x * self.scale, self.origin.y + frame.y * self.scale),
            (frame.width * self.scale, frame.height * self.scale),
        )
    }

    pub fn length(&self, units: f64) -> f64 {
        units * self.scale
    }
}

/// Number formatted with at most four decimals and no negative zero.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Num(pub f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 10_000.0).round() / 10_000.0;
        if rounded == 0.0 || !rounded.is_finite() {
            f.write_str("0")
        } else {
            write!(f, "{}", rounded)
        }
    }
}

/// Escape reserved XML characters.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn rotate_attr(rotation: f64, pivot: Point) -> String {
    if rotation == 0.0 {
        String::new()
    } else {
        format!(
            " transform=\"rotate({} {} {})\"",
            Num(rotation),
            Num(pivot.x),
            Num(pivot.y)
        )
    }
}

fn fill_attr(out: &mut String, name: &str, color: Rgba) {
    if color.is_transparent() {
        let _ = write!(out, " {name}=\"none\"");
        return;
    }
    let _ = write!(out, " {name}=\"{}\"", color.to_hex());
    if color.a < 255 {
        let _ = write!(out, " {name}-opacity=\"{}\"", Num(color.opacity()));
    }
}

/// Writes elements as SVG primitives.
#[derive(Debug, Clone)]
pub struct SvgEmitter {
    shapes: Arc<ShapeTable>,
    text_inset: f64,
}

impl SvgEmitter {
    pub fn new(shapes: Arc<ShapeTable>, text_inset: f64) -> Self {
        Self { shapes, text_inset }
    }

    pub fn shapes(&self) -> &Arc<ShapeTable> {
        &self.shapes
    }

    /// A complete document for `elements` on a canvas of `canvas` physical
    /// units at `resolution`. Hidden elements are left out. `embedded` maps
    /// image sources to the href written in their place.
    pub fn document(
        &self,
        elements: &[Element],
        canvas: Size,
        resolution: f64,
        embedded: &HashMap<String, String>,
    ) -> String {
        let width = Num(canvas.width * resolution);
        let height = Num(canvas.height * resolution);
        let placement = Placement::export(resolution);

        let mut svg = String::with_capacity(1024 + elements.len() * 256);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
             width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        );
        for element in elements.iter().filter(|e| e.visible) {
            self.element(&mut svg, element, placement, embedded);
        }
        svg.push_str("</svg>");
        svg
    }

    /// Emit one element, regardless of its visibility flag.
    pub fn element(
        &self,
        out: &mut String,
        element: &Element,
        placement: Placement,
        embedded: &HashMap<String, String>,
    ) {
        match &element.kind {
            ElementKind::Shape(shape) => self.shape(out, element, shape, placement),
            ElementKind::Text(text) => self.text(out, element, text, placement),
            ElementKind::Image(image) | ElementKind::Clipart(image) => {
                let href = embedded.get(&image.src).map_or(image.src.as_str(), String::as_str);
                self.image(out, element, image, href, placement)
            }
        }
    }

    fn shape(&self, out: &mut String, element: &Element, shape: &ShapeContent, p: Placement) {
        let outline = resolve_outline(&self.shapes, shape, &element.frame, p.scale, p.origin);

        let mut paint = String::new();
        fill_attr(&mut paint, "fill", shape.fill);
        if shape.stroke_width > 0.0 && !shape.stroke.is_transparent() {
            fill_attr(&mut paint, "stroke", shape.stroke);
            let _ = write!(paint, " stroke-width=\"{}\"", Num(p.length(shape.stroke_width)));
        }

        let id = element.id;
        match &outline {
            ResolvedOutline::Rect { rect, radius, rotation, pivot } => {
                let _ = write!(
                    out,
                    "<rect data-id=\"{id}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                    Num(rect.x0),
                    Num(rect.y0),
                    Num(rect.width()),
                    Num(rect.height()),
                );
                if *radius > 0.0 {
                    let _ = write!(out, " rx=\"{0}\" ry=\"{0}\"", Num(*radius));
                }
                let _ = write!(out, "{paint}{}/>", rotate_attr(*rotation, *pivot));
            }
            ResolvedOutline::Ellipse { center, radii, rotation, pivot } => {
                let _ = write!(
                    out,
                    "<ellipse data-id=\"{id}\" cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"{paint}{}/>",
                    Num(center.x),
                    Num(center.y),
                    Num(radii.x),
                    Num(radii.y),
                    rotate_attr(*rotation, *pivot),
                );
            }
            ResolvedOutline::Polygon(points) => {
                let _ = write!(out, "<polygon data-id=\"{id}\" points=\"");
                for (i, point) in points.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    let _ = write!(out, "{},{}", Num(point.x), Num(point.y));
                }
                let _ = write!(out, "\"{paint}/>");
            }
            ResolvedOutline::Path(path) => {
                let _ = write!(out, "<path data-id=\"{id}\" d=\"{}\"{paint}/>", path.to_svg());
            }
        }
    }

    fn text(&self, out: &mut String, element: &Element, text: &TextContent, p: Placement) {
        let rect = p.rect(&element.frame);
        let center = rect.center();
        let inset = p.length(self.text_inset);
        let (x, anchor) = match text.align {
            TextAlign::Left => (rect.x0 + inset, "start"),
            TextAlign::Center => (center.x, "middle"),
            TextAlign::Right => (rect.x1 - inset, "end"),
        };

        let font_size = p.length(text.font_size);
        let line_step = font_size * text.line_height;
        let lines: Vec<&str> = text.content.split('\n').map(|l| l.trim_end_matches('\r')).collect();
        let first_y = center.y - line_step * (lines.len() - 1) as f64 / 2.0;

        let filter_id = format!("shadow-{}", element.id);
        if let Some(shadow) = &text.shadow {
            let _ = write!(
                out,
                "<defs><filter id=\"{filter_id}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\">\
                 <feDropShadow dx=\"{}\" dy=\"{}\" stdDeviation=\"{}\" flood-color=\"{}\" flood-opacity=\"{}\"/>\
                 </filter></defs>",
                Num(p.length(shadow.offset_x)),
                Num(p.length(shadow.offset_y)),
                Num(p.length(shadow.blur) / 2.0),
                shadow.color.to_hex(),
                Num(shadow.color.opacity()),
            );
        }

        let _ = write!(
            out,
            "<text data-id=\"{}\" x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" font-style=\"{}\"",
            element.id,
            Num(x),
            Num(first_y),
            escape_xml(&text.font_family),
            Num(font_size),
            text.font_weight.numeric(),
            text.font_style.as_str(),
        );
        fill_attr(out, "fill", text.color);
        let _ = write!(out, " text-anchor=\"{anchor}\" dominant-baseline=\"middle\"");
        if text.letter_spacing != 0.0 {
            let _ = write!(out, " letter-spacing=\"{}\"", Num(text.letter_spacing * font_size));
        }
        if text.decoration != TextDecoration::None {
            let _ = write!(out, " text-decoration=\"{}\"", text.decoration.as_str());
        }
        if let Some(stroke) = &text.stroke {
            fill_attr(out, "stroke", stroke.color);
            let _ = write!(
                out,
                " stroke-width=\"{}\" paint-order=\"stroke\"",
                Num(p.length(stroke.width))
            );
        }
        if text.shadow.is_some() {
            let _ = write!(out, " filter=\"url(#{filter_id})\"");
        }
        let _ = write!(
            out,
            "{} xml:space=\"preserve\">",
            rotate_attr(element.frame.rotation, center)
        );

        if lines.len() == 1 {
            out.push_str(&escape_xml(lines[0]));
        } else {
            for (i, line) in lines.iter().enumerate() {
                let _ = write!(
                    out,
                    "<tspan x=\"{}\" y=\"{}\">{}</tspan>",
                    Num(x),
                    Num(first_y + line_step * i as f64),
                    escape_xml(line)
                );
            }
        }
        out.push_str("</text>");
    }

    fn image(&self, out: &mut String, element: &Element, image: &ImageContent, href: &str, p: Placement) {
        let rect = p.rect(&element.frame);
        let _ = write!(
            out,
            "<image data-id=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" href=\"{}\" preserveAspectRatio=\"xMidYMid meet\"",
            element.id,
            Num(rect.x0),
            Num(rect.y0),
            Num(rect.width()),
            Num(rect.height()),
            escape_xml(href),
        );
        if image.opacity < 1.0 {
            let _ = write!(out, " opacity=\"{}\"", Num(image.opacity.max(0.0)));
        }
        if let Some(filter) = image.filter.as_deref().filter(|f| !f.trim().is_empty()) {
            let _ = write!(out, " filter=\"{}\"", escape_xml(filter));
        }
        let _ = write!(out, "{}/>", rotate_attr(element.frame.rotation, rect.center()));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use printkit_core::element::{TextStroke, TextShadow};
    use printkit_core::shapes::Outline;

    pub(crate) fn emitter() -> SvgEmitter {
        SvgEmitter::new(ShapeTable::standard(), 0.1)
    }

    pub(crate) fn shape(id: &str, x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new(
            Frame::new(x, y, w, h, 0.0),
            ElementKind::Shape(ShapeContent::new(id, Rgba::rgb(0x3B, 0x82, 0xF6))),
        )
    }

    /// Value of a numeric attribute in the first tag containing `data-id`.
    pub(crate) fn attr(svg: &str, element: &Element, name: &str) -> f64 {
        let marker = format!("data-id=\"{}\"", element.id);
        let start = svg.find(&marker).unwrap_or_else(|| panic!("Expected element {}", element.id));
        let tag_end = start + svg[start..].find('>').unwrap();
        let tag = &svg[start..tag_end];
        let key = format!(" {name}=\"");
        let at = tag.find(&key).unwrap_or_else(|| panic!("Expected attribute {name} in {tag}"));
        let value = &tag[at + key.len()..];
        value[..value.find('"').unwrap()].parse().unwrap()
    }

    fn doc(elements: &[Element], resolution: f64) -> String {
        emitter().document(elements, Size::new(24.0, 18.0), resolution, &HashMap::new())
    }

    #[test]
    fn test_star_vertices_scaled_by_resolution() {
        let star = shape("star", 0.0, 0.0, 10.0, 10.0);
        let svg = doc(std::slice::from_ref(&star), 10.0);

        let start = svg.find("points=\"").unwrap() + "points=\"".len();
        let points: Vec<(f64, f64)> = svg[start..start + svg[start..].find('"').unwrap()]
            .split(' ')
            .map(|pair| {
                let (x, y) = pair.split_once(',').unwrap();
                (x.parse().unwrap(), y.parse().unwrap())
            })
            .collect();

        let Some(Outline::Polygon(expected)) = ShapeTable::standard().get("star").cloned() else {
            panic!("Expected star polygon");
        };
        assert_eq!(points.len(), expected.len());
        for ((x, y), (px, py)) in points.iter().zip(&expected) {
            // 10 units at resolution 10 is a 100-point box
            assert!((x - px).abs() < 1e-3 && (y - py).abs() < 1e-3);
        }
        assert_eq!(points[0], (50.0, 0.0));
        assert!(svg.contains("fill=\"#3B82F6\""));
    }

    #[test]
    fn test_document_size() {
        let svg = doc(&[], 72.0);
        assert!(svg.contains("width=\"1728\" height=\"1296\""));
        assert!(svg.contains("viewBox=\"0 0 1728 1296\""));
    }

    #[test]
    fn test_bounding_boxes_round_trip() {
        let rect = shape("rectangle", 1.5, 2.25, 4.0, 3.0);
        let circle = shape("circle", 10.0, 5.0, 4.0, 2.0);
        let image = Element::new(
            Frame::new(3.0, 7.0, 5.0, 2.5, 0.0),
            ElementKind::Image(ImageContent::new("photo.png")),
        );
        let res = 30.0;
        let svg = doc(&[rect.clone(), circle.clone(), image.clone()], res);

        for el in [&rect, &image] {
            assert!((attr(&svg, el, "x") - el.frame.x * res).abs() < 1e-3);
            assert!((attr(&svg, el, "y") - el.frame.y * res).abs() < 1e-3);
            assert!((attr(&svg, el, "width") - el.frame.width * res).abs() < 1e-3);
            assert!((attr(&svg, el, "height") - el.frame.height * res).abs() < 1e-3);
        }
        let cx = attr(&svg, &circle, "cx");
        let rx = attr(&svg, &circle, "rx");
        let cy = attr(&svg, &circle, "cy");
        let ry = attr(&svg, &circle, "ry");
        assert!((cx - rx - 10.0 * res).abs() < 1e-3);
        assert!((cx + rx - 14.0 * res).abs() < 1e-3);
        assert!((cy - ry - 5.0 * res).abs() < 1e-3);
        assert!((cy + ry - 7.0 * res).abs() < 1e-3);
    }

    #[test]
    fn test_idempotent() {
        let mut text = TextContent::new("Hello", "Inter", 1.0);
        text.shadow = Some(TextShadow {
            color: Rgba::BLACK,
            offset_x: 0.1,
            offset_y: 0.1,
            blur: 0.2,
        });
        let elements = vec![
            shape("heart", 1.0, 1.0, 3.0, 3.0),
            Element::new(Frame::new(2.0, 2.0, 6.0, 2.0, 45.0), ElementKind::Text(text)),
        ];
        assert_eq!(doc(&elements, 72.0), doc(&elements, 72.0));
    }

    #[test]
    fn test_hidden_excluded_and_z_order() {
        let bottom = shape("rectangle", 0.0, 0.0, 2.0, 2.0);
        let mut hidden = shape("circle", 1.0, 1.0, 2.0, 2.0);
        hidden.visible = false;
        let top = shape("triangle", 2.0, 2.0, 2.0, 2.0);
        let svg = doc(&[bottom.clone(), hidden.clone(), top.clone()], 10.0);

        assert!(!svg.contains(&hidden.id.to_string()));
        let b = svg.find(&bottom.id.to_string()).unwrap();
        let t = svg.find(&top.id.to_string()).unwrap();
        assert!(b < t);
    }

    #[test]
    fn test_text_anchors_and_escaping() {
        let mut left = TextContent::new("<Sale> & \"more\"", "Inter", 1.0);
        left.align = TextAlign::Left;
        let mut right = TextContent::new("R", "Inter", 1.0);
        right.align = TextAlign::Right;
        let left = Element::new(Frame::new(2.0, 4.0, 6.0, 2.0, 0.0), ElementKind::Text(left));
        let right = Element::new(Frame::new(2.0, 8.0, 6.0, 2.0, 0.0), ElementKind::Text(right));
        let center = Element::new(
            Frame::new(2.0, 12.0, 6.0, 2.0, 0.0),
            ElementKind::Text(TextContent::new("C", "Inter", 1.0)),
        );
        let svg = doc(&[left.clone(), right.clone(), center.clone()], 10.0);

        assert!((attr(&svg, &left, "x") - 21.0).abs() < 1e-9);
        assert!((attr(&svg, &left, "y") - 50.0).abs() < 1e-9);
        assert!((attr(&svg, &right, "x") - 79.0).abs() < 1e-9);
        assert!((attr(&svg, &center, "x") - 50.0).abs() < 1e-9);
        assert!(svg.contains("&lt;Sale&gt; &amp; &quot;more&quot;"));
        assert!(svg.contains("text-anchor=\"start\""));
        assert!(svg.contains("text-anchor=\"end\""));
        assert!(svg.contains("dominant-baseline=\"middle\""));
    }

    #[test]
    fn test_multiline_text_is_centered() {
        let mut content = TextContent::new("one\ntwo\nthree", "Inter", 1.0);
        content.line_height = 1.5;
        content.stroke = Some(TextStroke {
            color: Rgba::WHITE,
            width: 0.05,
        });
        let el = Element::new(Frame::new(0.0, 0.0, 10.0, 6.0, 0.0), ElementKind::Text(content));
        let svg = doc(std::slice::from_ref(&el), 10.0);

        assert_eq!(svg.matches("<tspan").count(), 3);
        // Lines 15 apart around the midpoint at 30
        assert!(svg.contains("<tspan x=\"50\" y=\"15\">one</tspan>"));
        assert!(svg.contains("<tspan x=\"50\" y=\"30\">two</tspan>"));
        assert!(svg.contains("<tspan x=\"50\" y=\"45\">three</tspan>"));
        assert!(svg.contains("paint-order=\"stroke\""));
    }

    #[test]
    fn test_rotation_wraps_native_primitives() {
        let mut rect = shape("rectangle", 1.0, 1.0, 2.0, 2.0);
        rect.frame.rotation = 30.0;
        let mut image = Element::new(
            Frame::new(4.0, 4.0, 2.0, 2.0, 90.0),
            ElementKind::Clipart(ImageContent::new("clip.svg")),
        );
        if let ElementKind::Clipart(content) = &mut image.kind {
            content.opacity = 0.5;
            content.filter = Some("grayscale(100%)".to_string());
        }
        let svg = doc(&[rect, image], 10.0);
        assert!(svg.contains("transform=\"rotate(30 20 20)\""));
        assert!(svg.contains("transform=\"rotate(90 50 50)\""));
        assert!(svg.contains("opacity=\"0.5\""));
        assert!(svg.contains("filter=\"grayscale(100%)\""));
    }

    #[test]
    fn test_rotated_polygon_is_baked() {
        let mut tri = shape("triangle", 0.0, 0.0, 10.0, 10.0);
        tri.frame.rotation = 180.0;
        let svg = doc(&[tri], 1.0);
        assert!(!svg.contains("rotate("));
        // Apex (50%, 0%) flips to the bottom edge
        assert!(svg.contains("points=\"5,10 "));
    }

    #[test]
    fn test_embedded_href_replaces_source() {
        let image = Element::new(
            Frame::new(0.0, 0.0, 2.0, 2.0, 0.0),
            ElementKind::Image(ImageContent::new("a.png")),
        );
        let mut embedded = HashMap::new();
        embedded.insert("a.png".to_string(), "data:image/png;base64,AAAA".to_string());
        let svg = emitter().document(&[image], Size::new(2.0, 2.0), 10.0, &embedded);
        assert!(svg.contains("href=\"data:image/png;base64,AAAA\""));
        assert!(!svg.contains("href=\"a.png\""));
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(Num(-0.0).to_string(), "0");
        assert_eq!(Num(1.0 / 3.0).to_string(), "0.3333");
        assert_eq!(Num(50.000000001).to_string(), "50");
        assert_eq!(Num(-2.5).to_string(), "-2.5");
    }
}
