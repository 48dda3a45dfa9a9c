use super::{Outline, ShapeTable};
use crate::element::{Frame, ShapeContent, ViewBox};
use kurbo::{Affine, BezPath, Ellipse, Point, Rect, RoundedRect, Shape, Vec2};

const PATH_TOLERANCE: f64 = 0.1;

/// A shape outline placed in output coordinates.
///
/// Native primitives keep their rotation separate so emitters can wrap them
/// in a rotation about `pivot`; polygons and paths have it baked in.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedOutline {
    Rect {
        rect: Rect,
        radius: f64,
        rotation: f64,
        pivot: Point,
    },
    Ellipse {
        center: Point,
        radii: Vec2,
        rotation: f64,
        pivot: Point,
    },
    Polygon(Vec<Point>),
    Path(BezPath),
}

impl ResolvedOutline {
    /// Outline as a path with any rotation applied.
    pub fn to_path(&self) -> BezPath {
        match self {
            ResolvedOutline::Rect { rect, radius, rotation, pivot } => {
                let path = if *radius > 0.0 {
                    RoundedRect::from_rect(*rect, *radius).to_path(PATH_TOLERANCE)
                } else {
                    rect.to_path(PATH_TOLERANCE)
                };
                rotate(*rotation, *pivot) * path
            }
            ResolvedOutline::Ellipse { center, radii, rotation, pivot } => {
                let path = Ellipse::new(*center, *radii, 0.0).to_path(PATH_TOLERANCE);
                rotate(*rotation, *pivot) * path
            }
            ResolvedOutline::Polygon(points) => {
                let mut path = BezPath::new();
                for (i, p) in points.iter().enumerate() {
                    if i == 0 {
                        path.move_to(*p);
                    } else {
                        path.line_to(*p);
                    }
                }
                path.close_path();
                path
            }
            ResolvedOutline::Path(path) => path.clone(),
        }
    }

    /// Axis-aligned bounds in output coordinates.
    pub fn bounding_box(&self) -> Rect {
        match self {
            ResolvedOutline::Rect { rect, rotation, .. } if *rotation == 0.0 => *rect,
            ResolvedOutline::Polygon(points) => points
                .iter()
                .skip(1)
                .fold(
                    points.first().map(|p| Rect::from_points(*p, *p)).unwrap_or(Rect::ZERO),
                    |acc, p| acc.union_pt(*p),
                ),
            _ => self.to_path().bounding_box(),
        }
    }
}

fn rotate(degrees: f64, pivot: Point) -> Affine {
    if degrees == 0.0 {
        Affine::IDENTITY
    } else {
        Affine::rotate_about(degrees.to_radians(), pivot)
    }
}

/// Map a view box onto the output box.
fn fit_view_box(view_box: &ViewBox, out: Rect) -> Affine {
    Affine::translate((out.x0, out.y0))
        * Affine::scale_non_uniform(out.width() / view_box.width, out.height() / view_box.height)
        * Affine::translate((-view_box.x, -view_box.y))
}

/// Resolve a shape element's outline in output coordinates.
///
/// `scale` is output units per physical unit and `origin` is where the
/// canvas origin lands. Each percentage vertex is scaled to the box size,
/// translated to the box position, then rotated about the box center. The
/// live renderer and the exporter both go through here.
pub fn resolve_outline(
    table: &ShapeTable,
    shape: &ShapeContent,
    frame: &Frame,
    scale: f64,
    origin: Point,
) -> ResolvedOutline {
    let out = Rect::from_origin_size(
        (origin.x + frame.x * scale, origin.y + frame.y * scale),
        (frame.width * scale, frame.height * scale),
    );
    let pivot = out.center();
    let rotation = frame.rotation;
    let max_radius = out.width().min(out.height()) / 2.0;

    if let Some(custom) = &shape.path {
        if let Some(path) = place_path(&custom.d, &custom.view_box, out, rotation, pivot) {
            return path;
        }
        log::warn!("Invalid path override on shape '{}', using catalog outline", shape.shape_id);
    }

    match table.lookup(&shape.shape_id) {
        Outline::Rect => ResolvedOutline::Rect {
            rect: out,
            radius: (shape.border_radius * scale).clamp(0.0, max_radius),
            rotation,
            pivot,
        },
        Outline::RoundedRect { radius_pct } => {
            let radius = if shape.border_radius > 0.0 {
                shape.border_radius * scale
            } else {
                out.width().min(out.height()) * radius_pct / 100.0
            };
            ResolvedOutline::Rect {
                rect: out,
                radius: radius.clamp(0.0, max_radius),
                rotation,
                pivot,
            }
        }
        Outline::Ellipse { cx, cy, rx, ry } => ResolvedOutline::Ellipse {
            center: Point::new(
                out.x0 + cx / 100.0 * out.width(),
                out.y0 + cy / 100.0 * out.height(),
            ),
            radii: Vec2::new(rx / 100.0 * out.width(), ry / 100.0 * out.height()),
            rotation,
            pivot,
        },
        Outline::Polygon(vertices) => {
            let rot = rotate(rotation, pivot);
            ResolvedOutline::Polygon(
                vertices
                    .iter()
                    .map(|&(px, py)| {
                        let scaled = Vec2::new(px / 100.0 * out.width(), py / 100.0 * out.height());
                        let placed = Point::new(out.x0, out.y0) + scaled;
                        rot * placed
                    })
                    .collect(),
            )
        }
        Outline::Path { d, view_box } => place_path(d, view_box, out, rotation, pivot)
            .unwrap_or_else(|| {
                log::warn!("Catalog path for '{}' failed to parse", shape.shape_id);
                ResolvedOutline::Rect { rect: out, radius: 0.0, rotation, pivot }
            }),
    }
}

fn place_path(
    d: &str,
    view_box: &ViewBox,
    out: Rect,
    rotation: f64,
    pivot: Point,
) -> Option<ResolvedOutline> {
    if view_box.width <= 0.0 || view_box.height <= 0.0 {
        return None;
    }
    let path = BezPath::from_svg(d).ok()?;
    Some(ResolvedOutline::Path(rotate(rotation, pivot) * fit_view_box(view_box, out) * path))
}
