//! Selection handles and the resize/rotate math behind them.

use crate::element::{Element, ElementKind, ElementPatch, Frame};
use crate::snap::snap_angle;
use crate::units::{MIN_ELEMENT_SIZE, normalize_degrees};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
    /// Rotation handle above the top edge.
    Rotate,
}

/// Which side of an axis a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisMove {
    Min,
    Max,
    Fixed,
}

impl HandleKind {
    pub fn is_corner(&self) -> bool {
        matches!(self, HandleKind::Corner(_))
    }

    fn axes(&self) -> (AxisMove, AxisMove) {
        use AxisMove::*;
        match self {
            HandleKind::Corner(Corner::TopLeft) => (Min, Min),
            HandleKind::Corner(Corner::TopRight) => (Max, Min),
            HandleKind::Corner(Corner::BottomLeft) => (Min, Max),
            HandleKind::Corner(Corner::BottomRight) => (Max, Max),
            HandleKind::Edge(Edge::Top) => (Fixed, Min),
            HandleKind::Edge(Edge::Right) => (Max, Fixed),
            HandleKind::Edge(Edge::Bottom) => (Fixed, Max),
            HandleKind::Edge(Edge::Left) => (Min, Fixed),
            HandleKind::Rotate => (Fixed, Fixed),
        }
    }

    /// Handle position relative to the box center, in half-extents.
    fn unit_offset(&self) -> (f64, f64) {
        match self {
            HandleKind::Corner(Corner::TopLeft) => (-1.0, -1.0),
            HandleKind::Corner(Corner::TopRight) => (1.0, -1.0),
            HandleKind::Corner(Corner::BottomLeft) => (-1.0, 1.0),
            HandleKind::Corner(Corner::BottomRight) => (1.0, 1.0),
            HandleKind::Edge(Edge::Top) => (0.0, -1.0),
            HandleKind::Edge(Edge::Right) => (1.0, 0.0),
            HandleKind::Edge(Edge::Bottom) => (0.0, 1.0),
            HandleKind::Edge(Edge::Left) => (-1.0, 0.0),
            HandleKind::Rotate => (0.0, -1.0),
        }
    }
}

pub const RESIZE_HANDLES: [HandleKind; 8] = [
    HandleKind::Corner(Corner::TopLeft),
    HandleKind::Corner(Corner::TopRight),
    HandleKind::Corner(Corner::BottomLeft),
    HandleKind::Corner(Corner::BottomRight),
    HandleKind::Edge(Edge::Top),
    HandleKind::Edge(Edge::Right),
    HandleKind::Edge(Edge::Bottom),
    HandleKind::Edge(Edge::Left),
];

/// A selection handle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a screen point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Rotate a local vector by the frame's rotation.
fn rotate_vec(v: Vec2, degrees: f64) -> Vec2 {
    if degrees == 0.0 {
        return v;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Handles for a frame: eight resize handles and the rotate handle, all
/// rotated with the element. `rotate_offset` is in screen pixels.
pub fn handles(frame: &Frame, viewport: &Viewport, rotate_offset: f64) -> Vec<Handle> {
    let scale = viewport.scale_factor();
    let center = viewport.canvas_to_screen(frame.center());
    let half_w = frame.width * scale / 2.0;
    let half_h = frame.height * scale / 2.0;

    let place = |kind: HandleKind| {
        let (ux, uy) = kind.unit_offset();
        let mut local = Vec2::new(ux * half_w, uy * half_h);
        if kind == HandleKind::Rotate {
            local.y -= rotate_offset;
        }
        Handle::new(center + rotate_vec(local, frame.rotation), kind)
    };

    RESIZE_HANDLES
        .iter()
        .copied()
        .chain(std::iter::once(HandleKind::Rotate))
        .map(place)
        .collect()
}

/// Find which handle (if any) is under a screen point.
pub fn hit_test_handles(
    frame: &Frame,
    viewport: &Viewport,
    rotate_offset: f64,
    point: Point,
    tolerance: f64,
) -> Option<HandleKind> {
    handles(frame, viewport, rotate_offset)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// New frame after dragging `handle` by `delta` (canvas units) from `start`.
///
/// The delta is measured in the element's rotated axes. The opposite side
/// stays put, including when the size hits the minimum. With `keep_aspect`,
/// corner handles derive the minor axis from the dominant one.
pub fn resize_frame(start: &Frame, handle: HandleKind, delta: Vec2, keep_aspect: bool) -> Frame {
    let (mx, my) = handle.axes();
    let local = rotate_vec(delta, -start.rotation);

    let grow = |axis: AxisMove, size: f64, d: f64| match axis {
        AxisMove::Max => size + d,
        AxisMove::Min => size - d,
        AxisMove::Fixed => size,
    };
    let mut width = grow(mx, start.width, local.x);
    let mut height = grow(my, start.height, local.y);

    if keep_aspect && handle.is_corner() {
        let aspect = start.width / start.height;
        let sx = width / start.width;
        let sy = height / start.height;
        if (sx - 1.0).abs() >= (sy - 1.0).abs() {
            height = width / aspect;
        } else {
            width = height * aspect;
        }
        // Clamp both axes together so the ratio survives the minimum
        if width < MIN_ELEMENT_SIZE || height < MIN_ELEMENT_SIZE {
            if aspect >= 1.0 {
                height = MIN_ELEMENT_SIZE;
                width = MIN_ELEMENT_SIZE * aspect;
            } else {
                width = MIN_ELEMENT_SIZE;
                height = MIN_ELEMENT_SIZE / aspect;
            }
        }
    }
    let width = width.max(MIN_ELEMENT_SIZE);
    let height = height.max(MIN_ELEMENT_SIZE);

    let anchor = |axis: AxisMove, size: f64, new_size: f64| match axis {
        AxisMove::Max => -size / 2.0 + new_size / 2.0,
        AxisMove::Min => size / 2.0 - new_size / 2.0,
        AxisMove::Fixed => 0.0,
    };
    let shift = Vec2::new(
        anchor(mx, start.width, width),
        anchor(my, start.height, height),
    );
    let center = start.center() + rotate_vec(shift, start.rotation);

    Frame {
        x: center.x - width / 2.0,
        y: center.y - height / 2.0,
        width,
        height,
        rotation: start.rotation,
    }
}

/// Patch resizing `start`. Text scales its font on corner handles by the
/// larger axis factor; edge handles reflow without touching the font.
pub fn resize_patch(start: &Element, handle: HandleKind, delta: Vec2, keep_aspect: bool) -> ElementPatch {
    let frame = resize_frame(&start.frame, handle, delta, keep_aspect);
    let mut patch = ElementPatch::frame(frame);
    if let (ElementKind::Text(text), true) = (&start.kind, handle.is_corner()) {
        let sx = frame.width / start.frame.width;
        let sy = frame.height / start.frame.height;
        let mut text = text.clone();
        text.font_size *= sx.max(sy);
        patch.kind = Some(ElementKind::Text(text));
    }
    patch
}

/// Rotation for a pointer position, both in screen space.
///
/// Zero points up. `snap` rounds to that many degrees.
pub fn rotation_from_pointer(center: Point, pointer: Point, snap: Option<f64>) -> f64 {
    let d = pointer - center;
    let degrees = d.y.atan2(d.x).to_degrees() + 90.0;
    match snap {
        Some(increment) => snap_angle(degrees, increment),
        None => normalize_degrees(degrees),
    }
}

/// Union of bounding boxes, in canvas units.
pub fn selection_bounds<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Rect> {
    elements
        .into_iter()
        .map(|e| e.frame.bounding_box())
        .reduce(|acc, r| acc.union(r))
}
