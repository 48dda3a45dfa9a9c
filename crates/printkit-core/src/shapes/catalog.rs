//! Built-in shape catalog.

use super::{Outline, ShapeEntry};
use crate::element::ViewBox;
use std::f64::consts::PI;

macro_rules! poly {
    ($($x:literal $y:literal),+ $(,)?) => {
        Outline::Polygon(vec![$(($x as f64, $y as f64)),+])
    };
}

/// Star with `points` tips; `inner` is the inner radius as a fraction of the outer.
fn star(points: usize, inner: f64) -> Outline {
    let steps = points * 2;
    let vertices = (0..steps)
        .map(|i| {
            let angle = -PI / 2.0 + i as f64 * PI / points as f64;
            let r = if i % 2 == 0 { 50.0 } else { 50.0 * inner };
            (50.0 + r * angle.cos(), 50.0 + r * angle.sin())
        })
        .collect();
    Outline::Polygon(vertices)
}

/// Regular polygon inscribed in the box, first vertex at the top.
fn regular(sides: usize) -> Outline {
    let vertices = (0..sides)
        .map(|i| {
            let angle = -PI / 2.0 + i as f64 * 2.0 * PI / sides as f64;
            (50.0 + 50.0 * angle.cos(), 50.0 + 50.0 * angle.sin())
        })
        .collect();
    Outline::Polygon(vertices)
}

fn path(d: &'static str, x: f64, y: f64, width: f64, height: f64) -> Outline {
    Outline::Path {
        d,
        view_box: ViewBox::new(x, y, width, height),
    }
}

pub(super) fn entries() -> Vec<ShapeEntry> {
    let mut out: Vec<(&'static str, Outline)> = vec![
        // Native primitives
        ("rectangle", Outline::Rect),
        ("square", Outline::Rect),
        ("rounded-rectangle", Outline::RoundedRect { radius_pct: 15.0 }),
        ("pill", Outline::RoundedRect { radius_pct: 50.0 }),
        ("circle", Outline::Ellipse { cx: 50.0, cy: 50.0, rx: 50.0, ry: 50.0 }),
        ("ellipse", Outline::Ellipse { cx: 50.0, cy: 50.0, rx: 50.0, ry: 50.0 }),
        // Triangles
        ("triangle", poly![50 0, 0 100, 100 100]),
        ("triangle-down", poly![0 0, 100 0, 50 100]),
        ("triangle-left", poly![100 0, 100 100, 0 50]),
        ("triangle-right", poly![0 0, 100 50, 0 100]),
        ("right-triangle", poly![0 0, 0 100, 100 100]),
        ("right-triangle-flipped", poly![100 0, 100 100, 0 100]),
        // Quadrilaterals
        ("diamond", poly![50 0, 100 50, 50 100, 0 50]),
        ("kite", poly![50 0, 100 35, 50 100, 0 35]),
        ("parallelogram", poly![25 0, 100 0, 75 100, 0 100]),
        ("parallelogram-reverse", poly![0 0, 75 0, 100 100, 25 100]),
        ("parallelogram-vertical", poly![0 25, 100 0, 100 75, 0 100]),
        ("trapezoid", poly![20 0, 80 0, 100 100, 0 100]),
        ("trapezoid-inverted", poly![0 0, 100 0, 80 100, 20 100]),
        ("cut-corner", poly![0 0, 80 0, 100 20, 100 100, 0 100]),
        // Classic polygons
        ("pentagon", poly![50 0, 100 38, 82 100, 18 100, 0 38]),
        ("hexagon", poly![25 0, 75 0, 100 50, 75 100, 25 100, 0 50]),
        ("hexagon-vertical", poly![50 0, 100 25, 100 75, 50 100, 0 75, 0 25]),
        ("heptagon", poly![50 0, 90 20, 100 60, 75 100, 25 100, 0 60, 10 20]),
        ("octagon", poly![30 0, 70 0, 100 30, 100 70, 70 100, 30 100, 0 70, 0 30]),
        ("nonagon", poly![50 0, 83 12, 100 43, 94 78, 68 100, 32 100, 6 78, 0 43, 17 12]),
        ("decagon", poly![50 0, 80 10, 100 35, 100 70, 80 90, 50 100, 20 90, 0 70, 0 35, 20 10]),
        ("bevel", poly![20 0, 80 0, 100 20, 100 80, 80 100, 20 100, 0 80, 0 20]),
        (
            "rabbet",
            poly![0 15, 15 15, 15 0, 85 0, 85 15, 100 15, 100 85, 85 85, 85 100, 15 100, 15 85, 0 85],
        ),
        // Symbols
        (
            "cross",
            poly![35 0, 65 0, 65 35, 100 35, 100 65, 65 65, 65 100, 35 100, 35 65, 0 65, 0 35, 35 35],
        ),
        (
            "plus-thin",
            poly![42 0, 58 0, 58 42, 100 42, 100 58, 58 58, 58 100, 42 100, 42 58, 0 58, 0 42, 42 42],
        ),
        (
            "close",
            poly![20 0, 0 20, 30 50, 0 80, 20 100, 50 70, 80 100, 100 80, 70 50, 100 20, 80 0, 50 30],
        ),
        (
            "frame",
            poly![0 0, 0 100, 25 100, 25 25, 75 25, 75 75, 25 75, 25 100, 100 100, 100 0],
        ),
        (
            "frame-thin",
            poly![0 0, 0 100, 10 100, 10 10, 90 10, 90 90, 10 90, 10 100, 100 100, 100 0],
        ),
        ("message", poly![0 0, 100 0, 100 75, 75 75, 75 100, 50 75, 0 75]),
        ("callout", poly![0 0, 100 0, 100 70, 40 70, 20 100, 25 70, 0 70]),
        (
            "star",
            poly![50 0, 61 35, 98 35, 68 57, 79 91, 50 70, 21 91, 32 57, 2 35, 39 35],
        ),
        ("lightning", poly![40 0, 100 0, 60 40, 90 40, 20 100, 40 55, 10 55]),
        ("shield", poly![0 0, 100 0, 100 55, 50 100, 0 55]),
        (
            "ticket",
            poly![0 0, 100 0, 100 35, 92 50, 100 65, 100 100, 0 100, 0 65, 8 50, 0 35],
        ),
        ("ribbon", poly![0 0, 100 0, 85 50, 100 100, 0 100, 15 50]),
        ("bookmark", poly![0 0, 100 0, 100 100, 50 80, 0 100]),
        ("flag", poly![0 0, 100 0, 80 30, 100 60, 10 60, 10 100, 0 100]),
        ("house", poly![50 0, 100 40, 100 100, 0 100, 0 40]),
        ("crown", poly![0 20, 25 50, 50 0, 75 50, 100 20, 90 100, 10 100]),
        ("gem", poly![20 0, 80 0, 100 35, 50 100, 0 35]),
        ("hourglass", poly![0 0, 100 0, 55 50, 100 100, 0 100, 45 50]),
        ("bowtie", poly![0 0, 50 40, 100 0, 100 100, 50 60, 0 100]),
        ("mountain", poly![0 100, 35 20, 55 55, 70 35, 100 100]),
        ("step", poly![0 0, 50 0, 50 50, 100 50, 100 100, 0 100]),
        ("l-shape", poly![0 0, 35 0, 35 65, 100 65, 100 100, 0 100]),
        ("t-shape", poly![0 0, 100 0, 100 35, 65 35, 65 100, 35 100, 35 35, 0 35]),
        ("u-shape", poly![0 0, 30 0, 30 70, 70 70, 70 0, 100 0, 100 100, 0 100]),
        // Arrows and chevrons
        ("arrow-right", poly![0 20, 60 20, 60 0, 100 50, 60 100, 60 80, 0 80]),
        ("arrow-left", poly![40 0, 40 20, 100 20, 100 80, 40 80, 40 100, 0 50]),
        ("arrow-up", poly![50 0, 100 40, 80 40, 80 100, 20 100, 20 40, 0 40]),
        ("arrow-down", poly![20 0, 80 0, 80 60, 100 60, 50 100, 0 60, 20 60]),
        (
            "arrow-left-right",
            poly![0 50, 25 0, 25 25, 75 25, 75 0, 100 50, 75 100, 75 75, 25 75, 25 100],
        ),
        (
            "arrow-up-down",
            poly![50 0, 100 25, 75 25, 75 75, 100 75, 50 100, 0 75, 25 75, 25 25, 0 25],
        ),
        (
            "arrow-notched-right",
            poly![0 20, 60 20, 60 0, 100 50, 60 100, 60 80, 0 80, 15 50],
        ),
        ("point-right", poly![0 0, 75 0, 100 50, 75 100, 0 100]),
        ("point-left", poly![25 0, 100 0, 100 100, 25 100, 0 50]),
        ("chevron-right", poly![75 0, 100 50, 75 100, 0 100, 25 50, 0 0]),
        ("chevron-left", poly![100 0, 25 0, 0 50, 25 100, 100 100, 75 50]),
        ("chevron-up", poly![0 25, 50 0, 100 25, 100 100, 50 75, 0 100]),
        ("chevron-down", poly![0 0, 50 25, 100 0, 100 75, 50 100, 0 75]),
        ("point-up", poly![0 25, 50 0, 100 25, 100 100, 0 100]),
        ("point-down", poly![0 0, 100 0, 100 75, 50 100, 0 75]),
        ("arrow-thin-right", poly![0 40, 70 40, 70 20, 100 50, 70 80, 70 60, 0 60]),
        ("arrow-thin-left", poly![30 20, 30 40, 100 40, 100 60, 30 60, 30 80, 0 50]),
        (
            "arrow-notched-left",
            poly![100 20, 40 20, 40 0, 0 50, 40 100, 40 80, 100 80, 85 50],
        ),
        (
            "arrow-quad",
            poly![
                50 0, 65 20, 57 20, 57 43, 80 43, 80 35, 100 50, 80 65, 80 57, 57 57, 57 80, 65 80,
                50 100, 35 80, 43 80, 43 57, 20 57, 20 65, 0 50, 20 35, 20 43, 43 43, 43 20, 35 20,
            ],
        ),
        // Callouts
        ("callout-right", poly![0 0, 100 0, 100 70, 75 70, 80 100, 60 70, 0 70]),
        ("callout-up", poly![0 30, 20 30, 25 0, 40 30, 100 30, 100 100, 0 100]),
        ("callout-side", poly![15 0, 100 0, 100 100, 15 100, 15 60, 0 50, 15 40]),
        // Curves
        (
            "heart",
            path(
                "M50 92 C22 72 2 54 2 31 C2 14 15 2 30 2 C40 2 47 8 50 15 \
                 C53 8 60 2 70 2 C85 2 98 14 98 31 C98 54 78 72 50 92 Z",
                2.0, 2.0, 96.0, 90.0,
            ),
        ),
        (
            "cloud",
            path(
                "M25 80 C10 80 0 70 0 57 C0 45 9 36 21 35 C23 20 35 10 50 10 \
                 C63 10 74 18 78 30 C91 31 100 42 100 55 C100 69 89 80 75 80 Z",
                0.0, 10.0, 100.0, 70.0,
            ),
        ),
        (
            "moon",
            path(
                "M60 0 C33 5 15 27 15 50 C15 73 33 95 60 100 \
                 C30 100 0 78 0 50 C0 22 30 0 60 0 Z",
                0.0, 0.0, 60.0, 100.0,
            ),
        ),
        (
            "speech-bubble",
            path(
                "M10 0 H90 C96 0 100 4 100 10 V60 C100 66 96 70 90 70 H40 L20 95 L25 70 H10 \
                 C4 70 0 66 0 60 V10 C0 4 4 0 10 0 Z",
                0.0, 0.0, 100.0, 95.0,
            ),
        ),
        (
            "bubble-round",
            path(
                "M50 0 C77.6 0 100 20 100 45 C100 70 77.6 90 50 90 C44 90 38 89 33 87 \
                 L12 100 L18 80 C7 72 0 59 0 45 C0 20 22.4 0 50 0 Z",
                0.0, 0.0, 100.0, 100.0,
            ),
        ),
        (
            "drop",
            path(
                "M50 0 C50 0 90 45 90 65 C90 87 72 100 50 100 \
                 C28 100 10 87 10 65 C10 45 50 0 50 0 Z",
                10.0, 0.0, 80.0, 100.0,
            ),
        ),
        (
            "leaf",
            path("M0 100 C0 40 40 0 100 0 C100 60 60 100 0 100 Z", 0.0, 0.0, 100.0, 100.0),
        ),
        (
            "wave",
            path(
                "M0 15 C25 0 50 30 75 15 C85 9 93 8 100 10 V85 \
                 C75 100 50 70 25 85 C15 91 7 92 0 90 Z",
                0.0, 0.0, 100.0, 100.0,
            ),
        ),
        (
            "arch",
            path(
                "M0 100 V50 C0 22 22 0 50 0 C78 0 100 22 100 50 V100 Z",
                0.0, 0.0, 100.0, 100.0,
            ),
        ),
        (
            "semicircle",
            path(
                "M0 50 C0 22.4 22.4 0 50 0 C77.6 0 100 22.4 100 50 Z",
                0.0, 0.0, 100.0, 50.0,
            ),
        ),
        (
            "quarter-circle",
            path("M0 0 C55.2 0 100 44.8 100 100 H0 Z", 0.0, 0.0, 100.0, 100.0),
        ),
        (
            "pie",
            path(
                "M50 50 V0 C77.6 0 100 22.4 100 50 C100 77.6 77.6 100 50 100 \
                 C22.4 100 0 77.6 0 50 Z",
                0.0, 0.0, 100.0, 100.0,
            ),
        ),
        (
            "egg",
            path(
                "M50 0 C78 0 95 40 95 65 C95 88 75 100 50 100 \
                 C25 100 5 88 5 65 C5 40 22 0 50 0 Z",
                5.0, 0.0, 90.0, 100.0,
            ),
        ),
        (
            "blob",
            path(
                "M52 2 C74 0 96 14 98 40 C100 64 86 94 58 98 \
                 C30 102 4 86 2 58 C0 30 28 4 52 2 Z",
                0.0, 0.0, 100.0, 100.0,
            ),
        ),
        (
            "lens",
            path("M50 0 C80 20 80 80 50 100 C20 80 20 20 50 0 Z", 27.5, 0.0, 45.0, 100.0),
        ),
        (
            "shield-curved",
            path(
                "M50 0 L100 15 V50 C100 75 80 92 50 100 C20 92 0 75 0 50 V15 Z",
                0.0, 0.0, 100.0, 100.0,
            ),
        ),
        (
            "squircle",
            path(
                "M50 0 C90 0 100 10 100 50 C100 90 90 100 50 100 \
                 C10 100 0 90 0 50 C0 10 10 0 50 0 Z",
                0.0, 0.0, 100.0, 100.0,
            ),
        ),
        (
            "arrow-curved-right",
            path(
                "M0 100 C0 45 35 20 70 20 V0 L100 35 L70 70 V50 C45 50 20 65 0 100 Z",
                0.0, 0.0, 100.0, 100.0,
            ),
        ),
    ];

    // Generated families
    let stars: [(&'static str, usize, f64); 10] = [
        ("sparkle", 4, 0.2),
        ("star-4", 4, 0.4),
        ("star-5-thin", 5, 0.3),
        ("star-6", 6, 0.5),
        ("star-7", 7, 0.5),
        ("star-8", 8, 0.55),
        ("star-10", 10, 0.6),
        ("star-12", 12, 0.65),
        ("star-16", 16, 0.7),
        ("star-24", 24, 0.75),
    ];
    out.extend(stars.iter().map(|&(id, n, inner)| (id, star(n, inner))));

    let bursts: [(&'static str, usize); 7] = [
        ("burst-8", 8),
        ("burst-12", 12),
        ("burst-16", 16),
        ("burst-20", 20),
        ("burst-24", 24),
        ("burst-32", 32),
        ("seal", 40),
    ];
    out.extend(bursts.iter().map(|&(id, n)| {
        let inner = if n >= 40 { 0.92 } else { 0.8 };
        (id, star(n, inner))
    }));

    let polygons: [(&'static str, usize); 10] = [
        ("polygon-3", 3),
        ("polygon-4", 4),
        ("polygon-5", 5),
        ("polygon-6", 6),
        ("polygon-7", 7),
        ("polygon-8", 8),
        ("polygon-9", 9),
        ("polygon-10", 10),
        ("polygon-11", 11),
        ("polygon-12", 12),
    ];
    out.extend(polygons.iter().map(|&(id, n)| (id, regular(n))));

    out.into_iter()
        .map(|(id, outline)| ShapeEntry { id, outline })
        .collect()
}
