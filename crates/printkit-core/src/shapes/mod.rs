//! Shape geometry table.
//!
//! Maps shape identifiers to outlines expressed relative to the element box.
//! The same table instance is handed to the live renderer and the exporter,
//! and both resolve outlines through [`resolve_outline`], so a shape can
//! never look different in preview and print.

mod catalog;
mod resolve;

pub use resolve::{ResolvedOutline, resolve_outline};

use crate::element::ViewBox;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Version of the built-in catalog. Bump whenever an outline changes.
pub const SHAPE_TABLE_VERSION: u32 = 4;

/// Identifier used when a shape id is not in the table.
pub const FALLBACK_SHAPE: &str = "rectangle";

/// Outline of a catalog shape, relative to the element box.
///
/// Percentages run from 0 (left/top edge) to 100 (right/bottom edge).
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    /// Native rectangle; honors the element's border radius.
    Rect,
    /// Native rounded rectangle. The radius is a percentage of the shorter
    /// side, used when the element has no border radius of its own.
    RoundedRect { radius_pct: f64 },
    /// Native ellipse with center and radii as percentages.
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    /// Polygon with `(x%, y%)` vertices.
    Polygon(Vec<(f64, f64)>),
    /// Explicit path data in its own coordinate space.
    Path { d: &'static str, view_box: ViewBox },
}

/// A named catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeEntry {
    pub id: &'static str,
    pub outline: Outline,
}

/// Versioned mapping from shape identifier to outline.
#[derive(Debug, Clone)]
pub struct ShapeTable {
    version: u32,
    entries: Vec<ShapeEntry>,
    index: HashMap<&'static str, usize>,
}

static STANDARD: LazyLock<Arc<ShapeTable>> =
    LazyLock::new(|| Arc::new(ShapeTable::new(SHAPE_TABLE_VERSION, catalog::entries())));

impl ShapeTable {
    /// Build a table from entries. Later duplicates replace earlier ones.
    pub fn new(version: u32, entries: Vec<ShapeEntry>) -> Self {
        let mut table = Self {
            version,
            entries: Vec::with_capacity(entries.len()),
            index: HashMap::with_capacity(entries.len()),
        };
        for entry in entries {
            if let Some(&existing) = table.index.get(entry.id) {
                log::warn!("Duplicate shape id '{}' in table, replacing", entry.id);
                table.entries[existing] = entry;
            } else {
                table.index.insert(entry.id, table.entries.len());
                table.entries.push(entry);
            }
        }
        table
    }

    /// The built-in catalog shared by preview and export.
    pub fn standard() -> Arc<ShapeTable> {
        Arc::clone(&STANDARD)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn get(&self, id: &str) -> Option<&Outline> {
        self.index.get(id).map(|&i| &self.entries[i].outline)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up an outline, falling back to a plain rectangle for unknown ids.
    pub fn lookup(&self, id: &str) -> &Outline {
        match self.get(id) {
            Some(outline) => outline,
            None => {
                log::warn!("Unknown shape id '{}', drawing as {}", id, FALLBACK_SHAPE);
                self.get(FALLBACK_SHAPE).unwrap_or(&Outline::Rect)
            }
        }
    }

    /// Shape identifiers in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
