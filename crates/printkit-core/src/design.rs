//! Persisted design: pages of elements plus canvas dimensions.

use crate::element::Element;
use crate::units::SizeUnit;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for pages.
pub type PageId = Uuid;

/// Design load/save errors.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Design has no pages")]
    NoPages,
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
}

/// Result type for design operations.
pub type DesignResult<T> = Result<T, DesignError>;

/// Default label for the page at `index`.
pub fn default_page_label(index: usize) -> String {
    match index {
        0 => "Front".to_string(),
        1 => "Back".to_string(),
        n => format!("Page {}", n + 1),
    }
}

/// One printable side. The element list is shared copy-on-write: mutations
/// replace it, so readers holding a clone keep a consistent snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub label: String,
    pub elements: Arc<Vec<Element>>,
}

impl Page {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            elements: Arc::new(Vec::new()),
        }
    }

    pub fn with_elements(label: impl Into<String>, elements: Vec<Element>) -> Self {
        Self {
            elements: Arc::new(elements),
            ..Self::new(label)
        }
    }
}

/// Design shape exchanged with storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub pages: Vec<Page>,
    pub canvas_width: f64,
    pub canvas_height: f64,
    #[serde(default)]
    pub size_unit: SizeUnit,
}

impl Design {
    /// A single blank front page.
    pub fn new(canvas_width: f64, canvas_height: f64, size_unit: SizeUnit) -> Self {
        Self {
            pages: vec![Page::new(default_page_label(0))],
            canvas_width,
            canvas_height,
            size_unit,
        }
    }

    pub fn validate(&self) -> DesignResult<()> {
        if self.pages.is_empty() {
            return Err(DesignError::NoPages);
        }
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.canvas_width) || !valid(self.canvas_height) {
            return Err(DesignError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        Ok(())
    }

    /// Parse and validate a design. Element frames are normalized on load.
    pub fn from_json(json: &str) -> DesignResult<Self> {
        let mut design: Design = serde_json::from_str(json)?;
        design.validate()?;
        for page in &mut design.pages {
            for element in Arc::make_mut(&mut page.elements) {
                element.frame.normalize();
            }
        }
        log::debug!(
            "Loaded design with {} pages ({}x{} {})",
            design.pages.len(),
            design.canvas_width,
            design.canvas_height,
            design.size_unit.suffix()
        );
        Ok(design)
    }

    pub fn to_json(&self) -> DesignResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, Frame, Rgba, ShapeContent};

    #[test]
    fn test_page_labels() {
        assert_eq!(default_page_label(0), "Front");
        assert_eq!(default_page_label(1), "Back");
        assert_eq!(default_page_label(2), "Page 3");
    }

    #[test]
    fn test_json_roundtrip() {
        let mut design = Design::new(24.0, 18.0, SizeUnit::Inches);
        Arc::make_mut(&mut design.pages[0].elements).push(Element::new(
            Frame::new(1.0, 1.0, 4.0, 4.0, 45.0),
            ElementKind::Shape(ShapeContent::new("heart", Rgba::rgb(255, 0, 0))),
        ));
        let json = design.to_json().unwrap();
        assert!(json.contains("\"canvasWidth\""));
        assert!(json.contains("\"sizeUnit\": \"inches\""));
        let back = Design::from_json(&json).unwrap();
        assert_eq!(back, design);
    }

    #[test]
    fn test_rejects_empty_and_invalid() {
        let json = r#"{"pages": [], "canvasWidth": 10, "canvasHeight": 10}"#;
        assert!(matches!(Design::from_json(json), Err(DesignError::NoPages)));

        let json = r#"{"pages": [{"id": "7f9c24e5-3b0a-4a4e-9d53-2a8f7a4a0c11", "label": "Front", "elements": []}],
                       "canvasWidth": 0, "canvasHeight": 10}"#;
        assert!(matches!(
            Design::from_json(json),
            Err(DesignError::InvalidCanvas { .. })
        ));

        assert!(matches!(Design::from_json("{"), Err(DesignError::Json(_))));
    }

    #[test]
    fn test_non_ascii_color_is_an_error() {
        let json = r##"{
            "pages": [{
                "id": "7f9c24e5-3b0a-4a4e-9d53-2a8f7a4a0c11",
                "label": "Front",
                "elements": [{
                    "id": "0d6f1f7a-4a47-4c1b-8f0e-2f7e0b9f3a55",
                    "type": "shape", "x": 0, "y": 0, "width": 2, "height": 2,
                    "rotation": 0, "shapeId": "circle", "fill": "#éa"
                }]
            }],
            "canvasWidth": 12, "canvasHeight": 12
        }"##;
        assert!(matches!(Design::from_json(json), Err(DesignError::Json(_))));
    }

    #[test]
    fn test_load_normalizes_frames() {
        let json = r##"{
            "pages": [{
                "id": "7f9c24e5-3b0a-4a4e-9d53-2a8f7a4a0c11",
                "label": "Front",
                "elements": [{
                    "id": "0d6f1f7a-4a47-4c1b-8f0e-2f7e0b9f3a55",
                    "type": "shape", "x": 0, "y": 0, "width": 0.1, "height": 3,
                    "rotation": -45, "shapeId": "circle", "fill": "#000"
                }]
            }],
            "canvasWidth": 12, "canvasHeight": 12, "sizeUnit": "feet"
        }"##;
        let design = Design::from_json(json).unwrap();
        let el = &design.pages[0].elements[0];
        assert!((el.frame.width - 1.0).abs() < f64::EPSILON);
        assert!((el.frame.rotation - 315.0).abs() < 1e-9);
        assert_eq!(design.size_unit, SizeUnit::Feet);
    }
}
