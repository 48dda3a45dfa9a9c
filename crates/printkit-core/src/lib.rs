//! PrintKit Core Library
//!
//! Platform-agnostic data model and editing logic for PrintKit print designs:
//! elements, the shape catalog, the element store with undo, and the pointer
//! interaction engine.

pub mod config;
pub mod design;
pub mod element;
pub mod history;
pub mod input;
pub mod insert;
pub mod interaction;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod store;
pub mod units;
pub mod viewport;

pub use config::EditorConfig;
pub use design::{Design, DesignError, DesignResult, Page, PageId};
pub use element::{
    Element, ElementId, ElementKind, ElementPatch, Frame, ImageContent, Rgba, ShapeContent,
    TextAlign, TextContent,
};
pub use input::{Key, KeyInput, Modifiers, PointerButton, PointerEvent};
pub use insert::{TextPreset, TextTier};
pub use interaction::{ContextAction, ContextMenu, Guides, InteractionEngine, InteractionState};
pub use selection::{Handle, HandleKind};
pub use shapes::{ResolvedOutline, ShapeTable, resolve_outline};
pub use snap::SnapResult;
pub use store::{ElementStore, Selection, Snapshot};
pub use units::SizeUnit;
pub use viewport::Viewport;
