//! Pointer and keyboard interaction engine.
//!
//! Turns raw input into [`ElementStore`] mutations. Exactly one
//! [`InteractionState`] is active at a time; every gesture snapshots the store
//! at pointer-down, applies transient updates while moving and commits to
//! history once at pointer-up.

use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementPatch};
use crate::input::{ClickTracker, Key, KeyInput, Modifiers, PointerButton, PointerEvent};
use crate::selection::{self, Handle, HandleKind};
use crate::snap::snap_to_centerlines;
use crate::store::{ElementStore, Snapshot};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use std::time::Instant;

/// Single-element drag.
#[derive(Debug, Clone)]
pub struct DragGesture {
    pub id: ElementId,
    start_pointer: Point,
    start_position: Point,
    before: Snapshot,
}

/// Drag of a multi-selection. No snapping.
#[derive(Debug, Clone)]
pub struct GroupDragGesture {
    start_pointer: Point,
    origins: Vec<(ElementId, Point)>,
    before: Snapshot,
}

impl GroupDragGesture {
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.origins.iter().map(|(id, _)| *id)
    }
}

#[derive(Debug, Clone)]
pub struct ResizeGesture {
    pub id: ElementId,
    pub handle: HandleKind,
    start_pointer: Point,
    start: Element,
    before: Snapshot,
}

#[derive(Debug, Clone)]
pub struct RotateGesture {
    pub id: ElementId,
    before: Snapshot,
}

/// Marquee in canvas coordinates.
#[derive(Debug, Clone)]
pub struct MarqueeGesture {
    start: Point,
    current: Point,
    additive: bool,
}

impl MarqueeGesture {
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PanGesture {
    last: Point,
}

/// The one active interaction.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(DragGesture),
    DraggingGroup(GroupDragGesture),
    Resizing(ResizeGesture),
    Rotating(RotateGesture),
    MarqueeSelecting(MarqueeGesture),
    Panning(PanGesture),
    TextEditing { id: ElementId },
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Dragging(_) => "dragging",
            InteractionState::DraggingGroup(_) => "dragging-group",
            InteractionState::Resizing(_) => "resizing",
            InteractionState::Rotating(_) => "rotating",
            InteractionState::MarqueeSelecting(_) => "marquee",
            InteractionState::Panning(_) => "panning",
            InteractionState::TextEditing { .. } => "text-editing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// A pointer gesture is in flight.
    pub fn is_gesture(&self) -> bool {
        !matches!(self, InteractionState::Idle | InteractionState::TextEditing { .. })
    }
}

/// Alignment guides currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Guides {
    /// Vertical canvas centerline.
    pub vertical: bool,
    /// Horizontal canvas centerline.
    pub horizontal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    BringToFront,
    SendToBack,
    Duplicate,
    Lock,
    Delete,
}

impl ContextAction {
    pub const ALL: [ContextAction; 5] = [
        ContextAction::BringToFront,
        ContextAction::SendToBack,
        ContextAction::Duplicate,
        ContextAction::Lock,
        ContextAction::Delete,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContextAction::BringToFront => "Bring to front",
            ContextAction::SendToBack => "Send to back",
            ContextAction::Duplicate => "Duplicate",
            ContextAction::Lock => "Lock",
            ContextAction::Delete => "Delete",
        }
    }
}

/// Open context menu for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub target: ElementId,
    /// Screen position of the press that opened it.
    pub position: Point,
}

impl ContextMenu {
    pub fn actions(&self) -> &'static [ContextAction] {
        &ContextAction::ALL
    }
}

/// Pointer/keyboard state machine over an [`ElementStore`].
#[derive(Debug, Clone, Default)]
pub struct InteractionEngine {
    pub config: EditorConfig,
    pub viewport: Viewport,
    state: InteractionState,
    guides: Guides,
    context_menu: Option<ContextMenu>,
    clicks: ClickTracker,
    /// Double click completed by a press, dispatched on its release.
    pending_double_click: Option<Point>,
}

impl InteractionEngine {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            viewport: Viewport::with_pixels_per_unit(config.pixels_per_unit),
            config,
            state: InteractionState::Idle,
            guides: Guides::default(),
            context_menu: None,
            clicks: ClickTracker::new(),
            pending_double_click: None,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn guides(&self) -> Guides {
        self.guides
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    /// Marquee rectangle in canvas coordinates, while selecting.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match &self.state {
            InteractionState::MarqueeSelecting(m) => Some(m.rect()),
            _ => None,
        }
    }

    /// Handles of the primary selected element, in screen coordinates.
    pub fn handles(&self, store: &ElementStore) -> Vec<Handle> {
        if matches!(self.state, InteractionState::TextEditing { .. }) {
            return Vec::new();
        }
        store
            .selection()
            .primary()
            .and_then(|id| store.element(id))
            .filter(|e| e.is_interactive())
            .map(|e| selection::handles(&e.frame, &self.viewport, self.config.rotate_handle_offset))
            .unwrap_or_default()
    }

    fn end_gesture(&mut self) {
        self.state = InteractionState::Idle;
        self.guides = Guides::default();
    }

    // --- Pointer ----------------------------------------------------------

    pub fn handle_pointer(&mut self, store: &mut ElementStore, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button, modifiers } => {
                self.pointer_down(store, position, button, modifiers)
            }
            PointerEvent::Move { position, modifiers } => self.pointer_move(store, position, modifiers),
            PointerEvent::Up { position, modifiers, .. } => self.pointer_up(store, position, modifiers),
            PointerEvent::DoubleClick { position } => self.double_click(store, position),
            PointerEvent::Scroll { position, delta, modifiers } => {
                if modifiers.command() {
                    let factor = if delta.y < 0.0 { 1.1 } else { 1.0 / 1.1 };
                    let percent = self.viewport.zoom_percent() * factor;
                    self.viewport.zoom_at(position, percent);
                } else {
                    self.viewport.pan(-delta);
                }
            }
        }
    }

    /// Feed a raw host event stamped with the time it happened.
    ///
    /// For hosts without native double-click events: primary presses go
    /// through a [`ClickTracker`], and the release that ends a second quick
    /// press also dispatches [`PointerEvent::DoubleClick`].
    pub fn handle_pointer_at(&mut self, store: &mut ElementStore, event: PointerEvent, now: Instant) {
        if let PointerEvent::Down { position, button: PointerButton::Primary, .. } = event {
            if self.clicks.register(position, now) {
                self.pending_double_click = Some(position);
            }
        }
        self.handle_pointer(store, event);
        if let PointerEvent::Up { .. } = event {
            if let Some(position) = self.pending_double_click.take() {
                self.double_click(store, position);
            }
        }
    }

    pub fn pointer_down(
        &mut self,
        store: &mut ElementStore,
        position: Point,
        button: PointerButton,
        modifiers: Modifiers,
    ) {
        if self.state.is_gesture() {
            log::debug!("Ignoring pointer down during {}", self.state.name());
            return;
        }
        let canvas = self.viewport.screen_to_canvas(position);

        if let InteractionState::TextEditing { id } = self.state {
            if store.element(id).is_some_and(|e| e.frame.contains(canvas)) {
                return;
            }
            self.state = InteractionState::Idle;
        }
        self.context_menu = None;

        if button == PointerButton::Middle || modifiers.alt {
            self.state = InteractionState::Panning(PanGesture { last: position });
            return;
        }

        if button == PointerButton::Secondary {
            if let Some(id) = store.hit_test(canvas) {
                if !store.selection().contains(id) {
                    store.click_select(id);
                }
                self.context_menu = Some(ContextMenu { target: id, position });
            }
            return;
        }

        if let Some(state) = self.try_start_handle_gesture(store, position) {
            log::debug!("Starting {}", state.name());
            self.state = state;
            return;
        }

        match store.hit_test(canvas) {
            Some(id) => {
                if modifiers.additive() {
                    store.toggle_selection(id);
                    if !store.selection().contains(id) {
                        return;
                    }
                } else {
                    store.click_select(id);
                }
                self.state = self.start_drag(store, id, position);
            }
            None => {
                self.state = InteractionState::MarqueeSelecting(MarqueeGesture {
                    start: canvas,
                    current: canvas,
                    additive: modifiers.additive(),
                });
            }
        }
        log::debug!("Starting {}", self.state.name());
    }

    fn try_start_handle_gesture(&self, store: &ElementStore, position: Point) -> Option<InteractionState> {
        let element = store.element(store.selection().primary()?)?;
        if !element.is_interactive() {
            return None;
        }
        let handle = selection::hit_test_handles(
            &element.frame,
            &self.viewport,
            self.config.rotate_handle_offset,
            position,
            self.config.handle_hit_tolerance,
        )?;
        let before = store.snapshot();
        Some(match handle {
            HandleKind::Rotate => InteractionState::Rotating(RotateGesture { id: element.id, before }),
            _ => InteractionState::Resizing(ResizeGesture {
                id: element.id,
                handle,
                start_pointer: position,
                start: element.clone(),
                before,
            }),
        })
    }

    fn start_drag(&self, store: &ElementStore, id: ElementId, position: Point) -> InteractionState {
        let before = store.snapshot();
        if store.selection().is_multi() {
            let origins = store
                .selected_elements()
                .iter()
                .map(|e| (e.id, Point::new(e.frame.x, e.frame.y)))
                .collect();
            InteractionState::DraggingGroup(GroupDragGesture {
                start_pointer: position,
                origins,
                before,
            })
        } else {
            let start_position = store
                .element(id)
                .map(|e| Point::new(e.frame.x, e.frame.y))
                .unwrap_or_default();
            InteractionState::Dragging(DragGesture {
                id,
                start_pointer: position,
                start_position,
                before,
            })
        }
    }

    pub fn pointer_move(&mut self, store: &mut ElementStore, position: Point, modifiers: Modifiers) {
        let tolerance = self.config.snap_tolerance;
        let canvas_size = store.canvas_size();
        match &mut self.state {
            InteractionState::Dragging(drag) => {
                let Some(element) = store.element(drag.id) else {
                    log::debug!("Drag target {} vanished", drag.id);
                    self.end_gesture();
                    return;
                };
                let size = Size::new(element.frame.width, element.frame.height);
                let delta = self.viewport.screen_delta_to_canvas(position - drag.start_pointer);
                let snap = snap_to_centerlines(drag.start_position + delta, size, canvas_size, tolerance);
                store.apply_transient(drag.id, &ElementPatch::position(snap.point.x, snap.point.y));
                self.guides = Guides {
                    vertical: snap.snapped_x,
                    horizontal: snap.snapped_y,
                };
            }
            InteractionState::DraggingGroup(group) => {
                let delta = self.viewport.screen_delta_to_canvas(position - group.start_pointer);
                let mut moved = false;
                for (id, origin) in &group.origins {
                    let target = *origin + delta;
                    moved |= store.apply_transient(*id, &ElementPatch::position(target.x, target.y));
                }
                if !moved {
                    self.end_gesture();
                }
            }
            InteractionState::Resizing(resize) => {
                if store.element(resize.id).is_none() {
                    self.end_gesture();
                    return;
                }
                let delta = self.viewport.screen_delta_to_canvas(position - resize.start_pointer);
                let patch = selection::resize_patch(&resize.start, resize.handle, delta, modifiers.additive());
                store.apply_transient(resize.id, &patch);
            }
            InteractionState::Rotating(rotate) => {
                let Some(element) = store.element(rotate.id) else {
                    self.end_gesture();
                    return;
                };
                let center = self.viewport.canvas_to_screen(element.frame.center());
                let snap = modifiers.shift.then_some(self.config.rotation_snap_degrees);
                let rotation = selection::rotation_from_pointer(center, position, snap);
                store.apply_transient(rotate.id, &ElementPatch::rotation(rotation));
            }
            InteractionState::MarqueeSelecting(marquee) => {
                marquee.current = self.viewport.screen_to_canvas(position);
            }
            InteractionState::Panning(pan) => {
                let delta = position - pan.last;
                pan.last = position;
                self.viewport.pan(delta);
            }
            InteractionState::Idle | InteractionState::TextEditing { .. } => {}
        }
    }

    pub fn pointer_up(&mut self, store: &mut ElementStore, position: Point, modifiers: Modifiers) {
        if self.state.is_gesture() {
            self.pointer_move(store, position, modifiers);
        }
        match std::mem::take(&mut self.state) {
            InteractionState::Dragging(DragGesture { id, before, .. })
            | InteractionState::Resizing(ResizeGesture { id, before, .. })
            | InteractionState::Rotating(RotateGesture { id, before }) => {
                if store.element(id).is_some() && store.commit(before) {
                    log::debug!("Committed gesture on {}", id);
                }
            }
            InteractionState::DraggingGroup(group) => {
                let alive = group.ids().any(|id| store.element(id).is_some());
                if alive && store.commit(group.before) {
                    log::debug!("Committed group drag of {} elements", group.origins.len());
                }
            }
            InteractionState::MarqueeSelecting(marquee) => self.finish_marquee(store, &marquee),
            InteractionState::TextEditing { id } => {
                self.state = InteractionState::TextEditing { id };
            }
            InteractionState::Panning(_) | InteractionState::Idle => {}
        }
        self.guides = Guides::default();
    }

    fn finish_marquee(&mut self, store: &mut ElementStore, marquee: &MarqueeGesture) {
        let rect = marquee.rect();
        let min = self.config.min_marquee_size;
        if rect.width() < min || rect.height() < min {
            if !marquee.additive {
                store.clear_selection();
            }
            return;
        }
        let mut ids = store.elements_in_rect(rect);
        if marquee.additive {
            let mut merged = store.selection().ids().to_vec();
            merged.extend(ids.into_iter().filter(|id| !store.selection().contains(*id)));
            ids = merged;
        }
        log::debug!("Marquee selected {} elements", ids.len());
        store.set_selection(&ids, None);
    }

    pub fn double_click(&mut self, store: &mut ElementStore, position: Point) {
        if self.state.is_gesture() {
            return;
        }
        let canvas = self.viewport.screen_to_canvas(position);
        if let Some(id) = store.hit_test(canvas).filter(|id| store.element(*id).is_some_and(|e| e.is_text())) {
            store.set_selection(&[id], Some(id));
            self.context_menu = None;
            self.state = InteractionState::TextEditing { id };
        }
    }

    // --- Keyboard ---------------------------------------------------------

    /// Handle a key press. Returns true when the key was consumed.
    pub fn handle_key(&mut self, store: &mut ElementStore, input: KeyInput) -> bool {
        if input.text_field_focused {
            return false;
        }
        if let InteractionState::TextEditing { .. } = self.state {
            if input.key == Key::Escape {
                self.state = InteractionState::Idle;
                return true;
            }
            return false;
        }

        match input.key {
            Key::Escape => {
                store.clear_selection();
                self.context_menu = None;
                true
            }
            Key::Delete | Key::Backspace => {
                self.context_menu = None;
                self.delete_selection(store) > 0
            }
            _ if self.state.is_gesture() => false,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                let step = self.config.nudge_step * if input.modifiers.shift { 10.0 } else { 1.0 };
                let delta = match input.key {
                    Key::ArrowUp => Vec2::new(0.0, -step),
                    Key::ArrowDown => Vec2::new(0.0, step),
                    Key::ArrowLeft => Vec2::new(-step, 0.0),
                    _ => Vec2::new(step, 0.0),
                };
                self.nudge(store, delta)
            }
            Key::Character(_) if input.modifiers.command() => {
                if input.is_char('z') {
                    if input.modifiers.shift { store.redo() } else { store.undo() }
                } else if input.is_char('y') {
                    store.redo()
                } else if input.is_char('a') {
                    store.select_all();
                    true
                } else if input.is_char('d') {
                    let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
                    !store.duplicate_selection(offset).is_empty()
                } else {
                    false
                }
            }
            Key::Character(_) => false,
        }
    }

    /// Remove the whole selection when several are selected, else the primary.
    fn delete_selection(&mut self, store: &mut ElementStore) -> usize {
        let ids: Vec<ElementId> = if store.selection().is_multi() {
            store.selection().ids().to_vec()
        } else {
            store.selection().primary().into_iter().collect()
        };
        store.remove_elements(&ids)
    }

    fn nudge(&mut self, store: &mut ElementStore, delta: Vec2) -> bool {
        let targets: Vec<(ElementId, Point)> = store
            .selected_elements()
            .iter()
            .map(|e| (e.id, Point::new(e.frame.x, e.frame.y) + delta))
            .collect();
        if targets.is_empty() {
            return false;
        }
        let before = store.snapshot();
        for (id, target) in targets {
            store.apply_transient(id, &ElementPatch::position(target.x, target.y));
        }
        store.commit(before)
    }

    // --- Context menu -----------------------------------------------------

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    /// Run a context-menu action on the menu's target and close the menu.
    pub fn run_context_action(&mut self, store: &mut ElementStore, action: ContextAction) -> bool {
        let Some(menu) = self.context_menu.take() else {
            return false;
        };
        let id = menu.target;
        match action {
            ContextAction::BringToFront => store.bring_to_front(id),
            ContextAction::SendToBack => store.send_to_back(id),
            ContextAction::Duplicate => {
                store.set_selection(&[id], Some(id));
                let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
                !store.duplicate_selection(offset).is_empty()
            }
            ContextAction::Lock => store.set_locked(&[id], true),
            ContextAction::Delete => store.remove_elements(&[id]) > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, Frame, Rgba, ShapeContent, TextContent};
    use crate::selection::Corner;
    use crate::units::SizeUnit;

    const PX: f64 = crate::config::PIXELS_PER_UNIT;

    fn shape(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new(
            Frame::new(x, y, w, h, 0.0),
            ElementKind::Shape(ShapeContent::new("rectangle", Rgba::BLACK)),
        )
    }

    fn setup() -> (InteractionEngine, ElementStore) {
        let config = EditorConfig::default();
        let store = ElementStore::new(24.0, 18.0, SizeUnit::Inches).with_config(&config);
        (InteractionEngine::new(config), store)
    }

    /// Screen point for a canvas point at the default viewport.
    fn sp(x: f64, y: f64) -> Point {
        Point::new(x * PX, y * PX)
    }

    fn press(engine: &mut InteractionEngine, store: &mut ElementStore, at: Point, modifiers: Modifiers) {
        engine.handle_pointer(
            store,
            PointerEvent::Down {
                position: at,
                button: PointerButton::Primary,
                modifiers,
            },
        );
    }

    fn drag(engine: &mut InteractionEngine, store: &mut ElementStore, to: Point, modifiers: Modifiers) {
        engine.handle_pointer(store, PointerEvent::Move { position: to, modifiers });
    }

    fn release(engine: &mut InteractionEngine, store: &mut ElementStore, at: Point, modifiers: Modifiers) {
        engine.handle_pointer(
            store,
            PointerEvent::Up {
                position: at,
                button: PointerButton::Primary,
                modifiers,
            },
        );
    }

    #[test]
    fn test_text_corner_resize_via_handle() {
        let (mut engine, mut store) = setup();
        let id = store.add_element(Element::new(
            Frame::new(1.0, 1.0, 5.0, 2.0, 0.0),
            ElementKind::Text(TextContent::new("Hi", "Inter", 1.0)),
        ));
        store.set_selection(&[id], Some(id));

        press(&mut engine, &mut store, sp(6.0, 3.0), Modifiers::NONE);
        match engine.state() {
            InteractionState::Resizing(r) => {
                assert_eq!(r.handle, HandleKind::Corner(Corner::BottomRight))
            }
            other => panic!("Expected resizing, got {}", other.name()),
        }
        drag(&mut engine, &mut store, sp(8.0, 5.0), Modifiers::NONE);
        release(&mut engine, &mut store, sp(8.0, 5.0), Modifiers::NONE);

        let el = store.element(id).unwrap();
        assert!((el.frame.width - 7.0).abs() < 1e-9);
        assert!((el.frame.height - 4.0).abs() < 1e-9);
        assert!((el.frame.x - 1.0).abs() < 1e-9);
        assert!((el.frame.y - 1.0).abs() < 1e-9);
        assert!(engine.state().is_idle());
    }

    #[test]
    fn test_drag_snaps_to_center() {
        let (mut engine, mut store) = setup();
        let id = store.add_element(shape(2.0, 2.0, 4.0, 2.0));

        press(&mut engine, &mut store, sp(4.0, 3.0), Modifiers::NONE);
        assert!(matches!(engine.state(), InteractionState::Dragging(_)));
        // Center lands at x = 12.1, within tolerance of 12
        drag(&mut engine, &mut store, sp(12.1, 3.0), Modifiers::NONE);
        assert!(engine.guides().vertical);
        assert!(!engine.guides().horizontal);
        assert_eq!(store.element(id).unwrap().frame.x, (24.0 - 4.0) / 2.0);

        release(&mut engine, &mut store, sp(12.1, 3.0), Modifiers::NONE);
        assert_eq!(store.element(id).unwrap().frame.x, 10.0);
        assert_eq!(engine.guides(), Guides::default());
    }

    #[test]
    fn test_drag_commits_once() {
        let (mut engine, mut store) = setup();
        let id = store.add_element(shape(2.0, 2.0, 2.0, 2.0));

        press(&mut engine, &mut store, sp(3.0, 3.0), Modifiers::NONE);
        for i in 1..20 {
            drag(&mut engine, &mut store, sp(3.0 + i as f64 * 0.1, 3.0), Modifiers::NONE);
        }
        release(&mut engine, &mut store, sp(5.0, 3.0), Modifiers::NONE);
        assert!((store.element(id).unwrap().frame.x - 4.0).abs() < 1e-9);

        // One undo reverts the whole drag, the next removes the element
        assert!(store.undo());
        assert!((store.element(id).unwrap().frame.x - 2.0).abs() < 1e-9);
        assert!(store.undo());
        assert!(store.is_empty());
    }

    #[test]
    fn test_group_drag_moves_all_without_snap() {
        let (mut engine, mut store) = setup();
        let a = store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        let b = store.add_element(shape(5.0, 5.0, 2.0, 2.0));
        store.set_selection(&[a, b], Some(a));

        // Plain click on a member keeps the group
        press(&mut engine, &mut store, sp(2.0, 2.0), Modifiers::NONE);
        assert!(matches!(engine.state(), InteractionState::DraggingGroup(_)));
        // Would put a's center at 11.95, close to 12, but groups do not snap
        drag(&mut engine, &mut store, sp(11.95, 2.0), Modifiers::NONE);
        release(&mut engine, &mut store, sp(11.95, 2.0), Modifiers::NONE);

        assert!((store.element(a).unwrap().frame.x - 10.95).abs() < 1e-9);
        assert!((store.element(b).unwrap().frame.x - 14.95).abs() < 1e-9);
        assert!(!engine.guides().vertical);
        assert_eq!(store.selection().len(), 2);
    }

    #[test]
    fn test_pointer_down_ignored_during_gesture() {
        let (mut engine, mut store) = setup();
        store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        press(&mut engine, &mut store, sp(2.0, 2.0), Modifiers::NONE);
        assert!(matches!(engine.state(), InteractionState::Dragging(_)));
        press(&mut engine, &mut store, sp(20.0, 15.0), Modifiers::NONE);
        assert!(matches!(engine.state(), InteractionState::Dragging(_)));
    }

    #[test]
    fn test_rotate_gesture() {
        let (mut engine, mut store) = setup();
        let id = store.add_element(shape(4.0, 4.0, 2.0, 2.0));
        store.set_selection(&[id], Some(id));

        let handle = engine
            .handles(&store)
            .into_iter()
            .find(|h| h.kind == HandleKind::Rotate)
            .unwrap();
        press(&mut engine, &mut store, handle.position, Modifiers::NONE);
        assert!(matches!(engine.state(), InteractionState::Rotating(_)));

        // Pointer to the right of the center: a quarter turn
        let center = sp(5.0, 5.0);
        drag(&mut engine, &mut store, center + Vec2::new(100.0, 0.0), Modifiers::NONE);
        assert!((store.element(id).unwrap().frame.rotation - 90.0).abs() < 1e-9);

        // Up-left with shift snaps to 15°
        let p = center + Vec2::new(-100.0, -104.0);
        release(&mut engine, &mut store, p, Modifiers::SHIFT);
        let rotation = store.element(id).unwrap().frame.rotation;
        assert!((0.0..360.0).contains(&rotation));
        assert!((rotation - 315.0).abs() < 1e-9);
    }

    #[test]
    fn test_marquee_selects_overlapping_unlocked() {
        let (mut engine, mut store) = setup();
        let a = store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        let b = store.add_element(shape(2.0, 2.0, 2.0, 2.0));
        let mut background = shape(0.0, 0.0, 24.0, 18.0);
        background.locked = true;
        let bg = store.add_element(background);
        store.send_to_back(bg);
        let far = store.add_element(shape(15.0, 15.0, 2.0, 2.0));

        // Press lands on the locked background: starts a marquee
        press(&mut engine, &mut store, sp(0.5, 0.5), Modifiers::NONE);
        assert!(matches!(engine.state(), InteractionState::MarqueeSelecting(_)));
        drag(&mut engine, &mut store, sp(2.5, 2.5), Modifiers::NONE);
        assert!(engine.marquee_rect().is_some());
        release(&mut engine, &mut store, sp(2.5, 2.5), Modifiers::NONE);

        let selected = store.selection().ids();
        assert!(selected.contains(&a));
        assert!(selected.contains(&b));
        assert!(!selected.contains(&bg));
        assert!(!selected.contains(&far));
    }

    #[test]
    fn test_tiny_marquee() {
        let (mut engine, mut store) = setup();
        let a = store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        store.set_selection(&[a], Some(a));

        press(&mut engine, &mut store, sp(10.0, 10.0), Modifiers::SHIFT);
        release(&mut engine, &mut store, sp(10.0, 10.0), Modifiers::SHIFT);
        assert_eq!(store.selection().ids(), &[a]);

        press(&mut engine, &mut store, sp(10.0, 10.0), Modifiers::NONE);
        release(&mut engine, &mut store, sp(10.0, 10.0), Modifiers::NONE);
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_timed_clicks_enter_text_editing() {
        let (mut engine, mut store) = setup();
        let id = store.add_element(Element::new(
            Frame::new(2.0, 2.0, 6.0, 2.0, 0.0),
            ElementKind::Text(TextContent::new("Hi", "Inter", 1.0)),
        ));
        let at = sp(4.0, 3.0);
        let down = PointerEvent::Down {
            position: at,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        };
        let up = PointerEvent::Up {
            position: at,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        };
        let t0 = Instant::now();

        engine.handle_pointer_at(&mut store, down, t0);
        engine.handle_pointer_at(&mut store, up, t0);
        assert!(engine.state().is_idle());

        let later = t0 + std::time::Duration::from_millis(150);
        engine.handle_pointer_at(&mut store, down, later);
        engine.handle_pointer_at(&mut store, up, later);
        assert!(matches!(engine.state(), InteractionState::TextEditing { id: editing } if *editing == id));

        // Far apart in time: stays a plain click
        let (mut engine, mut store) = setup();
        store.add_element(Element::new(
            Frame::new(2.0, 2.0, 6.0, 2.0, 0.0),
            ElementKind::Text(TextContent::new("Hi", "Inter", 1.0)),
        ));
        engine.handle_pointer_at(&mut store, down, t0);
        engine.handle_pointer_at(&mut store, up, t0);
        let slow = t0 + std::time::Duration::from_secs(2);
        engine.handle_pointer_at(&mut store, down, slow);
        engine.handle_pointer_at(&mut store, up, slow);
        assert!(engine.state().is_idle());
    }

    #[test]
    fn test_line_marquee_selects_nothing() {
        let (mut engine, mut store) = setup();
        store.add_element(shape(1.0, 1.0, 2.0, 2.0));

        // Zero width, but crosses the element vertically
        press(&mut engine, &mut store, sp(2.0, 0.5), Modifiers::NONE);
        drag(&mut engine, &mut store, sp(2.0, 4.0), Modifiers::NONE);
        release(&mut engine, &mut store, sp(2.0, 4.0), Modifiers::NONE);
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_marquee_includes_hidden_unlocked() {
        let (mut engine, mut store) = setup();
        let mut hidden = shape(1.0, 1.0, 1.0, 1.0);
        hidden.visible = false;
        let id = store.add_element(hidden);

        press(&mut engine, &mut store, sp(0.5, 0.5), Modifiers::NONE);
        drag(&mut engine, &mut store, sp(3.0, 3.0), Modifiers::NONE);
        release(&mut engine, &mut store, sp(3.0, 3.0), Modifiers::NONE);
        assert_eq!(store.selection().ids(), &[id]);
    }

    #[test]
    fn test_additive_marquee_keeps_prior() {
        let (mut engine, mut store) = setup();
        let a = store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        let b = store.add_element(shape(10.0, 10.0, 2.0, 2.0));
        store.set_selection(&[a], Some(a));

        press(&mut engine, &mut store, sp(9.0, 9.0), Modifiers::SHIFT);
        release(&mut engine, &mut store, sp(13.0, 13.0), Modifiers::SHIFT);
        assert_eq!(store.selection().ids(), &[a, b]);
    }

    #[test]
    fn test_shift_click_toggles() {
        let (mut engine, mut store) = setup();
        let a = store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        let b = store.add_element(shape(10.0, 10.0, 2.0, 2.0));

        press(&mut engine, &mut store, sp(2.0, 2.0), Modifiers::NONE);
        release(&mut engine, &mut store, sp(2.0, 2.0), Modifiers::NONE);
        press(&mut engine, &mut store, sp(11.0, 11.0), Modifiers::SHIFT);
        release(&mut engine, &mut store, sp(11.0, 11.0), Modifiers::SHIFT);
        assert_eq!(store.selection().ids(), &[a, b]);

        press(&mut engine, &mut store, sp(2.0, 2.0), Modifiers::SHIFT);
        assert!(engine.state().is_idle());
        assert_eq!(store.selection().ids(), &[b]);
    }

    #[test]
    fn test_delete_skips_locked() {
        let (mut engine, mut store) = setup();
        let mut l1 = shape(1.0, 1.0, 2.0, 2.0);
        l1.locked = true;
        let mut l2 = shape(4.0, 1.0, 2.0, 2.0);
        l2.locked = true;
        let l1 = store.add_element(l1);
        let l2 = store.add_element(l2);
        let free = store.add_element(shape(8.0, 1.0, 2.0, 2.0));

        store.set_selection(&[l1, l2, free], Some(free));
        assert_eq!(store.selection().ids(), &[free]);

        assert!(engine.handle_key(&mut store, KeyInput::new(Key::Delete)));
        assert!(store.element(free).is_none());
        assert!(store.element(l1).is_some());
        assert!(store.element(l2).is_some());
    }

    #[test]
    fn test_delete_ignored_in_text_field_and_editing() {
        let (mut engine, mut store) = setup();
        let id = store.add_element(Element::new(
            Frame::new(1.0, 1.0, 4.0, 2.0, 0.0),
            ElementKind::Text(TextContent::new("Hi", "Inter", 1.0)),
        ));
        store.set_selection(&[id], Some(id));

        assert!(!engine.handle_key(&mut store, KeyInput::new(Key::Backspace).in_text_field()));
        assert!(store.element(id).is_some());

        engine.handle_pointer(&mut store, PointerEvent::DoubleClick { position: sp(2.0, 2.0) });
        assert!(matches!(engine.state(), InteractionState::TextEditing { .. }));
        assert!(!engine.handle_key(&mut store, KeyInput::new(Key::Delete)));
        assert!(store.element(id).is_some());
        assert!(engine.handles(&store).is_empty());

        assert!(engine.handle_key(&mut store, KeyInput::new(Key::Escape)));
        assert!(engine.state().is_idle());
    }

    #[test]
    fn test_vanished_element_ends_gesture() {
        let (mut engine, mut store) = setup();
        let id = store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        press(&mut engine, &mut store, sp(2.0, 2.0), Modifiers::NONE);
        assert!(engine.handle_key(&mut store, KeyInput::new(Key::Delete)));
        let undo_depth_before = store.can_undo();

        drag(&mut engine, &mut store, sp(5.0, 5.0), Modifiers::NONE);
        assert!(engine.state().is_idle());
        release(&mut engine, &mut store, sp(5.0, 5.0), Modifiers::NONE);
        assert!(store.element(id).is_none());
        assert_eq!(store.can_undo(), undo_depth_before);
    }

    #[test]
    fn test_alt_pans() {
        let (mut engine, mut store) = setup();
        store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        press(&mut engine, &mut store, sp(2.0, 2.0), Modifiers::ALT);
        assert!(matches!(engine.state(), InteractionState::Panning(_)));
        drag(&mut engine, &mut store, sp(2.0, 2.0) + Vec2::new(40.0, 10.0), Modifiers::ALT);
        release(&mut engine, &mut store, sp(2.0, 2.0) + Vec2::new(40.0, 10.0), Modifiers::ALT);
        assert_eq!(engine.viewport.offset, Vec2::new(40.0, 10.0));
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_middle_button_pans() {
        let (mut engine, mut store) = setup();
        engine.handle_pointer(
            &mut store,
            PointerEvent::Down {
                position: Point::new(10.0, 10.0),
                button: PointerButton::Middle,
                modifiers: Modifiers::NONE,
            },
        );
        assert!(matches!(engine.state(), InteractionState::Panning(_)));
    }

    #[test]
    fn test_drag_at_zoom_uses_scale_factor() {
        let (mut engine, mut store) = setup();
        engine.viewport.set_zoom_percent(200.0);
        let id = store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        let scale = engine.viewport.scale_factor();
        let start = Point::new(2.0 * scale, 2.0 * scale);
        press(&mut engine, &mut store, start, Modifiers::NONE);
        release(&mut engine, &mut store, start + Vec2::new(scale, 0.0), Modifiers::NONE);
        assert!((store.element(id).unwrap().frame.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let (mut engine, mut store) = setup();
        let a = store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        let b = store.add_element(shape(5.0, 1.0, 2.0, 2.0));

        assert!(engine.handle_key(&mut store, KeyInput::new(Key::Character('a')).with_modifiers(Modifiers::CTRL)));
        assert_eq!(store.selection().ids(), &[a, b]);

        assert!(engine.handle_key(&mut store, KeyInput::new(Key::ArrowRight).with_modifiers(Modifiers::SHIFT)));
        assert!((store.element(a).unwrap().frame.x - 2.0).abs() < 1e-9);
        assert!((store.element(b).unwrap().frame.x - 6.0).abs() < 1e-9);

        assert!(engine.handle_key(&mut store, KeyInput::new(Key::Character('z')).with_modifiers(Modifiers::CTRL)));
        assert!((store.element(a).unwrap().frame.x - 1.0).abs() < 1e-9);

        let redo = Modifiers { shift: true, ctrl: true, ..Modifiers::NONE };
        assert!(engine.handle_key(&mut store, KeyInput::new(Key::Character('Z')).with_modifiers(redo)));
        assert!((store.element(a).unwrap().frame.x - 2.0).abs() < 1e-9);

        assert!(engine.handle_key(&mut store, KeyInput::new(Key::Character('d')).with_modifiers(Modifiers::CTRL)));
        assert_eq!(store.len(), 4);
        assert_eq!(store.selection().len(), 2);

        assert!(engine.handle_key(&mut store, KeyInput::new(Key::Escape)));
        assert!(store.selection().is_empty());
        assert!(!engine.handle_key(&mut store, KeyInput::new(Key::Character('q'))));
    }

    #[test]
    fn test_context_menu() {
        let (mut engine, mut store) = setup();
        let a = store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        let b = store.add_element(shape(1.5, 1.5, 2.0, 2.0));

        engine.handle_pointer(
            &mut store,
            PointerEvent::Down {
                position: sp(1.2, 1.2),
                button: PointerButton::Secondary,
                modifiers: Modifiers::NONE,
            },
        );
        let menu = engine.context_menu().unwrap();
        assert_eq!(menu.target, a);
        assert_eq!(menu.actions().len(), 5);
        assert_eq!(store.selection().primary(), Some(a));
        assert!(engine.state().is_idle());

        assert!(engine.run_context_action(&mut store, ContextAction::BringToFront));
        assert_eq!(store.index_of(a), Some(1));
        assert_eq!(store.index_of(b), Some(0));
        assert!(engine.context_menu().is_none());

        engine.handle_pointer(
            &mut store,
            PointerEvent::Down {
                position: sp(1.2, 1.2),
                button: PointerButton::Secondary,
                modifiers: Modifiers::NONE,
            },
        );
        assert!(engine.handle_key(&mut store, KeyInput::new(Key::Escape)));
        assert!(engine.context_menu().is_none());

        engine.handle_pointer(
            &mut store,
            PointerEvent::Down {
                position: sp(1.2, 1.2),
                button: PointerButton::Secondary,
                modifiers: Modifiers::NONE,
            },
        );
        assert!(engine.run_context_action(&mut store, ContextAction::Lock));
        assert!(store.element(a).unwrap().locked);
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_resized_sizes_stay_positive() {
        let (mut engine, mut store) = setup();
        let id = store.add_element(shape(4.0, 4.0, 3.0, 3.0));
        store.set_selection(&[id], Some(id));
        press(&mut engine, &mut store, sp(4.0, 4.0), Modifiers::NONE);
        assert!(matches!(engine.state(), InteractionState::Resizing(_)));
        drag(&mut engine, &mut store, sp(20.0, 20.0), Modifiers::NONE);
        release(&mut engine, &mut store, sp(20.0, 20.0), Modifiers::NONE);
        let el = store.element(id).unwrap();
        assert!(el.frame.width >= 1.0 && el.frame.height >= 1.0);
        assert!((el.frame.x + el.frame.width - 7.0).abs() < 1e-9);
    }
}
