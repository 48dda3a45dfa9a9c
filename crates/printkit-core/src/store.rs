//! Element store: pages, z-ordered elements, selection and undo history.

use crate::config::EditorConfig;
use crate::design::{Design, Page, default_page_label};
use crate::element::{Element, ElementId, ElementPatch};
use crate::history::History;
use crate::units::SizeUnit;
use kurbo::{Point, Rect, Size, Vec2};
use std::sync::Arc;

/// Selected elements plus the primary one that shows handles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    primary: Option<ElementId>,
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn primary(&self) -> Option<ElementId> {
        self.primary
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_multi(&self) -> bool {
        self.ids.len() > 1
    }
}

/// State captured for undo: every page plus which one was active.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pages: Vec<Page>,
    active_page: usize,
}

impl Snapshot {
    fn same_as(&self, other: &Snapshot) -> bool {
        self.active_page == other.active_page
            && self.pages.len() == other.pages.len()
            && self
                .pages
                .iter()
                .zip(&other.pages)
                .all(|(a, b)| {
                    a.id == b.id
                        && a.label == b.label
                        && (Arc::ptr_eq(&a.elements, &b.elements) || a.elements == b.elements)
                })
    }
}

/// The in-memory design being edited.
///
/// Element operations target the active page. Array position is z-order:
/// index 0 paints first, the last element is on top.
#[derive(Debug, Clone)]
pub struct ElementStore {
    pages: Vec<Page>,
    active_page: usize,
    selection: Selection,
    history: History<Snapshot>,
    canvas_size: Size,
    size_unit: SizeUnit,
}

impl ElementStore {
    /// A store with a single blank front page.
    pub fn new(canvas_width: f64, canvas_height: f64, size_unit: SizeUnit) -> Self {
        Self {
            pages: vec![Page::new(default_page_label(0))],
            active_page: 0,
            selection: Selection::default(),
            history: History::default(),
            canvas_size: Size::new(canvas_width, canvas_height),
            size_unit,
        }
    }

    pub fn with_undo_depth(mut self, depth: usize) -> Self {
        self.history = History::with_depth(depth);
        self
    }

    /// Apply the store-side editor settings (undo depth).
    pub fn with_config(self, config: &EditorConfig) -> Self {
        self.with_undo_depth(config.undo_depth)
    }

    pub fn from_design(design: Design) -> Self {
        let mut store = Self::new(design.canvas_width, design.canvas_height, design.size_unit);
        if !design.pages.is_empty() {
            store.pages = design.pages;
        }
        store
    }

    pub fn to_design(&self) -> Design {
        Design {
            pages: self.pages.clone(),
            canvas_width: self.canvas_size.width,
            canvas_height: self.canvas_size.height,
            size_unit: self.size_unit,
        }
    }

    // --- Canvas -----------------------------------------------------------

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    pub fn size_unit(&self) -> SizeUnit {
        self.size_unit
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64, size_unit: SizeUnit) {
        self.canvas_size = Size::new(width, height);
        self.size_unit = size_unit;
    }

    // --- Reads ------------------------------------------------------------

    fn page(&self) -> &Page {
        &self.pages[self.active_page]
    }

    /// Snapshot of the active page's elements in z-order.
    pub fn elements(&self) -> Arc<Vec<Element>> {
        Arc::clone(&self.page().elements)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.page().elements.iter().find(|e| e.id == id)
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.page().elements.iter().position(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.page().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page().elements.is_empty()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_elements(&self) -> Vec<&Element> {
        self.selection
            .ids
            .iter()
            .filter_map(|id| self.element(*id))
            .collect()
    }

    /// Topmost unlocked element under a canvas point.
    pub fn hit_test(&self, point: Point) -> Option<ElementId> {
        self.page()
            .elements
            .iter()
            .rev()
            .find(|e| e.is_interactive() && e.frame.contains(point))
            .map(|e| e.id)
    }

    /// Unlocked elements whose bounding box overlaps `rect`.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.page()
            .elements
            .iter()
            .filter(|e| e.is_interactive())
            .filter(|e| {
                let bbox = e.frame.bounding_box();
                bbox.x0 <= rect.x1 && bbox.x1 >= rect.x0 && bbox.y0 <= rect.y1 && bbox.y1 >= rect.y0
            })
            .map(|e| e.id)
            .collect()
    }

    // --- Low-level mutation -----------------------------------------------

    fn elements_mut(&mut self) -> &mut Vec<Element> {
        Arc::make_mut(&mut self.pages[self.active_page].elements)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pages: self.pages.clone(),
            active_page: self.active_page,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.pages = snapshot.pages;
        self.active_page = snapshot.active_page.min(self.pages.len().saturating_sub(1));
        self.prune_selection();
    }

    /// Push `before` onto the undo stack if anything changed since.
    ///
    /// Gestures take a snapshot at pointer-down, apply transient updates and
    /// call this once at pointer-up.
    pub fn commit(&mut self, before: Snapshot) -> bool {
        if before.same_as(&self.snapshot()) {
            return false;
        }
        self.history.push(before);
        true
    }

    /// Apply a patch without recording history. Locked elements are skipped.
    pub fn apply_transient(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if self.page().elements[index].locked {
            return false;
        }
        self.elements_mut()[index].apply_patch(patch);
        true
    }

    fn prune_selection(&mut self) {
        let page = &self.pages[self.active_page];
        let keep = |id: &ElementId| page.elements.iter().any(|e| e.id == *id && !e.locked);
        self.selection.ids.retain(keep);
        if self.selection.primary.is_some_and(|p| !self.selection.ids.contains(&p)) {
            self.selection.primary = self.selection.ids.last().copied();
        }
    }

    // --- Element operations -----------------------------------------------

    /// Append an element on top of the z-order.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let before = self.snapshot();
        let id = element.id;
        log::debug!("Adding {} element {}", element.kind.type_name(), id);
        self.elements_mut().push(element);
        self.commit(before);
        id
    }

    /// Merge a patch into an element.
    ///
    /// Locked elements only accept patches that change the lock flag.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if self.page().elements[index].locked && patch.locked.is_none() {
            return false;
        }
        let before = self.snapshot();
        self.elements_mut()[index].apply_patch(patch);
        self.prune_selection();
        self.commit(before)
    }

    /// Remove elements by id, skipping locked ones. Returns how many were removed.
    pub fn remove_elements(&mut self, ids: &[ElementId]) -> usize {
        let removable: Vec<ElementId> = ids
            .iter()
            .copied()
            .filter(|id| self.element(*id).is_some_and(|e| !e.locked))
            .collect();
        if removable.is_empty() {
            return 0;
        }
        let before = self.snapshot();
        self.elements_mut().retain(|e| !removable.contains(&e.id));
        self.prune_selection();
        self.commit(before);
        log::debug!("Removed {} elements", removable.len());
        removable.len()
    }

    /// Move an element to `to_index` in the z-order (clamped).
    pub fn reorder(&mut self, id: ElementId, to_index: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        if self.page().elements[from].locked {
            return false;
        }
        let to = to_index.min(self.len() - 1);
        if from == to {
            return false;
        }
        let before = self.snapshot();
        let elements = self.elements_mut();
        let element = elements.remove(from);
        elements.insert(to, element);
        self.commit(before)
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        self.reorder(id, usize::MAX)
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        self.reorder(id, 0)
    }

    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(index) => self.reorder(id, index + 1),
            None => false,
        }
    }

    pub fn send_backward(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => self.reorder(id, index - 1),
            _ => false,
        }
    }

    /// Lock or unlock elements. Newly locked elements leave the selection.
    pub fn set_locked(&mut self, ids: &[ElementId], locked: bool) -> bool {
        let before = self.snapshot();
        let targets: Vec<usize> = ids.iter().filter_map(|id| self.index_of(*id)).collect();
        for index in targets {
            if self.page().elements[index].locked != locked {
                self.elements_mut()[index].locked = locked;
            }
        }
        self.prune_selection();
        self.commit(before)
    }

    /// Clone the selection with fresh ids, offset, on top. The copies become
    /// the new selection.
    pub fn duplicate_selection(&mut self, offset: Vec2) -> Vec<ElementId> {
        let copies: Vec<Element> = self
            .page()
            .elements
            .iter()
            .filter(|e| self.selection.contains(e.id))
            .map(|e| {
                let mut copy = e.duplicate();
                copy.frame = copy.frame.translated(offset);
                copy
            })
            .collect();
        if copies.is_empty() {
            return Vec::new();
        }
        let before = self.snapshot();
        let ids: Vec<ElementId> = copies.iter().map(|e| e.id).collect();
        self.elements_mut().extend(copies);
        self.commit(before);
        let primary = ids.last().copied();
        self.set_selection(&ids, primary);
        ids
    }

    // --- Selection --------------------------------------------------------

    /// Replace the selection. Locked and unknown ids are dropped; the primary
    /// falls back to the last selected id when missing.
    pub fn set_selection(&mut self, ids: &[ElementId], primary: Option<ElementId>) {
        let mut selected: Vec<ElementId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !selected.contains(id) && self.element(*id).is_some_and(|e| !e.locked) {
                selected.push(*id);
            }
        }
        let primary = primary
            .filter(|p| selected.contains(p))
            .or_else(|| selected.last().copied());
        self.selection = Selection { primary, ids: selected };
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    /// Plain click: select only `id`, unless it is already part of a
    /// multi-selection, which is kept for a group drag.
    pub fn click_select(&mut self, id: ElementId) {
        if self.selection.is_multi() && self.selection.contains(id) {
            self.selection.primary = Some(id);
            return;
        }
        self.set_selection(&[id], Some(id));
    }

    /// Modifier click: add or remove `id`.
    pub fn toggle_selection(&mut self, id: ElementId) {
        let mut ids = self.selection.ids.clone();
        if let Some(pos) = ids.iter().position(|s| *s == id) {
            ids.remove(pos);
            let primary = self.selection.primary.filter(|p| *p != id);
            self.set_selection(&ids, primary);
        } else {
            ids.push(id);
            self.set_selection(&ids, Some(id));
        }
    }

    /// Select every unlocked element on the active page.
    pub fn select_all(&mut self) {
        let ids: Vec<ElementId> = self.page().elements.iter().map(|e| e.id).collect();
        self.set_selection(&ids, None);
    }

    // --- History ----------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.snapshot()) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.snapshot()) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Pages ------------------------------------------------------------

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn active_page_index(&self) -> usize {
        self.active_page
    }

    pub fn active_page(&self) -> &Page {
        self.page()
    }

    pub fn set_active_page(&mut self, index: usize) -> bool {
        if index >= self.pages.len() || index == self.active_page {
            return false;
        }
        self.active_page = index;
        self.clear_selection();
        true
    }

    /// Append an empty page and make it active.
    pub fn add_blank_page(&mut self) -> usize {
        let before = self.snapshot();
        let index = self.pages.len();
        self.pages.push(Page::new(default_page_label(index)));
        self.active_page = index;
        self.clear_selection();
        self.commit(before);
        log::info!("Added blank page {}", index + 1);
        index
    }

    /// Append a copy of the first page (fresh element ids) and make it active.
    pub fn duplicate_front_page(&mut self) -> usize {
        let before = self.snapshot();
        let index = self.pages.len();
        let elements = self.pages[0].elements.iter().map(Element::duplicate).collect();
        self.pages
            .push(Page::with_elements(default_page_label(index), elements));
        self.active_page = index;
        self.clear_selection();
        self.commit(before);
        log::info!("Duplicated front page as page {}", index + 1);
        index
    }

    /// Delete a page. Refused when it is the only one.
    pub fn delete_page(&mut self, index: usize) -> bool {
        if self.pages.len() <= 1 || index >= self.pages.len() {
            return false;
        }
        let before = self.snapshot();
        self.pages.remove(index);
        if self.active_page >= index && self.active_page > 0 {
            self.active_page -= 1;
        }
        self.clear_selection();
        self.commit(before);
        log::info!("Deleted page {}", index + 1);
        true
    }

    pub fn rename_page(&mut self, index: usize, label: impl Into<String>) -> bool {
        let label = label.into();
        match self.pages.get(index) {
            Some(page) if page.label != label => {
                let before = self.snapshot();
                self.pages[index].label = label;
                self.commit(before)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, Frame, Rgba, ShapeContent};

    fn shape(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new(
            Frame::new(x, y, w, h, 0.0),
            ElementKind::Shape(ShapeContent::new("rectangle", Rgba::BLACK)),
        )
    }

    fn locked(mut el: Element) -> Element {
        el.locked = true;
        el
    }

    fn store() -> ElementStore {
        ElementStore::new(24.0, 18.0, SizeUnit::Inches)
    }

    #[test]
    fn test_add_appends_on_top() {
        let mut store = store();
        let a = store.add_element(shape(0.0, 0.0, 2.0, 2.0));
        let b = store.add_element(shape(0.0, 0.0, 2.0, 2.0));
        assert_eq!(store.index_of(a), Some(0));
        assert_eq!(store.index_of(b), Some(1));
        assert_eq!(store.hit_test(Point::new(1.0, 1.0)), Some(b));
    }

    #[test]
    fn test_update_clamps() {
        let mut store = store();
        let id = store.add_element(shape(0.0, 0.0, 2.0, 2.0));
        assert!(store.update_element(id, &ElementPatch::size(0.0, 0.5)));
        let el = store.element(id).unwrap();
        assert!((el.frame.width - 1.0).abs() < f64::EPSILON);
        assert!((el.frame.height - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_locked_is_noop() {
        let mut store = store();
        let id = store.add_element(locked(shape(0.0, 0.0, 2.0, 2.0)));
        store.add_element(shape(0.0, 0.0, 2.0, 2.0));
        assert!(!store.update_element(id, &ElementPatch::position(5.0, 5.0)));
        assert!(!store.reorder(id, 1));
        assert_eq!(store.remove_elements(&[id]), 0);
        store.set_selection(&[id], Some(id));
        assert!(store.selection().is_empty());
        // Unlocking is still allowed
        assert!(store.update_element(
            id,
            &ElementPatch {
                locked: Some(false),
                ..Default::default()
            }
        ));
    }

    #[test]
    fn test_copy_on_write_snapshot() {
        let mut store = store();
        let id = store.add_element(shape(0.0, 0.0, 2.0, 2.0));
        let snapshot = store.elements();
        store.update_element(id, &ElementPatch::position(3.0, 3.0));
        assert!((snapshot[0].frame.x - 0.0).abs() < f64::EPSILON);
        assert!((store.elements()[0].frame.x - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reorder_front_back() {
        let mut store = store();
        let a = store.add_element(shape(0.0, 0.0, 2.0, 2.0));
        let b = store.add_element(shape(0.0, 0.0, 2.0, 2.0));
        let c = store.add_element(shape(0.0, 0.0, 2.0, 2.0));

        assert!(store.bring_to_front(a));
        assert_eq!(store.index_of(a), Some(2));
        assert!(store.send_to_back(c));
        assert_eq!(store.index_of(c), Some(0));
        assert!(store.send_backward(a));
        assert_eq!(store.index_of(a), Some(1));
        assert!(store.bring_forward(a));
        assert_eq!(store.index_of(a), Some(2));
        assert!(!store.bring_forward(a));
        assert_eq!(store.index_of(b), Some(1));
    }

    #[test]
    fn test_click_keeps_multi_selection() {
        let mut store = store();
        let a = store.add_element(shape(0.0, 0.0, 2.0, 2.0));
        let b = store.add_element(shape(5.0, 0.0, 2.0, 2.0));
        let c = store.add_element(shape(9.0, 0.0, 2.0, 2.0));
        store.set_selection(&[a, b], Some(a));

        store.click_select(b);
        assert_eq!(store.selection().ids(), &[a, b]);
        assert_eq!(store.selection().primary(), Some(b));

        store.click_select(c);
        assert_eq!(store.selection().ids(), &[c]);
    }

    #[test]
    fn test_toggle_selection() {
        let mut store = store();
        let a = store.add_element(shape(0.0, 0.0, 2.0, 2.0));
        let b = store.add_element(shape(5.0, 0.0, 2.0, 2.0));
        store.toggle_selection(a);
        store.toggle_selection(b);
        assert_eq!(store.selection().len(), 2);
        assert_eq!(store.selection().primary(), Some(b));
        store.toggle_selection(b);
        assert_eq!(store.selection().ids(), &[a]);
        assert_eq!(store.selection().primary(), Some(a));
    }

    #[test]
    fn test_marquee_overlap_skips_locked() {
        let mut store = store();
        let a = store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        let b = store.add_element(locked(shape(1.0, 1.0, 2.0, 2.0)));
        let c = store.add_element(shape(10.0, 10.0, 2.0, 2.0));
        let hits = store.elements_in_rect(Rect::new(2.5, 2.5, 4.0, 4.0));
        assert!(hits.contains(&a));
        assert!(!hits.contains(&b));
        assert!(!hits.contains(&c));
    }

    #[test]
    fn test_undo_depth_from_config() {
        let config = EditorConfig {
            undo_depth: 2,
            ..EditorConfig::default()
        };
        let mut store = store().with_config(&config);
        let id = store.add_element(shape(0.0, 0.0, 2.0, 2.0));
        for x in [1.0, 2.0, 3.0] {
            store.update_element(id, &ElementPatch::position(x, 0.0));
        }
        assert!(store.undo());
        assert!(store.undo());
        assert!(!store.undo());
        assert!((store.element(id).unwrap().frame.x - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hidden_still_selectable() {
        let mut store = store();
        let mut el = shape(1.0, 1.0, 1.0, 1.0);
        el.visible = false;
        let id = store.add_element(el);
        assert_eq!(store.hit_test(Point::new(1.5, 1.5)), Some(id));
        assert_eq!(store.elements_in_rect(Rect::new(0.5, 0.5, 3.0, 3.0)), vec![id]);
    }

    #[test]
    fn test_undo_redo() {
        let mut store = store();
        let id = store.add_element(shape(0.0, 0.0, 2.0, 2.0));
        store.update_element(id, &ElementPatch::position(4.0, 4.0));
        assert!(store.undo());
        assert!((store.element(id).unwrap().frame.x - 0.0).abs() < f64::EPSILON);
        assert!(store.redo());
        assert!((store.element(id).unwrap().frame.x - 4.0).abs() < f64::EPSILON);
        assert!(store.undo());
        assert!(store.undo());
        assert!(store.is_empty());
        assert!(!store.undo());
    }

    #[test]
    fn test_gesture_commits_once() {
        let mut store = store();
        let id = store.add_element(shape(0.0, 0.0, 2.0, 2.0));
        let before = store.snapshot();
        for step in 1..=10 {
            store.apply_transient(id, &ElementPatch::position(step as f64, 0.0));
        }
        assert!(store.commit(before));
        assert!(store.undo());
        assert!((store.element(id).unwrap().frame.x - 0.0).abs() < f64::EPSILON);

        // A gesture that changed nothing leaves history alone
        let before = store.snapshot();
        assert!(!store.commit(before));
    }

    #[test]
    fn test_duplicate_selection() {
        let mut store = store();
        let a = store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        store.set_selection(&[a], Some(a));
        let copies = store.duplicate_selection(Vec2::new(0.5, 0.5));
        assert_eq!(copies.len(), 1);
        assert_ne!(copies[0], a);
        assert_eq!(store.index_of(copies[0]), Some(1));
        assert_eq!(store.selection().ids(), copies.as_slice());
        assert!((store.element(copies[0]).unwrap().frame.x - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lock_drops_from_selection() {
        let mut store = store();
        let a = store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        store.set_selection(&[a], Some(a));
        assert!(store.set_locked(&[a], true));
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_page_operations() {
        let mut store = store();
        store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        let front_id = store.elements()[0].id;

        let back = store.duplicate_front_page();
        assert_eq!(back, 1);
        assert_eq!(store.active_page_index(), 1);
        assert_eq!(store.active_page().label, "Back");
        assert_eq!(store.len(), 1);
        assert_ne!(store.elements()[0].id, front_id);

        let blank = store.add_blank_page();
        assert_eq!(store.pages()[blank].label, "Page 3");
        assert!(store.is_empty());

        assert!(store.rename_page(2, "Inside"));
        assert!(store.delete_page(2));
        assert_eq!(store.active_page_index(), 1);
        assert!(store.delete_page(1));
        assert!(!store.delete_page(0));
        assert_eq!(store.pages().len(), 1);

        // Page operations are undoable
        assert!(store.undo());
        assert_eq!(store.pages().len(), 2);
    }

    #[test]
    fn test_design_roundtrip() {
        let mut store = store();
        store.add_element(shape(1.0, 1.0, 2.0, 2.0));
        store.add_blank_page();
        let design = store.to_design();
        assert_eq!(design.pages.len(), 2);
        let restored = ElementStore::from_design(design);
        assert_eq!(restored.pages().len(), 2);
        assert_eq!(restored.pages()[0].elements.len(), 1);
        assert!((restored.canvas_size().width - 24.0).abs() < f64::EPSILON);
    }
}
