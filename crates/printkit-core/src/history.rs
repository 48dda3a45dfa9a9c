//! Bounded undo/redo stacks of snapshots.

use crate::config::MAX_UNDO_HISTORY;

/// Undo/redo history over cheap-to-clone snapshots.
///
/// Callers push the state from *before* a change; `undo` and `redo` take the
/// current state and hand back the one to restore.
#[derive(Debug, Clone)]
pub struct History<S> {
    undo_stack: Vec<S>,
    redo_stack: Vec<S>,
    depth: usize,
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self::with_depth(MAX_UNDO_HISTORY)
    }
}

impl<S> History<S> {
    pub fn with_depth(depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            depth: depth.max(1),
        }
    }

    /// Record the pre-change state. Clears the redo stack.
    pub fn push(&mut self, before: S) {
        self.undo_stack.push(before);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.depth {
            self.undo_stack.remove(0);
        }
    }

    pub fn undo(&mut self, current: S) -> Option<S> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(snapshot)
    }

    pub fn redo(&mut self, current: S) -> Option<S> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
