//! Whole-document undo/redo history.
//!
//! Every committed edit stores the complete previous `Template`. Undo and
//! redo swap whole snapshots; there is no per-operation inverse. Templates
//! are small trees, so a snapshot costs one deep clone per edit.

use mc_core::Template;
use std::collections::VecDeque;

/// Linear undo history: `past` (oldest first), `present`, and `future`
/// (the next redo state first).
#[derive(Debug, Clone)]
pub struct History {
    past: Vec<Template>,
    present: Template,
    future: VecDeque<Template>,
    /// Maximum undo depth; `None` keeps every snapshot.
    max_depth: Option<usize>,
}

impl History {
    pub fn new(present: Template) -> Self {
        Self::with_max_depth(present, None)
    }

    pub fn with_max_depth(present: Template, max_depth: Option<usize>) -> Self {
        Self {
            past: Vec::new(),
            present,
            future: VecDeque::new(),
            max_depth,
        }
    }

    pub fn present(&self) -> &Template {
        &self.present
    }

    /// Replace the present. The old present becomes the newest undo state
    /// and all redo states are discarded.
    pub fn commit(&mut self, next: Template) {
        let prev = std::mem::replace(&mut self.present, next);
        self.past.push(prev);
        if let Some(max) = self.max_depth {
            while self.past.len() > max {
                self.past.remove(0);
            }
        }
        self.future.clear();
    }

    /// Step back one snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, prev);
        self.future.push_front(current);
        true
    }

    /// Step forward one snapshot. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        true
    }

    /// Reset to a single state. Not undoable.
    pub fn load(&mut self, template: Template) {
        self.past.clear();
        self.future.clear();
        self.present = template;
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Template::empty())
    }
}
