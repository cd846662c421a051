//! The editor session: history, selection, auto-save, export.
//!
//! All document changes go through [`Editor::apply_edit`], which commits to
//! history, updates the selection, and auto-saves. Operations that do not
//! apply leave history, selection, and storage untouched.

use crate::export::{ExportSink, ExportTarget, Notice, html_filename};
use crate::history::History;
use crate::mutation::Mutation;
use crate::ops::{self, Edit, SelectionEffect};
use crate::shortcuts::ShortcutAction;
use crate::store::{AUTOSAVE_KEY, KeyValueStore, StorageError};
use mc_core::{Block, BlockId, Template, find_block_by_id, lint_template, locate_block};
use serde::{Deserialize, Serialize};

/// Editor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Storage key for auto-save.
    pub autosave_key: String,
    /// Undo depth limit; `None` is unbounded.
    pub max_history: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_key: AUTOSAVE_KEY.to_string(),
            max_history: None,
        }
    }
}

/// Canvas preview width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Mobile,
}

impl Viewport {
    pub fn canvas_width(self) -> u32 {
        match self {
            Viewport::Desktop => 600,
            Viewport::Mobile => 320,
        }
    }
}

pub struct Editor {
    history: History,
    selected: Option<BlockId>,
    viewport: Viewport,
    store: Box<dyn KeyValueStore>,
    config: EditorConfig,
}

impl Editor {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_config(store, EditorConfig::default())
    }

    pub fn with_config(store: Box<dyn KeyValueStore>, config: EditorConfig) -> Self {
        Self {
            history: History::with_max_depth(Template::empty(), config.max_history),
            selected: None,
            viewport: Viewport::default(),
            store,
            config,
        }
    }

    pub fn template(&self) -> &Template {
        self.history.present()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self, id: Option<BlockId>) {
        self.selected = id;
    }

    /// The selected id, if it still names a block in the document.
    pub fn selected_id(&self) -> Option<BlockId> {
        self.selected_block().map(Block::id)
    }

    pub fn selected_block(&self) -> Option<&Block> {
        let id = self.selected?;
        find_block_by_id(&self.template().blocks, id)
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Replace the document with `next` as one undoable step.
    pub fn commit(&mut self, next: Template) {
        self.history.commit(next);
        log::debug!(
            "commit: {} blocks, {} undo levels",
            self.template().blocks.len(),
            self.history.undo_levels()
        );
        self.autosave();
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        log::debug!("undo: {} levels left", self.history.undo_levels());
        self.autosave();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        log::debug!("redo: {} levels left", self.history.redo_levels());
        self.autosave();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replace the document and clear history. Not undoable.
    pub fn load(&mut self, template: Template) {
        self.history.load(template);
        self.autosave();
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Commit an operation's result. Returns `false` for `None`.
    pub fn apply_edit(&mut self, edit: Option<Edit>) -> bool {
        let Some(edit) = edit else {
            return false;
        };
        match edit.selection {
            SelectionEffect::Keep => {}
            SelectionEffect::Select(id) => self.selected = Some(id),
            SelectionEffect::ClearIf(id) => {
                if self.selected == Some(id) {
                    self.selected = None;
                }
            }
        }
        self.commit(edit.template);
        true
    }

    /// Apply a serialized command.
    pub fn apply(&mut self, mutation: Mutation) -> bool {
        let label = mutation.describe();
        let t = self.template();
        let edit = match mutation {
            Mutation::AddBlock { key, at } => ops::add_block(t, &key, at),
            Mutation::DeleteBlock { id } => ops::delete_block(t, id),
            Mutation::DuplicateBlock { id } => ops::duplicate_block(t, id),
            Mutation::MoveBlock { from, to } => ops::move_block(t, from, to),
            Mutation::ReplaceBlock { block } => ops::update_block(t, block.id(), |_| block),
            Mutation::AddBlockToColumn {
                columns_id,
                col,
                key,
                at,
            } => ops::add_block_to_column(t, columns_id, col, &key, at),
            Mutation::DeleteBlockInColumn {
                columns_id,
                col,
                id,
            } => ops::delete_block_in_column(t, columns_id, col, id),
            Mutation::DuplicateBlockInColumn {
                columns_id,
                col,
                id,
            } => ops::duplicate_block_in_column(t, columns_id, col, id),
            Mutation::MoveBlockInColumns {
                columns_id,
                from_col,
                from_pos,
                to_col,
                to_pos,
            } => ops::move_block_in_columns(t, columns_id, from_col, from_pos, to_col, to_pos),
            Mutation::Rename { name } => ops::rename(t, &name),
            Mutation::SetColumnWidth {
                columns_id,
                col,
                percent,
            } => ops::set_column_width(t, columns_id, col, percent),
            Mutation::EqualizeColumns { columns_id } => ops::equalize_columns(t, columns_id),
            Mutation::SetColumnCount { columns_id, count } => {
                ops::set_column_count(t, columns_id, count)
            }
            Mutation::DeleteSelected => self
                .selected
                .and_then(|id| locate_block(&t.blocks, id))
                .and_then(|path| ops::delete_at(t, &path)),
        };
        let applied = self.apply_edit(edit);
        if !applied {
            log::debug!("{label}: no change");
        }
        applied
    }

    pub fn add_block(&mut self, key: &str, at: Option<usize>) -> bool {
        self.apply_edit(ops::add_block(self.template(), key, at))
    }

    pub fn delete_block(&mut self, id: BlockId) -> bool {
        self.apply_edit(ops::delete_block(self.template(), id))
    }

    pub fn duplicate_block(&mut self, id: BlockId) -> bool {
        self.apply_edit(ops::duplicate_block(self.template(), id))
    }

    pub fn move_block(&mut self, from: usize, to: usize) -> bool {
        self.apply_edit(ops::move_block(self.template(), from, to))
    }

    pub fn update_block(&mut self, id: BlockId, f: impl FnOnce(&Block) -> Block) -> bool {
        self.apply_edit(ops::update_block(self.template(), id, f))
    }

    pub fn add_block_to_column(
        &mut self,
        columns_id: BlockId,
        col: usize,
        key: &str,
        at: Option<usize>,
    ) -> bool {
        self.apply_edit(ops::add_block_to_column(
            self.template(),
            columns_id,
            col,
            key,
            at,
        ))
    }

    pub fn delete_block_in_column(&mut self, columns_id: BlockId, col: usize, id: BlockId) -> bool {
        self.apply_edit(ops::delete_block_in_column(
            self.template(),
            columns_id,
            col,
            id,
        ))
    }

    pub fn duplicate_block_in_column(
        &mut self,
        columns_id: BlockId,
        col: usize,
        id: BlockId,
    ) -> bool {
        self.apply_edit(ops::duplicate_block_in_column(
            self.template(),
            columns_id,
            col,
            id,
        ))
    }

    pub fn move_block_in_columns(
        &mut self,
        columns_id: BlockId,
        from_col: usize,
        from_pos: usize,
        to_col: usize,
        to_pos: usize,
    ) -> bool {
        self.apply_edit(ops::move_block_in_columns(
            self.template(),
            columns_id,
            from_col,
            from_pos,
            to_col,
            to_pos,
        ))
    }

    pub fn rename(&mut self, name: &str) -> bool {
        self.apply_edit(ops::rename(self.template(), name))
    }

    pub fn set_column_width(&mut self, columns_id: BlockId, col: usize, percent: f64) -> bool {
        self.apply_edit(ops::set_column_width(
            self.template(),
            columns_id,
            col,
            percent,
        ))
    }

    pub fn equalize_columns(&mut self, columns_id: BlockId) -> bool {
        self.apply_edit(ops::equalize_columns(self.template(), columns_id))
    }

    pub fn set_column_count(&mut self, columns_id: BlockId, n: u8) -> bool {
        self.apply_edit(ops::set_column_count(self.template(), columns_id, n))
    }

    /// Delete the selected block wherever it lives.
    pub fn delete_selected(&mut self) -> bool {
        self.apply(Mutation::DeleteSelected)
    }

    /// Duplicate the selected block: next to itself at top level, or in its
    /// own column when nested.
    pub fn duplicate_selected(&mut self) -> bool {
        let Some(id) = self.selected_id() else {
            return false;
        };
        let t = self.template();
        let Some(path) = locate_block(&t.blocks, id) else {
            return false;
        };
        let edit = match (path.parent_columns(&t.blocks), path.nested.last()) {
            (Some(columns_id), Some(step)) if path.nested.len() == 1 => {
                ops::duplicate_block_in_column(t, columns_id, step.column, id)
            }
            (None, None) => ops::duplicate_block(t, id),
            _ => None,
        };
        self.apply_edit(edit)
    }

    /// Run a keyboard shortcut. Returns `true` if anything changed.
    pub fn handle_shortcut(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Duplicate => self.duplicate_selected(),
            ShortcutAction::Deselect => self.selected.take().is_some(),
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Best-effort write of the current document. Failures are logged and
    /// otherwise ignored.
    fn autosave(&mut self) {
        if let Err(err) = self.save_local() {
            log::warn!("auto-save failed: {err}");
        }
    }

    /// Write the current document under the auto-save key.
    pub fn save_local(&mut self) -> Result<(), StorageError> {
        let json = self.template().to_json()?;
        self.store.set(&self.config.autosave_key, &json)
    }

    /// Restore the auto-saved document, replacing history. Returns `true`
    /// if a document was restored. A missing or unreadable save leaves the
    /// editor unchanged.
    pub fn load_local(&mut self) -> bool {
        let raw = match self.store.get(&self.config.autosave_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(err) => {
                log::warn!("could not read auto-save: {err}");
                return false;
            }
        };
        let template = match Template::from_json(&raw) {
            Ok(t) => t,
            Err(err) => {
                log::warn!("ignoring corrupt auto-save: {err}");
                return false;
            }
        };
        for diag in lint_template(&template) {
            log::warn!("auto-save: {diag}");
        }
        self.history.load(template);
        self.selected = None;
        true
    }

    // ─── Export ──────────────────────────────────────────────────────────

    pub fn render_html(&self) -> String {
        mc_core::render_template_to_html(self.template())
    }

    pub fn download_filename(&self) -> String {
        html_filename(&self.template().name)
    }

    /// Render and hand the HTML to `sink`. Never changes the document.
    pub fn export(&self, sink: &mut dyn ExportSink, target: ExportTarget) -> Notice {
        let html = self.render_html();
        let result = match target {
            ExportTarget::Clipboard => sink.copy_html(&html),
            ExportTarget::Download => sink.save_html(&self.download_filename(), &html),
            ExportTarget::Preview => sink.preview(&html),
        };
        if let Err(err) = &result {
            log::warn!("export failed: {err}");
        }
        Notice::for_export(target, &result)
    }
}
