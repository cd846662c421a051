//! WASM bridge for Mailcraft. Exposes the editor session to the browser UI.
//!
//! Built with `wasm-pack build --target web`. The JavaScript side owns the
//! DOM, the palette, and the property panels; every document change comes
//! through [`MailcraftEditor::apply`] as a JSON [`Mutation`].

#[cfg(target_arch = "wasm32")]
mod logger;
#[cfg(target_arch = "wasm32")]
mod storage;

use mc_core::{BlockId, LintSeverity, Template, lint_template};
use mc_editor::{
    BlockBand, DropPayload, Editor, ExportTarget, KeyValueStore, Mutation, Notice, NoticeLevel,
    NullStore, ShortcutAction, ShortcutMap, Viewport,
};
use wasm_bindgen::prelude::*;

/// The browser-facing editor session.
#[wasm_bindgen]
pub struct MailcraftEditor {
    editor: Editor,
}

#[wasm_bindgen]
impl MailcraftEditor {
    /// Create an editor backed by `localStorage` and restore the last
    /// auto-save if there is one.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_setup();
        let mut editor = Editor::new(default_store());
        if editor.load_local() {
            log::info!("restored auto-saved template");
        }
        Self { editor }
    }

    /// Apply a JSON mutation such as `{"op":"addBlock","key":"text"}`.
    /// Returns `true` if the document changed.
    pub fn apply(&mut self, json: &str) -> bool {
        match Mutation::from_json(json) {
            Ok(mutation) => self.editor.apply(mutation),
            Err(err) => {
                log::warn!("rejected mutation: {err}");
                false
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    /// The current document as JSON.
    pub fn template_json(&self) -> String {
        self.editor.template().to_json().unwrap_or_else(|err| {
            log::error!("could not serialize template: {err}");
            String::new()
        })
    }

    /// Replace the document with imported JSON. Clears history.
    pub fn load_json(&mut self, json: &str) -> Result<(), JsError> {
        let template = Template::from_json(json)?;
        self.editor.load(template);
        self.editor.select(None);
        Ok(())
    }

    pub fn select(&mut self, id: Option<String>) {
        self.editor.select(id.as_deref().map(BlockId::intern));
    }

    pub fn selected_id(&self) -> Option<String> {
        self.editor.selected_id().map(|id| id.as_str().to_string())
    }

    /// The selected block as JSON, for the property panel.
    pub fn selected_block_json(&self) -> Option<String> {
        let block = self.editor.selected_block()?;
        serde_json::to_string(block).ok()
    }

    pub fn set_viewport(&mut self, name: &str) {
        let viewport = match name {
            "mobile" => Viewport::Mobile,
            _ => Viewport::Desktop,
        };
        self.editor.set_viewport(viewport);
    }

    /// Canvas width in CSS pixels for the current viewport.
    pub fn canvas_width(&self) -> u32 {
        self.editor.viewport().canvas_width()
    }

    pub fn render_html(&self) -> String {
        self.editor.render_html()
    }

    pub fn download_filename(&self) -> String {
        self.editor.download_filename()
    }

    /// Block key carried by a palette drop, or `None` for foreign data.
    pub fn drop_key(&self, data: &str) -> Option<String> {
        DropPayload::from_data(data).map(|p| p.key.as_str().to_string())
    }

    /// Insertion index for a drop at `y`, given each rendered block's top
    /// and height relative to the drop container.
    pub fn drop_index(&self, y: f64, tops: &[f64], heights: &[f64]) -> usize {
        let bands: Vec<BlockBand> = tops
            .iter()
            .zip(heights)
            .map(|(&top, &height)| BlockBand::new(top, height))
            .collect();
        mc_editor::drop_index(y, &bands)
    }

    /// Handle a keyboard event. Returns JSON
    /// `{"changed":bool,"action":"..."}`.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return r#"{"changed":false,"action":"none"}"#.to_string();
        };
        let changed = self.editor.handle_shortcut(action);
        let name = action_to_name(action);
        format!(r#"{{"changed":{changed},"action":"{name}"}}"#)
    }

    /// Toast for an export the host just attempted. `target` is
    /// `"clipboard"`, `"download"`, or `"preview"`. Returns JSON
    /// `{"level":"success"|"error","message":"..."}`.
    pub fn export_notice(&self, target: &str, ok: bool) -> String {
        let target = match target {
            "clipboard" => ExportTarget::Clipboard,
            "preview" => ExportTarget::Preview,
            _ => ExportTarget::Download,
        };
        let result = if ok {
            Ok(())
        } else {
            Err(mc_editor::ExportError::Clipboard("host reported failure".into()))
        };
        notice_json(&Notice::for_export(target, &result))
    }
}

impl Default for MailcraftEditor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Standalone functions (no editor needed) ─────────────────────────────

/// Whether a drag with these `DataTransfer.types` can drop on the canvas.
#[wasm_bindgen]
pub fn accepts_drop(types: js_sys::Array) -> bool {
    let types: Vec<String> = types.iter().filter_map(|v| v.as_string()).collect();
    mc_editor::accepts_drop(types.as_slice())
}

/// Compile template JSON to email HTML. Returns `{"ok":true,"html":"..."}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn render_json(source: &str) -> String {
    let value = match Template::from_json(source) {
        Ok(t) => serde_json::json!({ "ok": true, "html": mc_core::render_template_to_html(&t) }),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }),
    };
    value.to_string()
}

/// Lint template JSON. Returns a JSON array of diagnostics.
#[wasm_bindgen]
pub fn lint_json(source: &str) -> String {
    let template = match Template::from_json(source) {
        Ok(t) => t,
        Err(e) => {
            return serde_json::json!([{
                "rule": "parse",
                "severity": "warning",
                "message": e.to_string(),
            }])
            .to_string();
        }
    };
    let diags: Vec<serde_json::Value> = lint_template(&template)
        .iter()
        .map(|d| {
            let severity = match d.severity {
                LintSeverity::Warning => "warning",
                LintSeverity::Info => "info",
            };
            serde_json::json!({
                "blockId": d.block_id.map(|id| id.as_str().to_string()),
                "rule": d.rule,
                "severity": severity,
                "message": d.message,
            })
        })
        .collect();
    serde_json::Value::Array(diags).to_string()
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Delete => "delete",
        ShortcutAction::Duplicate => "duplicate",
        ShortcutAction::Deselect => "deselect",
    }
}

fn notice_json(notice: &Notice) -> String {
    let level = match notice.level {
        NoticeLevel::Success => "success",
        NoticeLevel::Error => "error",
    };
    serde_json::json!({ "level": level, "message": notice.message }).to_string()
}

fn default_store() -> Box<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(store) = storage::LocalStorage::open() {
            return Box::new(store);
        }
        log::warn!("localStorage unavailable; auto-save disabled");
    }
    Box::new(NullStore)
}

fn console_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Mailcraft WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            logger::init(log::LevelFilter::Info);
        });
    }
}
