//! Structural checks for templates.
//!
//! Reports problems without modifying the document. The editor logs these
//! when restoring an auto-save; the CLI prints them.

use crate::id::BlockId;
use crate::model::{Block, Template};
use crate::tree::walk_blocks;
use std::collections::HashSet;
use std::fmt;

// ─── Diagnostic types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Breaks an invariant the editor relies on.
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LintDiagnostic {
    /// The block this refers to, or `None` for template-level findings.
    pub block_id: Option<BlockId>,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "duplicate-id", "width-sum").
    pub rule: &'static str,
}

impl fmt::Display for LintDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        };
        match self.block_id {
            Some(id) => write!(f, "{level}[{}] {id}: {}", self.rule, self.message),
            None => write!(f, "{level}[{}] {}", self.rule, self.message),
        }
    }
}

// ─── Public API ──────────────────────────────────────────────────────────

/// Tolerance for the widths-sum-to-one check.
pub const WIDTH_EPSILON: f64 = 1e-6;

/// Run every rule over the template.
#[must_use]
pub fn lint_template(template: &Template) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_empty_name(template, &mut diags);
    lint_duplicate_ids(&template.blocks, &mut diags);
    lint_columns(&template.blocks, &mut diags);
    diags
}

// ─── Rules ───────────────────────────────────────────────────────────────

fn lint_empty_name(template: &Template, diags: &mut Vec<LintDiagnostic>) {
    if template.name.trim().is_empty() {
        diags.push(LintDiagnostic {
            block_id: None,
            message: "Template has no name; exports will be saved as `.html`.".to_string(),
            severity: LintSeverity::Info,
            rule: "empty-name",
        });
    }
}

/// Block and column ids must be unique across the whole document.
fn lint_duplicate_ids(blocks: &[Block], diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    walk_blocks(blocks, &mut |block, _| {
        let mut ids = vec![block.id()];
        if let Block::Columns(cols) = block {
            ids.extend(cols.columns.iter().map(|c| c.id));
        }
        for id in ids {
            if !seen.insert(id) && reported.insert(id) {
                diags.push(LintDiagnostic {
                    block_id: Some(id),
                    message: format!("Id `{id}` is used more than once."),
                    severity: LintSeverity::Warning,
                    rule: "duplicate-id",
                });
            }
        }
    });
}

fn lint_columns(blocks: &[Block], diags: &mut Vec<LintDiagnostic>) {
    walk_blocks(blocks, &mut |block, depth| {
        let Block::Columns(cols) = block else {
            return;
        };
        let n = cols.num_columns as usize;
        if cols.columns.len() != n || cols.widths.len() != n {
            diags.push(LintDiagnostic {
                block_id: Some(cols.id),
                message: format!(
                    "numColumns is {n} but there are {} columns and {} widths.",
                    cols.columns.len(),
                    cols.widths.len()
                ),
                severity: LintSeverity::Warning,
                rule: "column-arity",
            });
        }

        let sum: f64 = cols.widths.iter().sum();
        let negative = cols.widths.iter().any(|w| *w < 0.0);
        if negative || (sum - 1.0).abs() > WIDTH_EPSILON {
            diags.push(LintDiagnostic {
                block_id: Some(cols.id),
                message: format!("Column widths sum to {sum}, expected 1."),
                severity: LintSeverity::Warning,
                rule: "width-sum",
            });
        }

        if depth > 0 {
            diags.push(LintDiagnostic {
                block_id: Some(cols.id),
                message: "Columns nested inside columns may not stack on mobile clients."
                    .to_string(),
                severity: LintSeverity::Warning,
                rule: "nested-columns",
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::create_default_block;
    use pretty_assertions::assert_eq;

    fn template(blocks: Vec<Block>) -> Template {
        Template {
            blocks,
            ..Template::empty()
        }
    }

    fn rules(diags: &[LintDiagnostic]) -> Vec<&'static str> {
        diags.iter().map(|d| d.rule).collect()
    }

    #[test]
    fn clean_template_has_no_diags() {
        let t = template(vec![
            create_default_block("header"),
            create_default_block("columns-3"),
            create_default_block("footer"),
        ]);
        assert!(lint_template(&t).is_empty());
    }

    #[test]
    fn duplicate_ids_reported_once() {
        let a = create_default_block("text");
        let t = template(vec![a.clone(), a.clone(), a]);
        let diags = lint_template(&t);
        assert_eq!(rules(&diags), vec!["duplicate-id"]);
        assert_eq!(diags[0].severity, LintSeverity::Warning);
    }

    #[test]
    fn duplicate_inside_column_is_found() {
        let text = create_default_block("text");
        let mut cols = create_default_block("columns-2");
        cols.as_columns_mut().unwrap().columns[0]
            .children
            .push(text.clone());
        let t = template(vec![text.clone(), cols]);
        let diags = lint_template(&t);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].block_id, Some(text.id()));
    }

    #[test]
    fn width_and_arity_problems() {
        let mut block = create_default_block("columns-2");
        let cols = block.as_columns_mut().unwrap();
        cols.widths[0] = 0.7;
        cols.num_columns = 3;
        let diags = lint_template(&template(vec![block]));
        assert_eq!(rules(&diags), vec!["column-arity", "width-sum"]);
    }

    #[test]
    fn nested_columns_warn() {
        let inner = create_default_block("columns-2");
        let inner_id = inner.id();
        let mut outer = create_default_block("columns-2");
        outer.as_columns_mut().unwrap().columns[1]
            .children
            .push(inner);
        let diags = lint_template(&template(vec![outer]));
        assert_eq!(rules(&diags), vec!["nested-columns"]);
        assert_eq!(diags[0].block_id, Some(inner_id));
    }

    #[test]
    fn empty_name_is_info() {
        let mut t = Template::empty();
        t.name = "  ".into();
        let diags = lint_template(&t);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, LintSeverity::Info);
        assert_eq!(diags[0].to_string(), "info[empty-name] Template has no name; exports will be saved as `.html`.");
    }
}
