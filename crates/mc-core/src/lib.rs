pub mod defaults;
pub mod html;
pub mod id;
pub mod inline;
pub mod lint;
pub mod model;
pub mod tree;

pub use defaults::{BlockKey, create_default_block};
pub use html::{escape_html, render_template_to_html};
pub use id::BlockId;
pub use inline::inline_css;
pub use lint::{LintDiagnostic, LintSeverity, lint_template};
pub use model::*;
pub use tree::{BlockPath, ColumnStep, find_block_by_id, locate_block, normalize_widths, walk_blocks};
