//! Serializable editor commands.
//!
//! The presentation layer sends these as JSON (`{"op": "addBlock", ...}`)
//! across the WASM boundary. Each variant maps onto one operation in
//! [`crate::ops`]; [`crate::Editor::apply`] routes them through history.

use mc_core::{Block, BlockId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    AddBlock {
        key: String,
        #[serde(default)]
        at: Option<usize>,
    },
    DeleteBlock {
        id: BlockId,
    },
    DuplicateBlock {
        id: BlockId,
    },
    MoveBlock {
        from: usize,
        to: usize,
    },
    /// Replace the block carrying `block.id` (at any depth) with `block`.
    /// This is how property-panel edits arrive from JavaScript.
    ReplaceBlock {
        block: Block,
    },
    AddBlockToColumn {
        columns_id: BlockId,
        col: usize,
        key: String,
        #[serde(default)]
        at: Option<usize>,
    },
    DeleteBlockInColumn {
        columns_id: BlockId,
        col: usize,
        id: BlockId,
    },
    DuplicateBlockInColumn {
        columns_id: BlockId,
        col: usize,
        id: BlockId,
    },
    MoveBlockInColumns {
        columns_id: BlockId,
        from_col: usize,
        from_pos: usize,
        to_col: usize,
        to_pos: usize,
    },
    Rename {
        name: String,
    },
    SetColumnWidth {
        columns_id: BlockId,
        col: usize,
        percent: f64,
    },
    EqualizeColumns {
        columns_id: BlockId,
    },
    SetColumnCount {
        columns_id: BlockId,
        count: u8,
    },
    /// Delete whatever is selected, top-level or nested.
    DeleteSelected,
}

impl Mutation {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Short label for logs.
    pub fn describe(&self) -> &'static str {
        match self {
            Mutation::AddBlock { .. } => "add block",
            Mutation::DeleteBlock { .. } => "delete block",
            Mutation::DuplicateBlock { .. } => "duplicate block",
            Mutation::MoveBlock { .. } => "move block",
            Mutation::ReplaceBlock { .. } => "edit block",
            Mutation::AddBlockToColumn { .. } => "add block to column",
            Mutation::DeleteBlockInColumn { .. } => "delete block in column",
            Mutation::DuplicateBlockInColumn { .. } => "duplicate block in column",
            Mutation::MoveBlockInColumns { .. } => "move block in columns",
            Mutation::Rename { .. } => "rename template",
            Mutation::SetColumnWidth { .. } => "set column width",
            Mutation::EqualizeColumns { .. } => "equalize columns",
            Mutation::SetColumnCount { .. } => "set column count",
            Mutation::DeleteSelected => "delete selected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_camel_case_ops() {
        let m = Mutation::from_json(r#"{"op":"addBlockToColumn","columnsId":"c1","col":1,"key":"text"}"#)
            .unwrap();
        assert_eq!(
            m,
            Mutation::AddBlockToColumn {
                columns_id: BlockId::intern("c1"),
                col: 1,
                key: "text".into(),
                at: None,
            }
        );
        assert_eq!(m.describe(), "add block to column");
    }

    #[test]
    fn unit_variant_needs_only_the_tag() {
        let m = Mutation::from_json(r#"{"op":"deleteSelected"}"#).unwrap();
        assert_eq!(m, Mutation::DeleteSelected);
    }

    #[test]
    fn replace_block_carries_a_full_block() {
        let json = r#"{"op":"replaceBlock","block":{"id":"s1","type":"spacer","height":40}}"#;
        let Mutation::ReplaceBlock { block } = Mutation::from_json(json).unwrap() else {
            panic!("expected replaceBlock");
        };
        assert_eq!(block.id(), BlockId::intern("s1"));
    }

    #[test]
    fn unknown_op_is_an_error() {
        assert!(Mutation::from_json(r#"{"op":"explode"}"#).is_err());
    }
}
