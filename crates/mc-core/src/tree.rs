//! Read-only traversal of the block tree.
//!
//! Columns blocks are the only containers; every lookup descends into each
//! column in order. Mutation has its own column-aware copy-on-write logic in
//! `mc-editor`.

use crate::id::BlockId;
use crate::model::Block;
use smallvec::SmallVec;

/// Depth-first search for a block by ID, including blocks nested in columns.
/// Returns the first match in document order.
pub fn find_block_by_id(blocks: &[Block], id: BlockId) -> Option<&Block> {
    for block in blocks {
        if block.id() == id {
            return Some(block);
        }
        if let Block::Columns(cols) = block {
            for column in &cols.columns {
                if let Some(found) = find_block_by_id(&column.children, id) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// One step into a columns block: which column, and the position inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnStep {
    pub column: usize,
    pub position: usize,
}

/// Where a block lives: a top-level index, then zero or more steps into
/// nested columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPath {
    pub top: usize,
    pub nested: SmallVec<[ColumnStep; 2]>,
}

impl BlockPath {
    pub fn is_top_level(&self) -> bool {
        self.nested.is_empty()
    }

    /// ID of the columns block that directly contains this block, if nested.
    pub fn parent_columns(&self, blocks: &[Block]) -> Option<BlockId> {
        let (_, parents) = self.nested.split_last()?;
        let mut current = blocks.get(self.top)?;
        for step in parents {
            current = current
                .as_columns()?
                .column(step.column)?
                .children
                .get(step.position)?;
        }
        Some(current.id())
    }
}

/// Locate a block anywhere in the tree.
pub fn locate_block(blocks: &[Block], id: BlockId) -> Option<BlockPath> {
    for (top, block) in blocks.iter().enumerate() {
        let mut nested = SmallVec::new();
        if locate_in(block, id, &mut nested) {
            return Some(BlockPath { top, nested });
        }
    }
    None
}

fn locate_in(block: &Block, id: BlockId, path: &mut SmallVec<[ColumnStep; 2]>) -> bool {
    if block.id() == id {
        return true;
    }
    let Block::Columns(cols) = block else {
        return false;
    };
    for (column, col) in cols.columns.iter().enumerate() {
        for (position, child) in col.children.iter().enumerate() {
            path.push(ColumnStep { column, position });
            if locate_in(child, id, path) {
                return true;
            }
            path.pop();
        }
    }
    false
}

/// Pre-order visit of every block with its nesting depth (0 = top level).
pub fn walk_blocks<'a>(blocks: &'a [Block], visit: &mut impl FnMut(&'a Block, usize)) {
    walk_at(blocks, 0, visit);
}

fn walk_at<'a>(blocks: &'a [Block], depth: usize, visit: &mut impl FnMut(&'a Block, usize)) {
    for block in blocks {
        visit(block, depth);
        if let Block::Columns(cols) = block {
            for column in &cols.columns {
                walk_at(&column.children, depth + 1, visit);
            }
        }
    }
}

/// Number of blocks in the tree, nested ones included.
pub fn count_blocks(blocks: &[Block]) -> usize {
    let mut n = 0;
    walk_blocks(blocks, &mut |_, _| n += 1);
    n
}

/// Clamp negative ratios to zero and scale so they sum to 1.
/// An all-zero input becomes an equal split.
pub fn normalize_widths(widths: &[f64]) -> SmallVec<[f64; 3]> {
    let clamped: SmallVec<[f64; 3]> = widths
        .iter()
        .map(|w| if w.is_finite() { w.max(0.0) } else { 0.0 })
        .collect();
    let sum: f64 = clamped.iter().sum();
    if sum <= 0.0 {
        return crate::defaults::equal_widths(widths.len());
    }
    clamped.iter().map(|w| w / sum).collect()
}
