//! Block mutations.
//!
//! Each operation reads a template and returns the next one as an [`Edit`],
//! leaving the input untouched. `None` means the operation does not apply
//! (unknown id, index out of range, no change); callers must not record a
//! history entry for it.
//!
//! Top-level operations address blocks by position in `template.blocks`.
//! The `*_in_column` family addresses a top-level columns block by id, then
//! a column by index. [`update_block`] and the column-layout operations
//! search the whole tree.

use mc_core::defaults::equal_widths;
use mc_core::tree::BlockPath;
use mc_core::{
    Block, BlockId, Column, ColumnsBlock, Template, create_default_block, normalize_widths,
};

/// How an edit changes the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEffect {
    Keep,
    Select(BlockId),
    /// Clear the selection if it points at this block.
    ClearIf(BlockId),
}

/// The result of a successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub template: Template,
    pub selection: SelectionEffect,
}

impl Edit {
    fn keep(template: Template) -> Self {
        Self {
            template,
            selection: SelectionEffect::Keep,
        }
    }

    fn select(template: Template, id: BlockId) -> Self {
        Self {
            template,
            selection: SelectionEffect::Select(id),
        }
    }

    fn clear_if(template: Template, id: BlockId) -> Self {
        Self {
            template,
            selection: SelectionEffect::ClearIf(id),
        }
    }
}

// ─── Top-level operations ────────────────────────────────────────────────

/// Insert a default block for `key` at `at`, or append when `at` is absent
/// or past the end.
pub fn add_block(template: &Template, key: &str, at: Option<usize>) -> Option<Edit> {
    let mut next = template.clone();
    let block = create_default_block(key);
    let id = block.id();
    insert_at(&mut next.blocks, at, block);
    Some(Edit::select(next, id))
}

/// Remove the top-level block with `id`. Nested blocks are not searched.
pub fn delete_block(template: &Template, id: BlockId) -> Option<Edit> {
    let idx = top_index(template, id)?;
    let mut next = template.clone();
    next.blocks.remove(idx);
    Some(Edit::clear_if(next, id))
}

/// Insert a copy of the top-level block `id` right after it.
pub fn duplicate_block(template: &Template, id: BlockId) -> Option<Edit> {
    let idx = top_index(template, id)?;
    let mut next = template.clone();
    let copy = next.blocks[idx].duplicate();
    let copy_id = copy.id();
    next.blocks.insert(idx + 1, copy);
    Some(Edit::select(next, copy_id))
}

/// Move the block at `from` so it ends up at index `to`.
pub fn move_block(template: &Template, from: usize, to: usize) -> Option<Edit> {
    let len = template.blocks.len();
    if from >= len || to >= len || from == to {
        return None;
    }
    let mut next = template.clone();
    let block = next.blocks.remove(from);
    next.blocks.insert(to, block);
    Some(Edit::keep(next))
}

/// Replace the first block with `id`, at any depth, by `f(block)`.
///
/// Returns `None` if no block has that id or `f` returns an identical block.
pub fn update_block(
    template: &Template,
    id: BlockId,
    f: impl FnOnce(&Block) -> Block,
) -> Option<Edit> {
    let mut next = template.clone();
    let slot = find_block_mut(&mut next.blocks, id)?;
    let updated = f(&*slot);
    if updated == *slot {
        return None;
    }
    *slot = updated;
    Some(Edit::keep(next))
}

/// Set the template's display name.
pub fn rename(template: &Template, name: &str) -> Option<Edit> {
    if template.name == name {
        return None;
    }
    let mut next = template.clone();
    next.name = name.to_string();
    Some(Edit::keep(next))
}

/// Remove the block at `path`, top-level or nested.
pub fn delete_at(template: &Template, path: &BlockPath) -> Option<Edit> {
    let mut next = template.clone();
    let removed = match path.nested.split_last() {
        None => {
            if path.top >= next.blocks.len() {
                return None;
            }
            next.blocks.remove(path.top)
        }
        Some((last, parents)) => {
            let mut current = next.blocks.get_mut(path.top)?;
            for step in parents {
                current = current
                    .as_columns_mut()?
                    .column_mut(step.column)?
                    .children
                    .get_mut(step.position)?;
            }
            let children = &mut current.as_columns_mut()?.column_mut(last.column)?.children;
            if last.position >= children.len() {
                return None;
            }
            children.remove(last.position)
        }
    };
    Some(Edit::clear_if(next, removed.id()))
}

// ─── Column operations ───────────────────────────────────────────────────

/// Insert a default block into column `col` of the top-level columns block
/// `columns_id`.
pub fn add_block_to_column(
    template: &Template,
    columns_id: BlockId,
    col: usize,
    key: &str,
    at: Option<usize>,
) -> Option<Edit> {
    let mut next = template.clone();
    let column = top_columns_mut(&mut next, columns_id)?.column_mut(col)?;
    let block = create_default_block(key);
    let id = block.id();
    insert_at(&mut column.children, at, block);
    Some(Edit::select(next, id))
}

pub fn delete_block_in_column(
    template: &Template,
    columns_id: BlockId,
    col: usize,
    child: BlockId,
) -> Option<Edit> {
    let mut next = template.clone();
    let column = top_columns_mut(&mut next, columns_id)?.column_mut(col)?;
    let pos = column.children.iter().position(|b| b.id() == child)?;
    column.children.remove(pos);
    Some(Edit::clear_if(next, child))
}

pub fn duplicate_block_in_column(
    template: &Template,
    columns_id: BlockId,
    col: usize,
    child: BlockId,
) -> Option<Edit> {
    let mut next = template.clone();
    let column = top_columns_mut(&mut next, columns_id)?.column_mut(col)?;
    let pos = column.children.iter().position(|b| b.id() == child)?;
    let copy = column.children[pos].duplicate();
    let copy_id = copy.id();
    column.children.insert(pos + 1, copy);
    Some(Edit::select(next, copy_id))
}

/// Move a child between (or within) columns of one columns block.
/// `to_pos` is clamped to the destination length after removal.
pub fn move_block_in_columns(
    template: &Template,
    columns_id: BlockId,
    from_col: usize,
    from_pos: usize,
    to_col: usize,
    to_pos: usize,
) -> Option<Edit> {
    let mut next = template.clone();
    let cols = top_columns_mut(&mut next, columns_id)?;
    if to_col >= cols.columns.len() {
        return None;
    }
    let source = cols.column_mut(from_col)?;
    if from_pos >= source.children.len() {
        return None;
    }
    let block = source.children.remove(from_pos);
    let dest = &mut cols.columns[to_col].children;
    let to_pos = to_pos.min(dest.len());
    if from_col == to_col && from_pos == to_pos {
        return None;
    }
    dest.insert(to_pos, block);
    Some(Edit::keep(next))
}

/// Set column `col` to `percent` of the row and rescale the others so the
/// widths still sum to 1.
pub fn set_column_width(
    template: &Template,
    columns_id: BlockId,
    col: usize,
    percent: f64,
) -> Option<Edit> {
    let mut next = template.clone();
    let cols = columns_mut(&mut next, columns_id)?;
    let width = cols.widths.get_mut(col)?;
    *width = percent.max(0.0) / 100.0;
    cols.widths = normalize_widths(&cols.widths);
    changed(template, next)
}

/// Reset every column to an equal share.
pub fn equalize_columns(template: &Template, columns_id: BlockId) -> Option<Edit> {
    let mut next = template.clone();
    let cols = columns_mut(&mut next, columns_id)?;
    cols.widths = equal_widths(cols.columns.len());
    changed(template, next)
}

/// Switch between 2 and 3 columns. Extra columns are dropped with their
/// children; missing ones are added empty. Widths reset to equal.
pub fn set_column_count(template: &Template, columns_id: BlockId, n: u8) -> Option<Edit> {
    if !(2..=3).contains(&n) {
        return None;
    }
    let mut next = template.clone();
    let cols = columns_mut(&mut next, columns_id)?;
    let count = n as usize;
    cols.columns.truncate(count);
    while cols.columns.len() < count {
        cols.columns.push(Column::empty());
    }
    cols.num_columns = n;
    cols.widths = equal_widths(count);
    changed(template, next)
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn insert_at(blocks: &mut Vec<Block>, at: Option<usize>, block: Block) {
    match at {
        Some(i) if i <= blocks.len() => blocks.insert(i, block),
        _ => blocks.push(block),
    }
}

fn top_index(template: &Template, id: BlockId) -> Option<usize> {
    template.blocks.iter().position(|b| b.id() == id)
}

fn top_columns_mut(template: &mut Template, id: BlockId) -> Option<&mut ColumnsBlock> {
    template
        .blocks
        .iter_mut()
        .find(|b| b.id() == id)?
        .as_columns_mut()
}

fn columns_mut(template: &mut Template, id: BlockId) -> Option<&mut ColumnsBlock> {
    find_block_mut(&mut template.blocks, id)?.as_columns_mut()
}

/// Depth-first mutable lookup, same order as `mc_core::find_block_by_id`.
fn find_block_mut(blocks: &mut [Block], id: BlockId) -> Option<&mut Block> {
    for block in blocks.iter_mut() {
        if block.id() == id {
            return Some(block);
        }
        if let Block::Columns(cols) = block {
            for column in cols.columns.iter_mut() {
                if let Some(found) = find_block_mut(&mut column.children, id) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn changed(before: &Template, after: Template) -> Option<Edit> {
    (*before != after).then(|| Edit::keep(after))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_core::tree::locate_block;
    use mc_core::{BlockKind, find_block_by_id};
    use pretty_assertions::assert_eq;

    fn doc(keys: &[&str]) -> Template {
        Template {
            blocks: keys.iter().map(|k| create_default_block(k)).collect(),
            ..Template::empty()
        }
    }

    fn kinds(t: &Template) -> Vec<BlockKind> {
        t.blocks.iter().map(Block::kind).collect()
    }

    #[test]
    fn add_inserts_or_appends() {
        let t = doc(&["text", "button"]);
        let edit = add_block(&t, "spacer", Some(1)).unwrap();
        assert_eq!(
            kinds(&edit.template),
            vec![BlockKind::Text, BlockKind::Spacer, BlockKind::Button]
        );
        let new_id = edit.template.blocks[1].id();
        assert_eq!(edit.selection, SelectionEffect::Select(new_id));

        let edit = add_block(&t, "spacer", Some(9)).unwrap();
        assert_eq!(edit.template.blocks[2].kind(), BlockKind::Spacer);
        // The input is never modified.
        assert_eq!(t.blocks.len(), 2);
    }

    #[test]
    fn delete_only_searches_top_level() {
        let mut t = doc(&["columns-2"]);
        let cid = t.blocks[0].id();
        let nested = add_block_to_column(&t, cid, 0, "text", None).unwrap();
        t = nested.template;
        let child = t.blocks[0].as_columns().unwrap().columns[0].children[0].id();

        assert!(delete_block(&t, child).is_none());
        let edit = delete_block(&t, cid).unwrap();
        assert!(edit.template.blocks.is_empty());
        assert_eq!(edit.selection, SelectionEffect::ClearIf(cid));
    }

    #[test]
    fn duplicate_places_copy_after_source() {
        let t = doc(&["text", "button"]);
        let src = t.blocks[0].id();
        let edit = duplicate_block(&t, src).unwrap();
        assert_eq!(edit.template.blocks.len(), 3);
        let copy = &edit.template.blocks[1];
        assert_ne!(copy.id(), src);
        assert_eq!(edit.selection, SelectionEffect::Select(copy.id()));
        let (Block::Text(a), Block::Text(b)) = (&t.blocks[0], copy) else {
            panic!("expected two text blocks");
        };
        assert_eq!(a.html, b.html);
        assert_eq!(a.padding, b.padding);
    }

    #[test]
    fn move_validates_indices() {
        let t = doc(&["text", "button", "spacer"]);
        assert!(move_block(&t, 3, 0).is_none());
        assert!(move_block(&t, 0, 3).is_none());
        assert!(move_block(&t, 1, 1).is_none());
        let edit = move_block(&t, 0, 2).unwrap();
        assert_eq!(
            kinds(&edit.template),
            vec![BlockKind::Button, BlockKind::Spacer, BlockKind::Text]
        );
    }

    #[test]
    fn update_reaches_nested_blocks() {
        let t = doc(&["columns-3"]);
        let cid = t.blocks[0].id();
        let t = add_block_to_column(&t, cid, 2, "spacer", None)
            .unwrap()
            .template;
        let sid = t.blocks[0].as_columns().unwrap().columns[2].children[0].id();

        let edit = update_block(&t, sid, |b| {
            let mut b = b.clone();
            if let Block::Spacer(s) = &mut b {
                s.height = 48.0;
            }
            b
        })
        .unwrap();
        let Some(Block::Spacer(s)) = find_block_by_id(&edit.template.blocks, sid) else {
            panic!("spacer missing");
        };
        assert_eq!(s.height, 48.0);
    }

    #[test]
    fn update_with_identity_is_noop() {
        let t = doc(&["text"]);
        let id = t.blocks[0].id();
        assert!(update_block(&t, id, Block::clone).is_none());
        assert!(update_block(&t, BlockId::intern("nope"), Block::clone).is_none());
    }

    #[test]
    fn column_ops_reject_bad_targets() {
        let t = doc(&["text", "columns-2"]);
        let text = t.blocks[0].id();
        let cid = t.blocks[1].id();
        assert!(add_block_to_column(&t, text, 0, "text", None).is_none());
        assert!(add_block_to_column(&t, cid, 2, "text", None).is_none());
        assert!(delete_block_in_column(&t, cid, 0, text).is_none());
        assert!(move_block_in_columns(&t, cid, 0, 0, 1, 0).is_none());
    }

    #[test]
    fn move_between_columns_clamps_destination() {
        let t = doc(&["columns-2"]);
        let cid = t.blocks[0].id();
        let t = add_block_to_column(&t, cid, 0, "text", None).unwrap().template;
        let t = add_block_to_column(&t, cid, 0, "button", None).unwrap().template;

        let edit = move_block_in_columns(&t, cid, 0, 0, 1, 99).unwrap();
        let cols = edit.template.blocks[0].as_columns().unwrap();
        assert_eq!(cols.columns[0].children.len(), 1);
        assert_eq!(cols.columns[0].children[0].kind(), BlockKind::Button);
        assert_eq!(cols.columns[1].children[0].kind(), BlockKind::Text);
    }

    #[test]
    fn duplicate_in_column_selects_copy() {
        let t = doc(&["columns-2"]);
        let cid = t.blocks[0].id();
        let t = add_block_to_column(&t, cid, 1, "icon", None).unwrap().template;
        let icon = t.blocks[0].as_columns().unwrap().columns[1].children[0].id();

        let edit = duplicate_block_in_column(&t, cid, 1, icon).unwrap();
        let children = &edit.template.blocks[0].as_columns().unwrap().columns[1].children;
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].id(), icon);
        assert_eq!(edit.selection, SelectionEffect::Select(children[1].id()));
    }

    #[test]
    fn widths_stay_normalized() {
        let t = doc(&["columns-2"]);
        let cid = t.blocks[0].id();
        let edit = set_column_width(&t, cid, 0, 70.0).unwrap();
        let widths = &edit.template.blocks[0].as_columns().unwrap().widths;
        let sum: f64 = widths.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((widths[0] - 0.7 / 1.2).abs() < 1e-9);

        let edit = set_column_width(&edit.template, cid, 1, -50.0).unwrap();
        let widths = &edit.template.blocks[0].as_columns().unwrap().widths;
        assert_eq!(widths.as_slice(), &[1.0, 0.0]);

        let edit = equalize_columns(&edit.template, cid).unwrap();
        let widths = &edit.template.blocks[0].as_columns().unwrap().widths;
        assert_eq!(widths.as_slice(), &[0.5, 0.5]);
        assert!(equalize_columns(&edit.template, cid).is_none());
    }

    #[test]
    fn column_count_truncates_and_pads() {
        let t = doc(&["columns-2"]);
        let cid = t.blocks[0].id();
        let three = set_column_count(&t, cid, 3).unwrap().template;
        let cols = three.blocks[0].as_columns().unwrap();
        assert_eq!(cols.num_columns, 3);
        assert_eq!(cols.columns.len(), 3);
        assert_eq!(cols.widths.len(), 3);

        let two = set_column_count(&three, cid, 2).unwrap().template;
        let cols = two.blocks[0].as_columns().unwrap();
        assert_eq!(cols.columns.len(), 2);
        assert_eq!(cols.widths.as_slice(), &[0.5, 0.5]);

        assert!(set_column_count(&t, cid, 4).is_none());
        assert!(set_column_count(&t, cid, 2).is_none());
    }

    #[test]
    fn delete_at_removes_nested_block() {
        let t = doc(&["text", "columns-2"]);
        let cid = t.blocks[1].id();
        let t = add_block_to_column(&t, cid, 1, "image", None).unwrap().template;
        let image = t.blocks[1].as_columns().unwrap().columns[1].children[0].id();

        let path = locate_block(&t.blocks, image).unwrap();
        let edit = delete_at(&t, &path).unwrap();
        assert!(find_block_by_id(&edit.template.blocks, image).is_none());
        assert_eq!(edit.selection, SelectionEffect::ClearIf(image));
        assert_eq!(edit.template.blocks.len(), 2);
    }

    #[test]
    fn rename_skips_same_name() {
        let t = Template::empty();
        assert!(rename(&t, "Untitled Template").is_none());
        assert_eq!(rename(&t, "Launch").unwrap().template.name, "Launch");
    }
}
