//! B+ tree mutation: leaf insertion, leaf splitting, new-root creation, and
//! internal-node insertion. Search lives in `cursor`; this module is the
//! write side.
use tracing::{debug, error};

use crate::cursor::Cursor;
use crate::errors::Error;
use crate::node::{
    NodeType, INTERNAL_MAX_CELLS, LEAF_CELL_SIZE, LEAF_LEFT_SPLIT_COUNT, LEAF_MAX_CELLS,
    LEAF_RIGHT_SPLIT_COUNT,
};
use crate::pager::Pager;
use crate::row::Row;

/// Inserts `row` at `cursor`'s position. Assumes the caller (the executor,
/// see `Table::insert`) has already ruled out a duplicate key at that cell.
pub fn insert(
    pager: &mut Pager,
    cursor: &Cursor,
    root_page_num: u32,
    key: u32,
    row: &Row,
) -> Result<(), Error> {
    let node = pager.get_page(cursor.page_num)?;
    let num_cells = node.leaf_num_cells();

    if num_cells as usize >= LEAF_MAX_CELLS {
        return leaf_split_and_insert(pager, root_page_num, cursor.page_num, cursor.cell_num, key, row);
    }

    let node = pager.get_page(cursor.page_num)?;
    if cursor.cell_num < num_cells {
        let mut i = num_cells;
        while i > cursor.cell_num {
            node.copy_leaf_cell(i - 1, i);
            i -= 1;
        }
    }
    node.set_leaf_num_cells(num_cells + 1);
    node.set_leaf_key(cursor.cell_num, key);
    node.set_leaf_value(cursor.cell_num, row);
    Ok(())
}

/// Splits an overfull leaf in two (7/7, see `node::LEAF_*_SPLIT_COUNT`),
/// inserting the new key/row into whichever half it belongs in, then wires
/// the new leaf into the parent (creating a new root if the leaf being
/// split was the root).
fn leaf_split_and_insert(
    pager: &mut Pager,
    root_page_num: u32,
    old_page_num: u32,
    insert_cell_num: u32,
    key: u32,
    row: &Row,
) -> Result<(), Error> {
    let old_max = pager.get_page(old_page_num)?.max_key();
    let new_page_num = pager.unused_page_num();

    let old_parent = pager.get_page(old_page_num)?.parent();
    let old_next_leaf = pager.get_page(old_page_num)?.leaf_next_leaf();

    let new_node = pager.get_page(new_page_num)?;
    new_node.init_leaf();
    new_node.set_parent(old_parent);
    new_node.set_leaf_next_leaf(old_next_leaf);

    pager.get_page(old_page_num)?.set_leaf_next_leaf(new_page_num);

    // Redistribute cells right-to-left so the insertion point can be
    // spliced in without a separate shift pass.
    for i in (0..=LEAF_MAX_CELLS as u32).rev() {
        let index_within_node = i % LEAF_LEFT_SPLIT_COUNT as u32;

        if i == insert_cell_num {
            let dest_in_new = i >= LEAF_LEFT_SPLIT_COUNT as u32;
            if dest_in_new {
                let new_node = pager.get_page(new_page_num)?;
                new_node.set_leaf_key(index_within_node, key);
                new_node.set_leaf_value(index_within_node, row);
            } else {
                let old_node = pager.get_page(old_page_num)?;
                old_node.set_leaf_key(index_within_node, key);
                old_node.set_leaf_value(index_within_node, row);
            }
        } else {
            let src_index = if i > insert_cell_num { i - 1 } else { i };
            let cell = pager.get_page(old_page_num)?.leaf_cell_bytes(src_index);
            let dest_in_new = i >= LEAF_LEFT_SPLIT_COUNT as u32;
            if dest_in_new {
                pager
                    .get_page(new_page_num)?
                    .set_leaf_cell_bytes(index_within_node, &cell);
            } else {
                // Copying within the same node at a lower index is safe
                // because we iterate highest-index-first.
                pager
                    .get_page(old_page_num)?
                    .set_leaf_cell_bytes(index_within_node, &cell);
            }
        }
    }

    pager
        .get_page(old_page_num)?
        .set_leaf_num_cells(LEAF_LEFT_SPLIT_COUNT as u32);
    pager
        .get_page(new_page_num)?
        .set_leaf_num_cells(LEAF_RIGHT_SPLIT_COUNT as u32);

    debug!(old_page_num, new_page_num, "leaf split");

    if pager.get_page(old_page_num)?.is_root() {
        create_new_root(pager, root_page_num, new_page_num)
    } else {
        let parent_page_num = pager.get_page(old_page_num)?.parent();
        let new_max = pager.get_page(old_page_num)?.max_key();
        update_inode_key(pager, parent_page_num, old_max, new_max)?;
        inode_insert(pager, parent_page_num, new_page_num)
    }
}

/// The root leaf becomes a new left child; an internal node with one key
/// takes its place as root, pointing at the old (now-left) and new (right)
/// leaves.
fn create_new_root(pager: &mut Pager, root_page_num: u32, right_page_num: u32) -> Result<(), Error> {
    let left_page_num = pager.unused_page_num();

    let root_bytes = *pager.get_page(root_page_num)?.data;
    let left_child = pager.get_page(left_page_num)?;
    *left_child.data = root_bytes;
    left_child.set_is_root(false);

    let left_max_key = pager.get_page(left_page_num)?.max_key();

    let root = pager.get_page(root_page_num)?;
    root.init_internal();
    root.set_is_root(true);
    root.set_internal_num_keys(1);
    root.set_internal_child(0, left_page_num);
    root.set_internal_key(0, left_max_key);
    root.set_internal_right_child(right_page_num);

    pager.get_page(left_page_num)?.set_parent(root_page_num);
    pager.get_page(right_page_num)?.set_parent(root_page_num);

    debug!(root_page_num, left_page_num, right_page_num, "new root created");
    Ok(())
}

fn update_inode_key(pager: &mut Pager, page_num: u32, old_key: u32, new_key: u32) -> Result<(), Error> {
    let node = pager.get_page(page_num)?;
    let old_child_index = node.internal_find_child_index(old_key);
    node.set_internal_key(old_child_index, new_key);
    Ok(())
}

/// Inserts `child_page_num` into the internal node at `parent_page_num`.
/// Internal-node splitting is **not implemented** — once this would push
/// the parent over `INTERNAL_MAX_CELLS`, this fatals rather than silently
/// corrupting the tree.
fn inode_insert(pager: &mut Pager, parent_page_num: u32, child_page_num: u32) -> Result<(), Error> {
    let child_max_key = pager.get_page(child_page_num)?.max_key();
    let parent = pager.get_page(parent_page_num)?;
    let index = parent.internal_find_child_index(child_max_key);
    let original_num_keys = parent.internal_num_keys();
    parent.set_internal_num_keys(original_num_keys + 1);

    if original_num_keys as usize >= INTERNAL_MAX_CELLS {
        error!(parent_page_num, original_num_keys, "internal node split is not implemented");
        return Err(Error::Fatal(
            "Need to implement splitting internal node.".to_string(),
        ));
    }

    let right_child_page_num = parent.internal_right_child();
    let right_child_max_key = pager.get_page(right_child_page_num)?.max_key();

    if child_max_key > right_child_max_key {
        let parent = pager.get_page(parent_page_num)?;
        parent.set_internal_child(original_num_keys, right_child_page_num);
        parent.set_internal_key(original_num_keys, right_child_max_key);
        parent.set_internal_right_child(child_page_num);
    } else {
        let parent = pager.get_page(parent_page_num)?;
        let mut i = original_num_keys;
        while i > index {
            parent.copy_internal_cell(i - 1, i);
            i -= 1;
        }
        parent.set_internal_child(index, child_page_num);
        parent.set_internal_key(index, child_max_key);
    }

    pager.get_page(child_page_num)?.set_parent(parent_page_num);
    debug!(parent_page_num, child_page_num, "internal node insert");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;
    use tempfile::NamedTempFile;

    fn row(id: u32) -> Row {
        Row::new(id, format!("user{id}"), format!("user{id}@example.com"))
    }

    #[test]
    fn thirteen_rows_fit_in_a_single_leaf() {
        let tmp = NamedTempFile::new().unwrap();
        let mut table = Table::open(tmp.path()).unwrap();
        for id in 1..=LEAF_MAX_CELLS as u32 {
            table.insert(row(id)).unwrap();
        }
        let root = table.pager_mut().get_page(0).unwrap();
        assert_eq!(root.node_type(), NodeType::Leaf);
        assert_eq!(root.leaf_num_cells() as usize, LEAF_MAX_CELLS);
    }

    #[test]
    fn fourteenth_row_splits_the_root_into_two_leaves() {
        let tmp = NamedTempFile::new().unwrap();
        let mut table = Table::open(tmp.path()).unwrap();
        for id in 1..=LEAF_MAX_CELLS as u32 + 1 {
            table.insert(row(id)).unwrap();
        }
        let root = table.pager_mut().get_page(0).unwrap();
        assert_eq!(root.node_type(), NodeType::Internal);
        assert_eq!(root.internal_num_keys(), 1);

        let left = root.internal_child(0);
        let right = root.internal_right_child();

        let left_cells = table.pager_mut().get_page(left).unwrap().leaf_num_cells();
        let right_cells = table.pager_mut().get_page(right).unwrap().leaf_num_cells();
        assert_eq!(left_cells as usize, LEAF_LEFT_SPLIT_COUNT);
        assert_eq!(right_cells as usize, LEAF_RIGHT_SPLIT_COUNT);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let tmp = NamedTempFile::new().unwrap();
        let mut table = Table::open(tmp.path()).unwrap();
        table.insert(row(1)).unwrap();
        let err = table.insert(row(1)).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey));
    }

    #[test]
    fn rows_scan_back_out_in_key_order_after_a_split() {
        let tmp = NamedTempFile::new().unwrap();
        let mut table = Table::open(tmp.path()).unwrap();
        for id in (1..=20u32).rev() {
            table.insert(row(id)).unwrap();
        }
        let rows: Vec<u32> = table.select_all().unwrap().into_iter().map(|r| r.id).collect();
        let expected: Vec<u32> = (1..=20).collect();
        assert_eq!(rows, expected);
    }
}
