//! A logical position `(page_id, cell_index)` into the table, plus an
//! `end_of_table` sentinel. Any structural mutation of the tree (a split,
//! a new root) invalidates existing cursors — callers must not hold one
//! across an insert.
use crate::errors::Error;
use crate::node::NodeType;
use crate::pager::Pager;
use crate::row::Row;

pub struct Cursor {
    pub page_num: u32,
    pub cell_num: u32,
    pub end_of_table: bool,
}

impl Cursor {
    /// Locates the position a row with `key` occupies or would occupy,
    /// descending from `root_page_num` through internal nodes as needed.
    pub fn find(pager: &mut Pager, root_page_num: u32, key: u32) -> Result<Cursor, Error> {
        let root = pager.get_page(root_page_num)?;
        match root.node_type() {
            NodeType::Leaf => Self::leaf_find(pager, root_page_num, key),
            NodeType::Internal => Self::internal_find(pager, root_page_num, key),
        }
    }

    fn leaf_find(pager: &mut Pager, page_num: u32, key: u32) -> Result<Cursor, Error> {
        let node = pager.get_page(page_num)?;
        let mut min_index = 0u32;
        let mut one_past_max_index = node.leaf_num_cells();

        while one_past_max_index != min_index {
            let index = (min_index + one_past_max_index) / 2;
            let key_at_index = node.leaf_key(index);
            if key == key_at_index {
                return Ok(Cursor {
                    page_num,
                    cell_num: index,
                    end_of_table: false,
                });
            }
            if key < key_at_index {
                one_past_max_index = index;
            } else {
                min_index = index + 1;
            }
        }

        Ok(Cursor {
            page_num,
            cell_num: min_index,
            end_of_table: false,
        })
    }

    fn internal_find(pager: &mut Pager, page_num: u32, key: u32) -> Result<Cursor, Error> {
        let node = pager.get_page(page_num)?;
        let child_index = node.internal_find_child_index(key);
        let child_num = node.internal_child(child_index);

        let child = pager.get_page(child_num)?;
        match child.node_type() {
            NodeType::Leaf => Self::leaf_find(pager, child_num, key),
            NodeType::Internal => Self::internal_find(pager, child_num, key),
        }
    }

    /// A cursor positioned at the first row in key order (the leftmost
    /// leaf's first cell), or `end_of_table` if the table is empty.
    pub fn table_start(pager: &mut Pager, root_page_num: u32) -> Result<Cursor, Error> {
        let mut cursor = Self::find(pager, root_page_num, 0)?;
        let node = pager.get_page(cursor.page_num)?;
        cursor.end_of_table = node.leaf_num_cells() == 0;
        Ok(cursor)
    }

    /// Advances to the next cell, following the leaf's `next_leaf` sibling
    /// pointer when the current leaf is exhausted. A `next_leaf` of 0 is
    /// the end-of-chain sentinel.
    pub fn advance(&mut self, pager: &mut Pager) -> Result<(), Error> {
        let node = pager.get_page(self.page_num)?;
        self.cell_num += 1;

        if self.cell_num >= node.leaf_num_cells() {
            let next_page_num = node.leaf_next_leaf();
            if next_page_num == 0 {
                self.end_of_table = true;
            } else {
                self.page_num = next_page_num;
                self.cell_num = 0;
            }
        }
        Ok(())
    }

    pub fn value(&self, pager: &mut Pager) -> Result<Row, Error> {
        let node = pager.get_page(self.page_num)?;
        Ok(node.leaf_value(self.cell_num))
    }
}
