//! Single-table facade: open a pager-backed file, insert and scan rows.
use std::path::Path;

use tracing::info;

use crate::btree;
use crate::cursor::Cursor;
use crate::errors::Error;
use crate::pager::Pager;
use crate::row::Row;

/// Page 0 always holds the root node, per the on-disk contract.
pub const ROOT_PAGE_NUM: u32 = 0;

pub struct Table {
    pager: Pager,
}

impl Table {
    /// Opens (creating if necessary) the single-file database at `path`. A
    /// brand new file gets an empty leaf root at page 0.
    pub fn open(path: impl AsRef<Path>) -> Result<Table, Error> {
        let mut pager = Pager::open(path)?;

        if pager.num_pages() == 0 {
            let root = pager.get_page(ROOT_PAGE_NUM)?;
            root.init_leaf();
            root.set_is_root(true);
        }

        Ok(Table { pager })
    }

    /// Inserts `row`, rejecting a duplicate key. Duplicate detection is
    /// executor-level policy, not a `btree` concern: the tree just places
    /// cells where it's told to.
    pub fn insert(&mut self, row: Row) -> Result<(), Error> {
        let cursor = Cursor::find(&mut self.pager, ROOT_PAGE_NUM, row.id)?;

        let node = self.pager.get_page(cursor.page_num)?;
        if cursor.cell_num < node.leaf_num_cells() && node.leaf_key(cursor.cell_num) == row.id {
            return Err(Error::DuplicateKey);
        }

        btree::insert(&mut self.pager, &cursor, ROOT_PAGE_NUM, row.id, &row)
    }

    /// A full scan in key order, following the leaf chain from the
    /// leftmost leaf.
    pub fn select_all(&mut self) -> Result<Vec<Row>, Error> {
        let mut rows = Vec::new();
        let mut cursor = Cursor::table_start(&mut self.pager, ROOT_PAGE_NUM)?;
        while !cursor.end_of_table {
            rows.push(cursor.value(&mut self.pager)?);
            cursor.advance(&mut self.pager)?;
        }
        Ok(rows)
    }

    pub fn pager_mut(&mut self) -> &mut Pager {
        &mut self.pager
    }

    /// Flushes every dirty page to disk. Called on `:q` and on normal
    /// process exit.
    pub fn close(&mut self) -> Result<(), Error> {
        self.pager.flush_all()?;
        info!("table closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn fresh_table_has_an_empty_leaf_root() {
        let tmp = NamedTempFile::new().unwrap();
        let mut table = Table::open(tmp.path()).unwrap();
        assert_eq!(table.select_all().unwrap().len(), 0);
    }

    #[test]
    fn insert_then_select_round_trips() {
        let tmp = NamedTempFile::new().unwrap();
        let mut table = Table::open(tmp.path()).unwrap();
        table
            .insert(Row::new(1, "alice", "alice@example.com"))
            .unwrap();
        let rows = table.select_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].username, "alice");
    }

    #[test]
    fn close_then_reopen_persists_rows() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let mut table = Table::open(tmp.path()).unwrap();
            table.insert(Row::new(1, "alice", "a@example.com")).unwrap();
            table.insert(Row::new(2, "bob", "b@example.com")).unwrap();
            table.close().unwrap();
        }
        {
            let mut table = Table::open(tmp.path()).unwrap();
            let rows = table.select_all().unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].id, 1);
            assert_eq!(rows[1].id, 2);
        }
    }
}
