//! `:`-prefixed meta commands: `:q`, `:c`, `:tree`, `:d`/`dbg`.
use crate::errors::Error;
use crate::node::{NodeType, LEAF_CELL_SIZE, LEAF_HEADER_SIZE, LEAF_MAX_CELLS, LEAF_SPACE_FOR_CELLS};
use crate::row::ROW_SIZE;
use crate::table::{Table, ROOT_PAGE_NUM};

pub enum MetaResult {
    Success(String),
    Quit,
    Unrecognized,
}

pub fn run(input: &str, table: &mut Table) -> Result<MetaResult, Error> {
    match input {
        ":q" => Ok(MetaResult::Quit),
        ":c" => Ok(MetaResult::Success(constants())),
        ":tree" => Ok(MetaResult::Success(print_tree(table)?)),
        ":d" | "dbg" => {
            let mut out = constants();
            out.push('\n');
            out.push_str(&print_tree(table)?);
            Ok(MetaResult::Success(out))
        }
        _ => Ok(MetaResult::Unrecognized),
    }
}

fn constants() -> String {
    format!(
        "Constants:\nROW_SIZE: {ROW_SIZE}\nLEAF_HEADER_SIZE: {LEAF_HEADER_SIZE}\nLEAF_CELL_SIZE: {LEAF_CELL_SIZE}\nLEAF_SPACE_FOR_CELLS: {LEAF_SPACE_FOR_CELLS}\nLEAF_MAX_CELLS: {LEAF_MAX_CELLS}"
    )
}

/// Recurses through internal nodes, printing each leaf's size and keys —
/// the original source only ever printed the root assuming it was a leaf;
/// this resolves that by descending when the root is internal.
fn print_tree(table: &mut Table) -> Result<String, Error> {
    let mut out = String::from("Tree:\n");
    print_node(table, ROOT_PAGE_NUM, 0, &mut out)?;
    Ok(out)
}

fn print_node(table: &mut Table, page_num: u32, indent: usize, out: &mut String) -> Result<(), Error> {
    let pad = "  ".repeat(indent);
    let node = table.pager_mut().get_page(page_num)?;
    match node.node_type() {
        NodeType::Leaf => {
            let num_cells = node.leaf_num_cells();
            out.push_str(&format!("{pad}- leaf (size {num_cells})\n"));
            for i in 0..num_cells {
                let node = table.pager_mut().get_page(page_num)?;
                out.push_str(&format!("{pad}  - {} : {}\n", i, node.leaf_key(i)));
            }
        }
        NodeType::Internal => {
            let num_keys = node.internal_num_keys();
            out.push_str(&format!("{pad}- internal (size {num_keys})\n"));
            let mut children: Vec<u32> = Vec::with_capacity(num_keys as usize + 1);
            for i in 0..=num_keys {
                children.push(table.pager_mut().get_page(page_num)?.internal_child(i));
            }
            for (i, child) in children.iter().enumerate() {
                print_node(table, *child, indent + 1, out)?;
                if i < num_keys as usize {
                    let key = table.pager_mut().get_page(page_num)?.internal_key(i as u32);
                    out.push_str(&format!("{pad}  key {key}\n"));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;
    use tempfile::NamedTempFile;

    #[test]
    fn tree_of_a_fresh_table_shows_an_empty_leaf() {
        let tmp = NamedTempFile::new().unwrap();
        let mut table = Table::open(tmp.path()).unwrap();
        let out = print_tree(&mut table).unwrap();
        assert!(out.contains("leaf (size 0)"));
    }

    #[test]
    fn tree_after_a_split_shows_an_internal_root() {
        let tmp = NamedTempFile::new().unwrap();
        let mut table = Table::open(tmp.path()).unwrap();
        for id in 1..=(LEAF_MAX_CELLS as u32 + 1) {
            table
                .insert(Row::new(id, format!("u{id}"), format!("u{id}@x.com")))
                .unwrap();
        }
        let out = print_tree(&mut table).unwrap();
        assert!(out.contains("internal (size 1)"));
    }

    #[test]
    fn constants_reports_the_derived_leaf_max_cells() {
        assert!(constants().contains("LEAF_MAX_CELLS: 13"));
    }
}
