//! Executes a parsed `Statement` against a `Table`.
use crate::errors::Error;
use crate::row::Row;
use crate::statement::Statement;
use crate::table::Table;

pub enum CommandResult {
    Inserted,
    Rows(Vec<Row>),
}

pub fn execute(stmt: Statement, table: &mut Table) -> Result<CommandResult, Error> {
    match stmt {
        Statement::Insert(row) => {
            table.insert(row)?;
            Ok(CommandResult::Inserted)
        }
        Statement::SelectAll => {
            let rows = table.select_all()?;
            Ok(CommandResult::Rows(rows))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn insert_then_select_via_execute() {
        let tmp = NamedTempFile::new().unwrap();
        let mut table = Table::open(tmp.path()).unwrap();

        let inserted = execute(
            Statement::Insert(Row::new(1, "alice", "alice@example.com")),
            &mut table,
        )
        .unwrap();
        assert!(matches!(inserted, CommandResult::Inserted));

        match execute(Statement::SelectAll, &mut table).unwrap() {
            CommandResult::Rows(rows) => assert_eq!(rows.len(), 1),
            _ => panic!("expected rows"),
        }
    }

    #[test]
    fn duplicate_insert_surfaces_as_an_error() {
        let tmp = NamedTempFile::new().unwrap();
        let mut table = Table::open(tmp.path()).unwrap();
        execute(
            Statement::Insert(Row::new(1, "alice", "alice@example.com")),
            &mut table,
        )
        .unwrap();
        let err = execute(
            Statement::Insert(Row::new(1, "bob", "bob@example.com")),
            &mut table,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateKey));
    }
}
