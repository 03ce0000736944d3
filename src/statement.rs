//! Parses and validates the two statements this REPL accepts:
//! `insert <id> <username> <email>` and `select`.
use crate::errors::Error;
use crate::row::{Row, EMAIL_MAX_LEN, USERNAME_MAX_LEN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    SelectAll,
}

/// Parses one line of input into a `Statement`. Mirrors the original
/// source's `prepare_statement`/`prepare_insert`: dispatch on the leading
/// keyword, then whitespace-split the rest.
pub fn parse(input: &str) -> Result<Statement, Error> {
    if input.starts_with("insert") {
        return parse_insert(input);
    }
    if input.starts_with("select") {
        return Ok(Statement::SelectAll);
    }
    Err(Error::Parse(format!(
        "Unrecognized keyword at start of '{input}'."
    )))
}

fn parse_insert(input: &str) -> Result<Statement, Error> {
    let mut parts = input.split_whitespace();
    parts.next(); // "insert"
    let id_str = parts.next();
    let username = parts.next();
    let email = parts.next();

    let (id_str, username, email) = match (id_str, username, email) {
        (Some(i), Some(u), Some(e)) => (i, u, e),
        _ => {
            return Err(Error::Parse(format!(
                "Syntax error. Could not parse statement '{input}'."
            )))
        }
    };

    let id: i64 = id_str
        .parse()
        .map_err(|_| Error::Parse(format!("Syntax error. Could not parse statement '{input}'.")))?;

    if id < 1 {
        return Err(Error::Parse("ID must be positive.".to_string()));
    }

    validate_field(username, USERNAME_MAX_LEN)?;
    validate_field(email, EMAIL_MAX_LEN)?;

    Ok(Statement::Insert(Row::new(id as u32, username, email)))
}

fn validate_field(value: &str, max_len: usize) -> Result<(), Error> {
    if value.len() > max_len {
        return Err(Error::Parse("A string is too long.".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_insert() {
        let stmt = parse("insert 1 cstack foo@bar.com").unwrap();
        assert_eq!(
            stmt,
            Statement::Insert(Row::new(1, "cstack", "foo@bar.com"))
        );
    }

    #[test]
    fn parses_select() {
        assert_eq!(parse("select").unwrap(), Statement::SelectAll);
    }

    #[test]
    fn rejects_missing_arguments() {
        assert!(matches!(parse("insert 1 cstack"), Err(Error::Parse(_))));
    }

    #[test]
    fn rejects_negative_id() {
        assert!(matches!(
            parse("insert -1 cstack foo@bar.com"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn rejects_username_over_32_bytes() {
        let long = "a".repeat(33);
        let input = format!("insert 1 {long} foo@bar.com");
        assert!(matches!(parse(&input), Err(Error::Parse(_))));
    }

    #[test]
    fn rejects_unrecognized_keyword() {
        assert!(matches!(parse("delete 1"), Err(Error::Parse(_))));
    }
}
