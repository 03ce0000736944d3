//! The REPL (Read-Eval-Print-Loop) module.
pub mod history;
pub mod prompt;

use crossterm::{execute, terminal};
use std::io;

use crate::command;
use crate::errors::Error;
use crate::meta::{self, MetaResult};
use crate::statement;
use crate::table::Table;
use crate::{echo, echo_lines, error};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const BANNER: &str = r#"
Tiny embedded key-value store. Type `insert <id> <username> <email>` or
`select`. Meta commands start with ':' — try ':c', ':tree', ':d', ':q'.
"#;

pub fn run(table: &mut Table) -> Result<(), Error> {
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), terminal::Clear(terminal::ClearType::FromCursorDown))?;

    let result = repl_loop(table);

    terminal::disable_raw_mode()?;
    result
}

fn repl_loop(table: &mut Table) -> Result<(), Error> {
    echo!("Welcome to the {} {} REPL.\n", env!("CARGO_PKG_NAME"), VERSION);
    echo_lines!("{}\n", BANNER);

    let mut prompt = prompt::Prompt::new();

    loop {
        let input = match prompt.readline() {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                echo!("\nBye\n");
                break;
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with(':') || input == "dbg" {
            match meta::run(input, table)? {
                MetaResult::Quit => {
                    table.close()?;
                    echo!("Goodbye!\n");
                    break;
                }
                MetaResult::Success(out) => echo_lines!("{}", out),
                MetaResult::Unrecognized => echo!("Unrecognized command '{}'.\n", input),
            }
            continue;
        }

        match statement::parse(input) {
            Ok(stmt) => match command::execute(stmt, table) {
                Ok(command::CommandResult::Inserted) => echo!("Executed.\n"),
                Ok(command::CommandResult::Rows(rows)) => {
                    for row in rows {
                        echo!("{}\n", row);
                    }
                    echo!("Executed.\n");
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => error!("{}\n", e),
            },
            Err(e) => error!("{}\n", e),
        }
    }

    Ok(())
}
