//! Raw-mode terminal output helpers and the `echo!`/`error!`/`echo_lines!`
//! macros the REPL prints through.
use crossterm::{cursor, execute, style, ExecutableCommand};
use std::io::{self, Write};

const NAME: &str = env!("CARGO_PKG_NAME");

pub fn print_prompt() -> io::Result<()> {
    execute!(std::io::stdout(), cursor::MoveToNextLine(0))?;
    io::stdout()
        .execute(style::SetAttribute(style::Attribute::Bold))?
        .execute(style::Print(format!("{NAME}> ")))?
        .execute(style::SetAttribute(style::Attribute::Reset))?;
    io::stdout().flush()
}

pub fn echo(s: String) {
    let _ = io::stdout().execute(style::Print(s));
    let _ = execute!(std::io::stdout(), cursor::MoveToNextLine(0));
    let _ = io::stdout().flush();
}

pub fn error(s: String) {
    let _ = io::stdout().execute(style::Print(s));
    let _ = execute!(std::io::stdout(), cursor::MoveToNextLine(0));
    let _ = io::stdout().flush();
}

pub fn echo_lines(s: String) {
    for l in s.lines() {
        if io::stdout().execute(style::Print(format!("{l}\n"))).is_err() {
            continue;
        }
        let _ = execute!(std::io::stdout(), cursor::MoveToNextLine(0));
        let _ = io::stdout().flush();
    }
}

#[macro_export]
macro_rules! echo {
    ($($arg:tt)*) => {
        crate::console::echo(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        crate::console::error(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! echo_lines {
    ($($arg:tt)*) => {
        crate::console::echo_lines(format!($($arg)*))
    };
}
