use std::fmt;

/// Errors this crate can produce. `Pager`/`Fatal` are unrecoverable: the
/// caller that sees one should print it and exit, mirroring the original
/// `exit(1)` calls this store's on-disk format was modeled on.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// Out-of-range page id, a short read/write, or a corrupt (non-page-
    /// aligned) database file.
    Pager(String),
    /// A code path this store deliberately does not implement (internal
    /// node splitting).
    Fatal(String),
    /// Could not parse or validate a statement.
    Parse(String),
    DuplicateKey,
    TableFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error. {e}"),
            Error::Pager(msg) => write!(f, "{msg}"),
            Error::Fatal(msg) => write!(f, "{msg}"),
            Error::Parse(msg) => write!(f, "{msg}"),
            Error::DuplicateKey => write!(f, "Error: duplicate key!"),
            Error::TableFull => write!(f, "Error: table full!"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl Error {
    /// Whether this error should terminate the process rather than just
    /// be printed and the REPL continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Pager(_) | Error::Fatal(_))
    }
}
