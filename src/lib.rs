//! Command line parsing for git-style subcommands.
//!
//! A [`Parser`] holds global flags, named subcommands with their own flags,
//! and a reserved `help` command. Parsing walks the arguments once: flags are
//! recognised against the active command, a plain word naming a command makes
//! that command active, and any other plain word becomes a leftover passed to
//! the active command's callback.
//!
//! Flag callbacks are deferred until their command's input has been checked
//! for mandatory flags, so a malformed command line runs no callback of the
//! offending scope.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//!
//! let built = Rc::new(RefCell::new(Vec::new()));
//!
//! let mut parser = subcommand::Parser::new("app");
//! parser.add_switch("verbose", Some("v"), "Print more", |_, _| Ok(())).unwrap();
//! let sink = Rc::clone(&built);
//! parser
//!     .add_command("build", "Build files", move |_, files| {
//!         sink.borrow_mut().extend_from_slice(files);
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let leftovers = parser.parse(["-v", "build", "x.txt"]).unwrap();
//! assert_eq!(leftovers, ["x.txt"]);
//! assert_eq!(*built.borrow(), ["x.txt"]);
//! ```

mod command;
mod flag;
mod help;
mod parser;
mod registry;
mod tokens;

use std::{ffi::OsString, fmt};

pub use crate::{
    command::{Arity, Command, CommandCallback, ScopeId},
    flag::{Flag, FlagCallback, FlagKind},
    help::{flag_usage, DefaultRenderer, HelpRenderer},
    parser::{CommandHook, Parser},
    registry::FlagRegistry,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Mistakes in wiring up a [`Parser`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("command `{0}` already exists")]
    DuplicateCommand(String),
    #[error("command `{0}` collides with the help command")]
    ReservedCommand(String),
    #[error("flag `{flag}` already exists in `{command}`")]
    DuplicateFlag { flag: String, command: String },
    #[error("long flag name is empty")]
    EmptyFlagName,
    #[error("flag name `{0}` has more than one word")]
    InvalidFlagName(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("`{flag}` is not a valid flag for `{command}`")]
    UnknownFlag { flag: String, command: String },
    #[error("expected a value for `{flag}`")]
    MissingValue { flag: String },
    #[error("flag is required: `{flag}` for `{command}`")]
    MissingMandatoryFlag { flag: String, command: String },
    #[error("`{command}` expects {expected} argument(s), got {found}")]
    Arity { command: String, expected: usize, found: usize },
    #[error("invalid utf8 argument: {0:?}")]
    InvalidUtf8(OsString),
    /// A flag or command callback failed.
    #[error(transparent)]
    Callback(#[from] anyhow::Error),
}

/// A failed parse, with the leftovers collected before the failure.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    leftovers: Vec<String>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, leftovers: Vec<String>) -> Error {
        Error { kind, leftovers }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn leftovers(&self) -> &[String] {
        &self.leftovers
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Callback(err) => Some(&**err),
            kind => std::error::Error::source(kind),
        }
    }
}
