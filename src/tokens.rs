use std::ffi::OsString;

use crate::ErrorKind;

/// One classified argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// `--name`, carrying `name`.
    Long(String),
    /// `-name`, carrying `name`.
    Short(String),
    Plain(String),
}

impl Token {
    /// The argument as it appeared on the command line.
    pub(crate) fn raw(&self) -> String {
        match self {
            Token::Long(name) => format!("--{name}"),
            Token::Short(name) => format!("-{name}"),
            Token::Plain(word) => word.clone(),
        }
    }
}

pub(crate) struct Tokens {
    rargs: Vec<String>,
}

impl Tokens {
    pub(crate) fn new(mut args: Vec<String>) -> Self {
        args.reverse();
        Self { rargs: args }
    }

    pub(crate) fn from_args_os<I>(args: I) -> Result<Self, ErrorKind>
    where
        I: IntoIterator<Item = OsString>,
    {
        let args = args.into_iter().map(utf8).collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(args))
    }

    pub(crate) fn pop(&mut self) -> Option<Token> {
        let arg = self.rargs.pop()?;
        let token = if let Some(name) = arg.strip_prefix("--") {
            Token::Long(name.to_string())
        } else if let Some(name) = arg.strip_prefix('-') {
            Token::Short(name.to_string())
        } else {
            Token::Plain(arg)
        };
        Some(token)
    }

    /// Consumes the argument following `flag`, whatever it looks like.
    pub(crate) fn next_value(&mut self, flag: &str) -> Result<String, ErrorKind> {
        self.rargs.pop().ok_or_else(|| ErrorKind::MissingValue { flag: flag.to_string() })
    }
}

fn utf8(arg: OsString) -> Result<String, ErrorKind> {
    arg.into_string().map_err(ErrorKind::InvalidUtf8)
}
