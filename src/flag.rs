use std::fmt;

use crate::BuildError;

/// Called with the flag's long name and its value (empty for switches).
pub type FlagCallback = Box<dyn Fn(&str, &str) -> anyhow::Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// `--option VALUE`
    Value,
    /// `--switch`
    Switch,
}

pub struct Flag {
    long: String,
    short: Option<String>,
    description: String,
    kind: FlagKind,
    mandatory: bool,
    callback: FlagCallback,
}

impl Flag {
    /// Builds a flag, trimming both names. An empty short name means the flag
    /// has none.
    pub fn new(
        long: &str,
        short: Option<&str>,
        description: &str,
        kind: FlagKind,
        callback: FlagCallback,
    ) -> Result<Flag, BuildError> {
        let long = long.trim();
        if long.is_empty() {
            return Err(BuildError::EmptyFlagName);
        }
        check_definition(long)?;

        let short = match short.map(str::trim) {
            Some("") | None => None,
            Some(short) => {
                check_definition(short)?;
                Some(short.to_string())
            }
        };

        Ok(Flag {
            long: long.to_string(),
            short,
            description: description.to_string(),
            kind,
            mandatory: false,
            callback,
        })
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Marks the flag as mandatory: parsing fails if its scope completes
    /// without it.
    pub fn must(&mut self, mandatory: bool) -> &mut Flag {
        self.mandatory = mandatory;
        self
    }

    pub(crate) fn call(&self, value: &str) -> anyhow::Result<()> {
        (self.callback)(&self.long, value)
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("long", &self.long)
            .field("short", &self.short)
            .field("kind", &self.kind)
            .field("mandatory", &self.mandatory)
            .finish_non_exhaustive()
    }
}

fn check_definition(name: &str) -> Result<(), BuildError> {
    if name.contains(char::is_whitespace) {
        return Err(BuildError::InvalidFlagName(name.to_string()));
    }
    Ok(())
}
