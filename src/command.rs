use std::fmt;

use crate::{
    flag::{Flag, FlagCallback, FlagKind},
    registry::FlagRegistry,
    BuildError,
};

/// Called with the command's name and the leftovers collected in its scope.
pub type CommandCallback = Box<dyn Fn(&str, &[String]) -> anyhow::Result<()>>;

/// Identifies a command node inside its parser.
///
/// Used as the link from a command to its parent, so the tree never holds
/// owning back-references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeId {
    Root,
    Help,
    Command(usize),
}

/// Expected number of leftovers for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arity {
    #[default]
    Unbounded,
    Exactly(usize),
}

pub struct Command {
    name: String,
    description: String,
    parameter_hint: String,
    arity: Arity,
    flags: FlagRegistry,
    callback: Option<CommandCallback>,
    parent: Option<ScopeId>,
}

impl Command {
    pub(crate) fn new(
        name: &str,
        description: &str,
        parent: Option<ScopeId>,
        callback: Option<CommandCallback>,
    ) -> Command {
        Command {
            name: name.to_string(),
            description: description.to_string(),
            parameter_hint: String::new(),
            arity: Arity::Unbounded,
            flags: FlagRegistry::new(),
            callback,
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameter_hint(&self) -> &str {
        &self.parameter_hint
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// `None` for the root scope.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn flags(&self) -> impl Iterator<Item = &Flag> + '_ {
        self.flags.all_flags()
    }

    pub fn flag(&self, long: &str) -> Option<&Flag> {
        self.flags.lookup_long(long)
    }

    pub fn flag_mut(&mut self, long: &str) -> Option<&mut Flag> {
        self.flags.lookup_long_mut(long)
    }

    pub(crate) fn registry(&self) -> &FlagRegistry {
        &self.flags
    }

    /// Adds `--long VALUE`; `callback` receives the long name and the value.
    pub fn add_option(
        &mut self,
        long: &str,
        short: Option<&str>,
        description: &str,
        callback: impl Fn(&str, &str) -> anyhow::Result<()> + 'static,
    ) -> Result<&mut Flag, BuildError> {
        self.add_flag(long, short, description, FlagKind::Value, Box::new(callback))
    }

    /// Adds `--long`; `callback` receives the long name and an empty value.
    pub fn add_switch(
        &mut self,
        long: &str,
        short: Option<&str>,
        description: &str,
        callback: impl Fn(&str, &str) -> anyhow::Result<()> + 'static,
    ) -> Result<&mut Flag, BuildError> {
        self.add_flag(long, short, description, FlagKind::Switch, Box::new(callback))
    }

    fn add_flag(
        &mut self,
        long: &str,
        short: Option<&str>,
        description: &str,
        kind: FlagKind,
        callback: FlagCallback,
    ) -> Result<&mut Flag, BuildError> {
        let flag = Flag::new(long, short, description, kind, callback)?;
        self.flags.register(flag, &self.name)
    }

    pub fn set_description(&mut self, description: &str) -> &mut Command {
        self.description = description.to_string();
        self
    }

    pub fn set_parameter_hint(&mut self, hint: &str) -> &mut Command {
        self.parameter_hint = hint.to_string();
        self
    }

    pub fn set_arity(&mut self, arity: Arity) -> &mut Command {
        self.arity = arity;
        self
    }

    pub fn set_callback(
        &mut self,
        callback: impl Fn(&str, &[String]) -> anyhow::Result<()> + 'static,
    ) -> &mut Command {
        self.callback = Some(Box::new(callback));
        self
    }

    pub(crate) fn call(&self, leftovers: &[String]) -> anyhow::Result<()> {
        match &self.callback {
            Some(callback) => callback(&self.name, leftovers),
            None => Ok(()),
        }
    }

    pub(crate) fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("flags", &self.flags)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}
