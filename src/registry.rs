use std::collections::HashMap;

use crate::{flag::Flag, BuildError};

/// Flags of one command scope, indexed by long and by short name.
///
/// Iteration follows registration order.
#[derive(Debug, Default)]
pub struct FlagRegistry {
    flags: Vec<Flag>,
    long: HashMap<String, usize>,
    short: HashMap<String, usize>,
}

impl FlagRegistry {
    pub fn new() -> FlagRegistry {
        FlagRegistry::default()
    }

    /// Inserts `flag` into both indices, or into neither if either name is
    /// taken. `command` only feeds the error message.
    pub fn register(&mut self, flag: Flag, command: &str) -> Result<&mut Flag, BuildError> {
        let duplicate = |name: &str| BuildError::DuplicateFlag {
            flag: name.to_string(),
            command: command.to_string(),
        };
        if self.long.contains_key(flag.long()) {
            return Err(duplicate(flag.long()));
        }
        if let Some(short) = flag.short() {
            if self.short.contains_key(short) {
                return Err(duplicate(short));
            }
        }

        let idx = self.flags.len();
        self.long.insert(flag.long().to_string(), idx);
        if let Some(short) = flag.short() {
            self.short.insert(short.to_string(), idx);
        }
        self.flags.push(flag);
        Ok(&mut self.flags[idx])
    }

    pub fn lookup_long(&self, name: &str) -> Option<&Flag> {
        self.long.get(name).map(|&idx| &self.flags[idx])
    }

    pub fn lookup_short(&self, name: &str) -> Option<&Flag> {
        self.short.get(name).map(|&idx| &self.flags[idx])
    }

    pub(crate) fn lookup_long_mut(&mut self, name: &str) -> Option<&mut Flag> {
        let idx = *self.long.get(name)?;
        Some(&mut self.flags[idx])
    }

    pub fn all_flags(&self) -> impl Iterator<Item = &Flag> + '_ {
        self.flags.iter()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
