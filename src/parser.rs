use std::{collections::HashMap, ffi::OsString};

use tracing::{debug, trace};

use crate::{
    command::{Arity, Command, ScopeId},
    flag::{Flag, FlagKind},
    help::{DefaultRenderer, HelpRenderer},
    tokens::{Token, Tokens},
    BuildError, Error, ErrorKind, Result,
};

/// Runs right before the terminal callback of any dispatched command.
pub type CommandHook = Box<dyn Fn() -> anyhow::Result<()>>;

/// Root of the command tree. Its own flags are the global flags, its name is
/// the program name.
pub struct Parser {
    root: Command,
    commands: Vec<Command>,
    by_name: HashMap<String, usize>,
    help: Command,
    renderer: Box<dyn HelpRenderer>,
    help_output: Box<dyn Fn(&str)>,
    on_command: Option<CommandHook>,
}

impl Parser {
    /// Creates a parser for `program` with the default `help` command.
    pub fn new(program: &str) -> Parser {
        let help = Command::new(
            "help",
            &format!("Type {program} help [command] for detailed information about a command"),
            Some(ScopeId::Root),
            None,
        );
        Parser {
            root: Command::new(program, "", None, None),
            commands: Vec::new(),
            by_name: HashMap::new(),
            help,
            renderer: Box::new(DefaultRenderer),
            help_output: Box::new(|text| print!("{text}")),
            on_command: None,
        }
    }

    pub fn name(&self) -> &str {
        self.root.name()
    }

    pub fn root(&self) -> &Command {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Command {
        &mut self.root
    }

    /// Adds a global option, see [`Command::add_option`].
    pub fn add_option(
        &mut self,
        long: &str,
        short: Option<&str>,
        description: &str,
        callback: impl Fn(&str, &str) -> anyhow::Result<()> + 'static,
    ) -> Result<&mut Flag, BuildError> {
        self.root.add_option(long, short, description, callback)
    }

    /// Adds a global switch, see [`Command::add_switch`].
    pub fn add_switch(
        &mut self,
        long: &str,
        short: Option<&str>,
        description: &str,
        callback: impl Fn(&str, &str) -> anyhow::Result<()> + 'static,
    ) -> Result<&mut Flag, BuildError> {
        self.root.add_switch(long, short, description, callback)
    }

    /// Registers a subcommand. `callback` receives the command name followed
    /// by the leftovers of its scope.
    pub fn add_command(
        &mut self,
        name: &str,
        description: &str,
        callback: impl Fn(&str, &[String]) -> anyhow::Result<()> + 'static,
    ) -> Result<&mut Command, BuildError> {
        if name == self.help.name() {
            return Err(BuildError::ReservedCommand(name.to_string()));
        }
        if self.by_name.contains_key(name) {
            return Err(BuildError::DuplicateCommand(name.to_string()));
        }
        let idx = self.commands.len();
        let command = Command::new(name, description, Some(ScopeId::Root), Some(Box::new(callback)));
        self.commands.push(command);
        self.by_name.insert(name.to_string(), idx);
        Ok(&mut self.commands[idx])
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.by_name.get(name).map(|&idx| &self.commands[idx])
    }

    pub fn command_mut(&mut self, name: &str) -> Option<&mut Command> {
        let idx = *self.by_name.get(name)?;
        Some(&mut self.commands[idx])
    }

    /// Registered commands in registration order, without help.
    pub fn commands(&self) -> impl Iterator<Item = &Command> + '_ {
        self.commands.iter()
    }

    pub fn help(&self) -> &Command {
        &self.help
    }

    /// Replaces the help command.
    pub fn set_help(
        &mut self,
        name: &str,
        description: &str,
        callback: impl Fn(&str, &[String]) -> anyhow::Result<()> + 'static,
    ) -> Result<&mut Command, BuildError> {
        if self.by_name.contains_key(name) {
            return Err(BuildError::ReservedCommand(name.to_string()));
        }
        self.help = Command::new(name, description, Some(ScopeId::Root), Some(Box::new(callback)));
        Ok(&mut self.help)
    }

    pub fn set_renderer(&mut self, renderer: impl HelpRenderer + 'static) {
        self.renderer = Box::new(renderer);
    }

    /// Where the default help command writes. Stdout unless set.
    pub fn set_help_output(&mut self, output: impl Fn(&str) + 'static) {
        self.help_output = Box::new(output);
    }

    pub fn on_command(&mut self, hook: impl Fn() -> anyhow::Result<()> + 'static) {
        self.on_command = Some(Box::new(hook));
    }

    /// Looks up a node by the id its children store as their parent.
    pub fn scope(&self, id: ScopeId) -> Option<&Command> {
        match id {
            ScopeId::Root => Some(&self.root),
            ScopeId::Help => Some(&self.help),
            ScopeId::Command(idx) => self.commands.get(idx),
        }
    }

    fn node(&self, id: ScopeId) -> &Command {
        match id {
            ScopeId::Root => &self.root,
            ScopeId::Help => &self.help,
            ScopeId::Command(idx) => &self.commands[idx],
        }
    }

    /// What the default help command prints when followed by `args`.
    pub fn help_text(&self, args: &[String]) -> String {
        let Some(name) = args.first() else {
            return self.renderer.render_parser(self);
        };
        if let Some(cmd) = self.command(name) {
            return self.renderer.render_command(cmd);
        }
        if name == self.help.name() {
            return self.renderer.render_command(&self.help);
        }
        format!("help: command not found {name}\n{}", self.renderer.render_parser(self))
    }

    /// Parses `args` (without the program name), running flag callbacks and
    /// the terminal command callback.
    ///
    /// Returns every leftover of the parse. On failure the error carries the
    /// leftovers collected up to that point.
    pub fn parse<I>(&self, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect();
        Dispatch::new(self).run(Tokens::new(args))
    }

    /// Parses the arguments of the current process.
    pub fn parse_env(&self) -> Result<Vec<String>> {
        self.parse_os(std::env::args_os().skip(1))
    }

    /// Like [`Parser::parse`], but fails with [`ErrorKind::InvalidUtf8`]
    /// before running anything if an argument is not UTF-8.
    pub fn parse_os<I>(&self, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = OsString>,
    {
        let tokens = Tokens::from_args_os(args).map_err(|kind| Error::new(kind, Vec::new()))?;
        Dispatch::new(self).run(tokens)
    }
}

/// A recognised flag waiting for its scope to be validated.
struct Pending<'p> {
    flag: &'p Flag,
    value: String,
}

struct Dispatch<'p> {
    parser: &'p Parser,
    scope: ScopeId,
    pending: Vec<Pending<'p>>,
    /// Long names matched since `scope` became active.
    matched: Vec<&'p str>,
    leftovers: Vec<String>,
    /// Index of the first leftover collected in `scope`.
    scope_start: usize,
}

impl<'p> Dispatch<'p> {
    fn new(parser: &'p Parser) -> Dispatch<'p> {
        Dispatch {
            parser,
            scope: ScopeId::Root,
            pending: Vec::new(),
            matched: Vec::new(),
            leftovers: Vec::new(),
            scope_start: 0,
        }
    }

    fn run(mut self, mut tokens: Tokens) -> Result<Vec<String>> {
        match self.scan(&mut tokens) {
            Ok(()) => Ok(self.leftovers),
            Err(kind) => {
                debug!(error = %kind, scope = self.current().name(), "parse failed");
                Err(Error::new(kind, self.leftovers))
            }
        }
    }

    fn current(&self) -> &'p Command {
        self.parser.node(self.scope)
    }

    fn scan(&mut self, tokens: &mut Tokens) -> Result<(), ErrorKind> {
        while let Some(token) = tokens.pop() {
            let raw = token.raw();
            let registry = self.current().registry();
            let flag = match token {
                Token::Plain(word) => {
                    self.plain(word)?;
                    continue;
                }
                Token::Long(name) => registry.lookup_long(&name),
                Token::Short(name) => registry.lookup_short(&name),
            };
            let flag = flag.ok_or_else(|| ErrorKind::UnknownFlag {
                flag: raw.clone(),
                command: self.current().name().to_string(),
            })?;
            let value = match flag.kind() {
                FlagKind::Value => tokens.next_value(&raw)?,
                FlagKind::Switch => String::new(),
            };
            trace!(flag = flag.long(), value = %value, "deferred flag");
            self.matched.push(flag.long());
            self.pending.push(Pending { flag, value });
        }
        self.finish()
    }

    fn plain(&mut self, word: String) -> Result<(), ErrorKind> {
        self.flush()?;

        let mut next = None;
        if self.scope != ScopeId::Help {
            next = self.parser.by_name.get(&word).map(|&idx| ScopeId::Command(idx));
        }
        if next.is_none() && self.scope == ScopeId::Root && word == self.parser.help.name() {
            next = Some(ScopeId::Help);
        }

        match next {
            Some(scope) => self.enter(scope),
            None => {
                trace!(%word, "leftover");
                self.leftovers.push(word);
            }
        }
        Ok(())
    }

    fn enter(&mut self, scope: ScopeId) {
        self.scope = scope;
        self.matched.clear();
        self.scope_start = self.leftovers.len();
        debug!(command = self.current().name(), "entered scope");
    }

    /// Validates the active scope and runs its deferred flag callbacks.
    fn flush(&mut self) -> Result<(), ErrorKind> {
        check_mandatory(self.current(), &self.matched)?;
        self.run_pending()
    }

    fn run_pending(&mut self) -> Result<(), ErrorKind> {
        for Pending { flag, value } in self.pending.drain(..) {
            flag.call(&value).map_err(ErrorKind::Callback)?;
        }
        Ok(())
    }

    /// Arity is checked along with mandatory flags, before any deferred
    /// flag of the final scope runs.
    fn finish(&mut self) -> Result<(), ErrorKind> {
        let parser = self.parser;
        let command = self.current();
        check_mandatory(command, &self.matched)?;
        let found = self.leftovers.len() - self.scope_start;
        if let Arity::Exactly(expected) = command.arity() {
            if found != expected {
                return Err(ErrorKind::Arity {
                    command: command.name().to_string(),
                    expected,
                    found,
                });
            }
        }
        self.run_pending()?;

        let leftovers = &self.leftovers[self.scope_start..];

        if self.scope != ScopeId::Root {
            if let Some(hook) = &parser.on_command {
                hook().map_err(ErrorKind::Callback)?;
            }
        }

        debug!(command = command.name(), leftovers = leftovers.len(), "dispatching");
        if self.scope == ScopeId::Help && !command.has_callback() {
            (parser.help_output)(&parser.help_text(leftovers));
            return Ok(());
        }
        command.call(leftovers).map_err(ErrorKind::Callback)
    }
}

/// Fails on the first mandatory flag of `command` absent from `matched`.
fn check_mandatory(command: &Command, matched: &[&str]) -> Result<(), ErrorKind> {
    let missing = command
        .registry()
        .all_flags()
        .filter(|flag| flag.is_mandatory())
        .find(|flag| !matched.contains(&flag.long()));
    match missing {
        Some(flag) => Err(ErrorKind::MissingMandatoryFlag {
            flag: format!("--{}", flag.long()),
            command: command.name().to_string(),
        }),
        None => Ok(()),
    }
}
