//! Usage text for the help command.

use std::fmt::Write;

use crate::{Command, Flag, FlagKind, Parser};

macro_rules! w {
    ($($tt:tt)*) => {
        {
            let _ = write!($($tt)*);
        }
    };
}

/// Renders usage text for the help command.
///
/// The default help command calls [`HelpRenderer::render_parser`] when invoked
/// without arguments and [`HelpRenderer::render_command`] when invoked with
/// the name of a known command.
pub trait HelpRenderer {
    fn render_parser(&self, parser: &Parser) -> String;
    fn render_command(&self, command: &Command) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRenderer;

impl HelpRenderer for DefaultRenderer {
    fn render_parser(&self, parser: &Parser) -> String {
        let mut buf = String::new();
        w!(buf, "Usage: {} [global_options] command [arguments]\n", parser.name());

        let root = parser.root();
        if !root.description().is_empty() {
            blank_line(&mut buf);
            write_lines_indented(&mut buf, root.description(), 2);
        }
        if root.flags().next().is_some() {
            blank_line(&mut buf);
            w!(buf, "OPTIONS:\n");
            write_flags(&mut buf, root);
        }

        let commands = parser.commands().chain([parser.help()]).collect::<Vec<_>>();
        let width = commands.iter().map(|it| it.name().len()).max().unwrap_or(0);
        blank_line(&mut buf);
        w!(buf, "COMMANDS:\n");
        for cmd in commands {
            let row = format!("    {:width$}  {}", cmd.name(), cmd.description());
            w!(buf, "{}\n", row.trim_end());
        }
        buf
    }

    fn render_command(&self, command: &Command) -> String {
        let mut buf = String::new();
        w!(buf, "{}", command.name());
        if !command.parameter_hint().is_empty() {
            w!(buf, " {}", command.parameter_hint());
        }
        w!(buf, "\n");
        if !command.description().is_empty() {
            write_lines_indented(&mut buf, command.description(), 2);
        }
        if command.flags().next().is_some() {
            blank_line(&mut buf);
            w!(buf, "OPTIONS:\n");
            write_flags(&mut buf, command);
        }
        buf
    }
}

/// `-o, --option OPTION` for mandatory options, `[OPTION]` when optional.
pub fn flag_usage(flag: &Flag) -> String {
    let short = flag.short().map(|it| format!("-{it}, ")).unwrap_or_default();
    let value = match flag.kind() {
        FlagKind::Switch => String::new(),
        FlagKind::Value if flag.is_mandatory() => format!(" {}", flag.long().to_uppercase()),
        FlagKind::Value => format!(" [{}]", flag.long().to_uppercase()),
    };
    format!("{short}--{}{value}", flag.long())
}

fn write_flags(buf: &mut String, cmd: &Command) {
    let mut blank = "";
    for flag in cmd.flags() {
        w!(buf, "{blank}");
        blank = "\n";

        w!(buf, "    {}\n", flag_usage(flag));
        if !flag.description().is_empty() {
            write_lines_indented(buf, flag.description(), 6);
        }
    }
}

fn write_lines_indented(buf: &mut String, multiline_str: &str, indent: usize) {
    for line in multiline_str.split('\n').map(str::trim_end) {
        if line.is_empty() {
            w!(buf, "\n")
        } else {
            w!(buf, "{blank:indent$}{line}\n", blank = "");
        }
    }
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}
