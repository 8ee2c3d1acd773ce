use std::{cell::RefCell, rc::Rc};

use expect_test::{expect, Expect};
use subcommand::{flag_usage, Command, HelpRenderer, Parser};

use crate::{check, Log};

fn noop(_: &str, _: &str) -> anyhow::Result<()> {
    Ok(())
}

fn noop_cmd(_: &str, _: &[String]) -> anyhow::Result<()> {
    Ok(())
}

/// A parser whose default help output is captured in the returned buffer.
fn app() -> (Parser, Rc<RefCell<String>>) {
    let mut p = Parser::new("app");
    p.add_switch("verbose", Some("v"), "Print more", noop).unwrap();
    p.add_option("config", None, "Read settings from CONFIG", noop).unwrap();
    p.add_command("build", "Build files", noop_cmd).unwrap();
    let deploy = p.add_command("deploy", "Deploy to an environment", noop_cmd).unwrap();
    deploy.set_parameter_hint("[SERVICE]...");
    deploy.add_option("target", Some("t"), "Environment to deploy to", noop).unwrap().must(true);
    deploy.add_switch("force", Some("f"), "", noop).unwrap();

    let out = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&out);
    p.set_help_output(move |text| sink.borrow_mut().push_str(text));
    (p, out)
}

fn check_help(args: &[&str], expect: Expect) {
    let (p, out) = app();
    let leftovers = p.parse(args.iter().copied()).unwrap();
    assert_eq!(leftovers, args[1..]);
    expect.assert_eq(&out.borrow());
}

#[test]
fn full_usage() {
    check_help(
        &["help"],
        expect![[r#"
            Usage: app [global_options] command [arguments]

            OPTIONS:
                -v, --verbose
                  Print more

                --config [CONFIG]
                  Read settings from CONFIG

            COMMANDS:
                build   Build files
                deploy  Deploy to an environment
                help    Type app help [command] for detailed information about a command
        "#]],
    );
}

#[test]
fn command_usage() {
    check_help(
        &["help", "deploy"],
        expect![[r#"
            deploy [SERVICE]...
              Deploy to an environment

            OPTIONS:
                -t, --target TARGET
                  Environment to deploy to

                -f, --force
        "#]],
    );
    check_help(
        &["help", "help"],
        expect![[r#"
            help
              Type app help [command] for detailed information about a command
        "#]],
    );
}

#[test]
fn unknown_command_falls_back_to_full_usage() {
    check_help(
        &["help", "nope"],
        expect![[r#"
            help: command not found nope
            Usage: app [global_options] command [arguments]

            OPTIONS:
                -v, --verbose
                  Print more

                --config [CONFIG]
                  Read settings from CONFIG

            COMMANDS:
                build   Build files
                deploy  Deploy to an environment
                help    Type app help [command] for detailed information about a command
        "#]],
    );
}

#[test]
fn help_swallows_command_names() {
    let (p, out) = app();
    // `deploy` would fail its mandatory check if it were entered.
    let leftovers = p.parse(["help", "deploy", "build"]).unwrap();
    assert_eq!(leftovers, ["deploy", "build"]);
    assert!(out.borrow().starts_with("deploy [SERVICE]..."));
}

#[test]
fn custom_help() {
    let log = Log::default();
    let mut p = Parser::new("test");
    p.add_command("command", "", log.command()).unwrap();
    p.set_help("canihazhelp", "Ask nicely", log.command()).unwrap();

    check(
        &p,
        &log,
        "canihazhelp arg1 arg2",
        expect![[r#"
            cmd canihazhelp ["arg1", "arg2"]
            ok ["arg1", "arg2"]
        "#]],
    );
    check(
        &p,
        &log,
        "help",
        expect![[r#"
            ok ["help"]
        "#]],
    );
    assert_eq!(p.help().name(), "canihazhelp");
}

#[test]
fn custom_renderer() {
    struct Terse;

    impl HelpRenderer for Terse {
        fn render_parser(&self, parser: &Parser) -> String {
            let names = parser.commands().map(Command::name).collect::<Vec<_>>();
            format!("{}: {}\n", parser.name(), names.join(", "))
        }
        fn render_command(&self, command: &Command) -> String {
            let flags = command.flags().map(flag_usage).collect::<Vec<_>>();
            format!("{}: {}\n", command.name(), flags.join(", "))
        }
    }

    let (mut p, out) = app();
    p.set_renderer(Terse);
    p.parse(["help"]).unwrap();
    p.parse(["help", "deploy"]).unwrap();
    expect![[r#"
        app: build, deploy
        deploy: -t, --target TARGET, -f, --force
    "#]]
    .assert_eq(&out.borrow());
}

#[test]
fn help_text_matches_the_help_command() {
    let (p, out) = app();
    p.parse(["help", "build"]).unwrap();
    assert_eq!(*out.borrow(), p.help_text(&["build".to_string()]));
    expect![[r#"
        build
          Build files
    "#]]
    .assert_eq(&p.help_text(&["build".to_string()]));
}
