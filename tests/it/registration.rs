use expect_test::{expect, Expect};
use subcommand::{BuildError, FlagKind, Parser, ScopeId};

fn noop(_: &str, _: &str) -> anyhow::Result<()> {
    Ok(())
}

fn noop_cmd(_: &str, _: &[String]) -> anyhow::Result<()> {
    Ok(())
}

fn check_err(err: BuildError, expect: Expect) {
    expect.assert_eq(&err.to_string());
}

#[test]
fn flags_are_indexed_by_both_names() {
    let mut p = Parser::new("test");
    let option = p.add_option("option", Some("o"), "This is an option", noop).unwrap();
    assert_eq!(option.kind(), FlagKind::Value);
    assert!(!option.is_mandatory());

    let flag = p.root().flag("option").unwrap();
    assert_eq!(flag.short(), Some("o"));
    assert_eq!(flag.description(), "This is an option");
}

#[test]
fn duplicate_flags() {
    let mut p = Parser::new("test");
    p.add_option("option", Some("o"), "", noop).unwrap();

    check_err(
        p.add_switch("option", Some("x"), "", noop).unwrap_err(),
        expect!["flag `option` already exists in `test`"],
    );
    check_err(
        p.add_switch("other", Some("o"), "", noop).unwrap_err(),
        expect!["flag `o` already exists in `test`"],
    );
    assert!(p.root().flag("other").is_none());

    p.add_switch("other", Some("x"), "", noop).unwrap();
    p.add_switch("third", None, "", noop).unwrap();
    assert_eq!(p.root().flags().count(), 3);
}

#[test]
fn same_flag_in_different_commands() {
    let mut p = Parser::new("test");
    p.add_switch("switch", Some("s"), "", noop).unwrap();
    let cmd = p.add_command("command", "", noop_cmd).unwrap();
    cmd.add_switch("switch", Some("s"), "", noop).unwrap();
    check_err(
        cmd.add_switch("switch", None, "", noop).unwrap_err(),
        expect!["flag `switch` already exists in `command`"],
    );
}

#[test]
fn malformed_flag_names() {
    let mut p = Parser::new("test");
    check_err(p.add_option("", Some("o"), "", noop).unwrap_err(), expect!["long flag name is empty"]);
    check_err(
        p.add_option("option OPTION", Some("o"), "", noop).unwrap_err(),
        expect!["flag name `option OPTION` has more than one word"],
    );
    check_err(
        p.add_option("option", Some("o o"), "", noop).unwrap_err(),
        expect!["flag name `o o` has more than one word"],
    );
    assert_eq!(p.root().flags().count(), 0);
}

#[test]
fn commands() {
    let mut p = Parser::new("test");
    let cmd = p.add_command("com", "A command", noop_cmd).unwrap();
    assert_eq!(cmd.name(), "com");
    assert_eq!(cmd.parent(), Some(ScopeId::Root));

    check_err(p.add_command("com", "", noop_cmd).unwrap_err(), expect!["command `com` already exists"]);
    check_err(
        p.add_command("help", "", noop_cmd).unwrap_err(),
        expect!["command `help` collides with the help command"],
    );
    check_err(
        p.set_help("com", "", noop_cmd).unwrap_err(),
        expect!["command `com` collides with the help command"],
    );

    p.add_command("another", "", noop_cmd).unwrap();
    let names = p.commands().map(|it| it.name()).collect::<Vec<_>>();
    assert_eq!(names, ["com", "another"]);
}

#[test]
fn parent_links_lead_to_the_root() {
    let mut p = Parser::new("test");
    p.add_command("com", "", noop_cmd).unwrap();

    let cmd = p.command("com").unwrap();
    let parent = p.scope(cmd.parent().unwrap()).unwrap();
    assert_eq!(parent.name(), "test");
    assert_eq!(parent.parent(), None);
    assert_eq!(p.help().parent(), Some(ScopeId::Root));
    assert_eq!(p.scope(ScopeId::Help).unwrap().name(), "help");
    assert!(p.scope(ScopeId::Command(7)).is_none());
}
