//! A toy version control front end.
//!
//! ```console
//! $ RUST_LOG=debug cargo run --example vcs -- -v commit -m "first" src/lib.rs
//! $ cargo run --example vcs -- help commit
//! ```

use std::{cell::Cell, rc::Rc};

use subcommand::{Arity, Parser};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let verbose = Rc::new(Cell::new(false));
    let mut parser = Parser::new("vcs");

    let flag = Rc::clone(&verbose);
    parser
        .add_switch("verbose", Some("v"), "Explain what is being done", move |_, _| {
            flag.set(true);
            Ok(())
        })
        .unwrap();

    let commit = parser
        .add_command("commit", "Record changes", |_, files| {
            for file in files {
                println!("committing {file}");
            }
            Ok(())
        })
        .unwrap();
    commit.set_parameter_hint("[FILE]...");
    commit
        .add_option("message", Some("m"), "Use MESSAGE as the commit message", |_, message| {
            println!("message: {message}");
            Ok(())
        })
        .unwrap()
        .must(true);

    parser
        .add_command("checkout", "Switch branches", |_, args| {
            println!("switched to {}", args[0]);
            Ok(())
        })
        .unwrap()
        .set_parameter_hint("BRANCH")
        .set_arity(Arity::Exactly(1));

    match parser.parse_env() {
        Ok(_) => {
            if verbose.get() {
                eprintln!("done");
            }
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1)
        }
    }
}
