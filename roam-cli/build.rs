use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree in src/main.rs.
// Build scripts can't reach into src/, so the shape is repeated here.
fn input_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .help("Path to the PageDump file")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("roampub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Publish PageDump exports as Markdown and CommonMark tokens")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a roampub.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Publish a PageDump in another format")
                .arg(input_arg("input"))
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_parser(["pagedump"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_parser(["markdown", "commonmark", "tokens"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a PageDump against the graph invariants")
                .arg(input_arg("path")),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print vertex counts per type and the root title")
                .arg(input_arg("path")),
        );

    generate_to(Bash, &mut cmd, "roampub", &outdir)?;
    generate_to(Zsh, &mut cmd, "roampub", &outdir)?;
    generate_to(Fish, &mut cmd, "roampub", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
