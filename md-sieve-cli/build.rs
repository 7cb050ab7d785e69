use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the top-level interface in src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
const SUBCOMMANDS: &[(&str, &str)] = &[
    ("render", "Render Markdown to sanitized HTML"),
    ("allowed-html", "Print the effective allow-list"),
    ("check", "Check whether a tag or attribute is allowed"),
];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("md-sieve")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render Markdown to HTML filtered by a merged allow-list")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to an md-sieve.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("list-parsers")
                .long("list-parsers")
                .help("List available parsers")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-providers")
                .long("list-providers")
                .help("List allow-list providers in merge order")
                .action(ArgAction::SetTrue),
        );

    for (name, about) in SUBCOMMANDS {
        cmd = cmd.subcommand(
            Command::new(*name)
                .about(*about)
                .arg(Arg::new("parser").long("parser").value_hint(ValueHint::Other))
                .arg(Arg::new("theme").long("theme").value_hint(ValueHint::Other)),
        );
    }

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "md-sieve", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "md-sieve", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "md-sieve", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
