use std::{env::var, io::stdout, path::PathBuf};

use clap::{Arg, ArgAction, Command, command, value_parser};
use miette::Result;
use tracing::Level;

pub use crate::{
    changelog::{Changelog, Marker, ReleaseRecord},
    config::Options,
    fs::{Disk, FileStore},
    git::{Git, Operation, VersionControl},
    release::{Release, Transaction},
    semver::{Bump, Version, classify, next_version},
    yaml::{Codec, Yaml},
};

pub mod changelog;
pub mod config;
mod dry_run;
pub mod fs;
pub mod git;
pub mod manifest;
pub mod release;
pub mod semver;
pub mod yaml;

/// The command line interface.
#[must_use]
pub fn command() -> Command {
    command!()
        .arg(
            Arg::new("path")
                .long("path")
                .short('p')
                .value_name("DIR")
                .env("YANKEE_PATH")
                .value_parser(value_parser!(PathBuf))
                .help("The project directory, containing the changelog. Defaults to the current directory."),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .value_name("YYYY-MM-DD")
                .env("YANKEE_DATE")
                .value_parser(config::parse_date)
                .help("The date of the release. Defaults to today."),
        )
        .arg(
            Arg::new("npm")
                .long("npm")
                .env("YANKEE_NPM")
                .action(ArgAction::SetTrue)
                .help("Set the new version in package.json, package-lock.json, and npm-shrinkwrap.json."),
        )
        .arg(
            Arg::new("commit")
                .long("commit")
                .env("YANKEE_COMMIT")
                .action(ArgAction::SetTrue)
                .help("Commit the changelog (and any updated manifests) with the version as the message."),
        )
        .arg(
            Arg::new("tag")
                .long("tag")
                .env("YANKEE_TAG")
                .action(ArgAction::SetTrue)
                .help("Create an annotated tag `v<version>` for the release. Implies --commit."),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Print what would change without writing files or running Git."),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Print extra information while releasing."),
        )
}

/// Run the command line interface.
///
/// ## Errors
/// Whenever the release can't be completed, explained for a human.
pub fn run() -> Result<()> {
    let matches = command().get_matches();
    if let Some(level) = log_level(matches.get_flag("verbose"), var("RUST_LOG").is_ok()) {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .init();
    }

    let options = Options::from_matches(&matches, &Disk)?;
    let mut stdout = stdout();
    Transaction::new(&Disk, &Yaml, &mut Git, &mut stdout).run(&options)?;
    Ok(())
}

/// How much to log. `--verbose` logs at debug level. Setting `RUST_LOG` to anything logs
/// everything at trace level; its value is not interpreted as a filter.
fn log_level(verbose: bool, rust_log_set: bool) -> Option<Level> {
    if verbose {
        Some(Level::DEBUG)
    } else if rust_log_set {
        Some(Level::TRACE)
    } else {
        None
    }
}
