use std::{fmt::Display, path::Path, process::ExitStatus};

use itertools::Itertools;
use miette::Diagnostic;
use tracing::debug;

use crate::semver::Version;

/// Something the version control system should do to record a release.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Operation {
    /// Commit exactly `files`, ignoring anything else that is staged.
    Commit { message: String, files: Vec<String> },
    AnnotatedTag { name: String, message: String },
}

impl Operation {
    /// Commit `files` with the bare version as the message.
    #[must_use]
    pub fn commit(version: &Version, files: Vec<String>) -> Self {
        Self::Commit {
            message: version.to_string(),
            files,
        }
    }

    /// Tag `v{version}`, with the bare version as the message.
    #[must_use]
    pub fn tag(version: &Version) -> Self {
        Self::AnnotatedTag {
            name: format!("v{version}"),
            message: version.to_string(),
        }
    }

    /// The arguments to pass to `git`.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Commit { message, files } => {
                let mut args = Vec::with_capacity(files.len() + 2);
                args.push("commit".to_string());
                args.push(format!("--message={message}"));
                args.extend(files.iter().cloned());
                args
            }
            Self::AnnotatedTag { name, message } => vec![
                "tag".to_string(),
                "--annotate".to_string(),
                format!("--message={message}"),
                name.clone(),
            ],
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "git {}", self.args().iter().join(" "))
    }
}

/// Runs [`Operation`]s against the repository in `working_directory`, blocking until they finish.
pub trait VersionControl {
    /// ## Errors
    /// If the operation could not be started or did not succeed.
    fn run(&mut self, operation: &Operation, working_directory: &Path) -> Result<(), Error>;
}

/// The `git` executable on the `PATH`. It shares this process's terminal.
#[derive(Clone, Copy, Debug, Default)]
pub struct Git;

impl VersionControl for Git {
    fn run(&mut self, operation: &Operation, working_directory: &Path) -> Result<(), Error> {
        debug!("Running {operation} in {}", working_directory.display());
        let mut command = execute::command_args!("git");
        command.args(operation.args()).current_dir(working_directory);
        let status = command.status().map_err(|source| Error::Spawn {
            operation: operation.to_string(),
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::Command {
                operation: operation.to_string(),
                status,
            })
        }
    }
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum Error {
    #[error("Could not run `{operation}`: {source}")]
    #[diagnostic(
        code(git::spawn),
        help("Make sure Git is installed and available on your PATH.")
    )]
    Spawn {
        operation: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{operation}` failed with {status}")]
    #[diagnostic(
        code(git::failed),
        help(
            "The changelog has already been updated. Fix the problem Git reported above, \
            then commit or tag the release manually."
        )
    )]
    Command {
        operation: String,
        status: ExitStatus,
    },
}
