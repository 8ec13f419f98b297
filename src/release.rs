//! One release, from reading the changelog to tagging the result.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use miette::Diagnostic;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    changelog::{self, Changelog},
    config::{self, Options},
    dry_run::RunType,
    fs::{self, FileStore},
    git::{self, Operation, VersionControl},
    manifest,
    semver::{self, Bump, Version},
    yaml::{self, Codec},
};

/// What a release did.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Release {
    pub bump: Bump,
    /// The most recent release before this one, if there was one.
    pub previous_version: Option<Version>,
    pub new_version: Version,
}

/// Turns the unreleased changes of a project into a new release.
///
/// Each step runs in order and the first failure stops the release. Nothing already written is
/// rolled back, so commit your work before releasing if you may need to undo it.
pub struct Transaction<'a> {
    files: &'a dyn FileStore,
    codec: &'a dyn Codec,
    version_control: &'a mut dyn VersionControl,
    /// Where progress is reported.
    stdout: &'a mut dyn Write,
}

impl<'a> Transaction<'a> {
    pub fn new(
        files: &'a dyn FileStore,
        codec: &'a dyn Codec,
        version_control: &'a mut dyn VersionControl,
        stdout: &'a mut dyn Write,
    ) -> Self {
        Self {
            files,
            codec,
            version_control,
            stdout,
        }
    }

    /// Release the project in `options.project_directory`.
    ///
    /// ## Errors
    /// 1. There's no changelog, or it can't be parsed, or it has no unreleased section.
    /// 2. A manifest exists but isn't a JSON object.
    /// 3. A file can't be written, or Git fails.
    pub fn run(&mut self, options: &Options) -> Result<Release, Error> {
        let run_type = RunType::new(options.dry_run);
        let directory = options.project_directory.as_path();

        let changelog_name = self.find_changelog(directory)?;
        let changelog_path = directory.join(&changelog_name);
        let text = self.files.read(&changelog_path).map_err(|err| {
            if err.is_not_found() {
                Error::ChangelogNotFound {
                    directory: directory.into(),
                }
            } else {
                err.into()
            }
        })?;
        let mut changelog = Changelog::try_from(self.codec.parse(&text)?)?;

        let (marker, unreleased) = changelog.take_unreleased()?;
        let previous_version = changelog.previous_version()?;
        let bump = semver::classify(unreleased.labels(), previous_version.is_some());
        let new_version = semver::next_version(previous_version, bump)?;
        self.report(format_args!(
            "Releasing {marker} as {new_version} ({})",
            describe(bump, previous_version)
        ))?;

        let date = config::format_date(options.release_date)?;
        changelog.prepend(new_version, unreleased.dated(date))?;
        let serialized = self.codec.serialize(&changelog.into())?;
        self.write(
            run_type.of(changelog::canonicalize(&serialized)),
            &changelog_path,
        )?;

        let mut committed = vec![changelog_name];
        if options.update_manifests {
            committed.extend(self.update_manifests(run_type, directory, &new_version)?);
        }
        if options.commits() {
            self.run_version_control(
                run_type.of(Operation::commit(&new_version, committed)),
                directory,
            )?;
        }
        if options.tag {
            self.run_version_control(run_type.of(Operation::tag(&new_version)), directory)?;
        }

        Ok(Release {
            bump,
            previous_version,
            new_version,
        })
    }

    fn find_changelog(&self, directory: &Path) -> Result<String, Error> {
        let file_names = self.files.list(directory).map_err(|err| {
            if err.is_not_found() {
                Error::ChangelogNotFound {
                    directory: directory.into(),
                }
            } else {
                err.into()
            }
        })?;
        let name = changelog::find_changelog(file_names).ok_or_else(|| {
            Error::ChangelogNotFound {
                directory: directory.into(),
            }
        })?;
        debug!("Using changelog {name}");
        Ok(name)
    }

    /// Set the version of every manifest which exists, returning the names of those updated.
    fn update_manifests(
        &mut self,
        run_type: RunType<()>,
        directory: &Path,
        new_version: &Version,
    ) -> Result<Vec<String>, Error> {
        let mut updated = Vec::new();
        for file in manifest::MANIFESTS {
            let path = directory.join(file);
            let content = match self.files.read(&path) {
                Ok(content) => content,
                Err(err) if err.is_not_found() => {
                    debug!("No {file}, skipping it");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            let new_content = manifest::set_version(file, &content, new_version)?;
            self.write(run_type.of(new_content), &path)?;
            updated.push(file.to_string());
        }
        Ok(updated)
    }

    fn write(&mut self, contents: RunType<String>, path: &Path) -> Result<(), Error> {
        match contents {
            RunType::DryRun(contents) => self.report(format_args!(
                "Would write the following to {}:\n{contents}",
                path.display()
            )),
            RunType::Real(contents) => {
                self.files.write(path, &contents)?;
                info!("Updated {}", path.display());
                Ok(())
            }
        }
    }

    fn run_version_control(
        &mut self,
        operation: RunType<Operation>,
        directory: &Path,
    ) -> Result<(), Error> {
        match operation {
            RunType::DryRun(operation) => self.report(format_args!("Would run {operation}")),
            RunType::Real(operation) => {
                self.report(format_args!("{operation}"))?;
                self.version_control
                    .run(&operation, directory)
                    .map_err(Error::from)
            }
        }
    }

    fn report(&mut self, message: std::fmt::Arguments<'_>) -> Result<(), Error> {
        writeln!(self.stdout, "{message}").map_err(Error::Stdout)
    }
}

fn describe(bump: Bump, previous_version: Option<Version>) -> String {
    match previous_version {
        Some(previous_version) => format!("{bump} release after {previous_version}"),
        None => format!("{bump} release"),
    }
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum Error {
    #[error("No changelog found in {directory}")]
    #[diagnostic(
        code(release::changelog_not_found),
        help(
            "Create a `Changelog.yaml` (or `changelog.yml`) in the project directory, \
            with your upcoming changes under a top-level `unreleased:` key."
        )
    )]
    ChangelogNotFound { directory: PathBuf },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Changelog(#[from] changelog::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] yaml::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Semver(#[from] semver::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] manifest::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Fs(#[from] fs::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Git(#[from] git::Error),
    #[error("Failed to format the release date: {0}")]
    #[diagnostic(
        code(release::date_format),
        help("The release date must have a four-digit year.")
    )]
    DateFormat(#[from] time::error::Format),
    #[error("Error writing to stdout: {0}")]
    #[diagnostic(code(release::stdout))]
    Stdout(#[source] std::io::Error),
}
