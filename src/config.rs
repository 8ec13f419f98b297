use std::path::{Path, PathBuf};

use clap::ArgMatches;
use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;
use time::{Date, OffsetDateTime, macros::format_description};
use tracing::debug;

use crate::fs::{self, FileStore};

/// Optional defaults, read from the project directory.
pub const CONFIG_FILE: &str = "yankee.toml";

/// Everything a release can be told.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    /// The directory holding the changelog (and manifests).
    pub project_directory: PathBuf,
    /// The date recorded for the new release.
    pub release_date: Date,
    /// Set `version` in each of [`crate::manifest::MANIFESTS`] which exists.
    pub update_manifests: bool,
    /// Commit the changelog and every updated manifest.
    pub commit: bool,
    /// Create an annotated tag for the release. Implies `commit`.
    pub tag: bool,
    /// Report what would change without changing anything.
    pub dry_run: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            project_directory: PathBuf::from("."),
            release_date: today(),
            update_manifests: false,
            commit: false,
            tag: false,
            dry_run: false,
        }
    }
}

impl Options {
    /// Whether the release gets committed.
    #[must_use]
    pub const fn commits(&self) -> bool {
        self.commit || self.tag
    }

    /// Combine the command line with the [`CONFIG_FILE`] of the project directory it selects.
    /// A flag given on the command line always wins over the file.
    ///
    /// ## Errors
    /// If there's a config file which can't be read or parsed.
    pub fn from_matches(matches: &ArgMatches, files: &dyn FileStore) -> Result<Self, Error> {
        let project_directory = matches
            .get_one::<PathBuf>("path")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("."));
        let file = ConfigFile::load(files, &project_directory)?;
        Ok(Self {
            release_date: matches
                .get_one::<Date>("date")
                .copied()
                .unwrap_or_else(today),
            update_manifests: matches.get_flag("npm") || file.npm.unwrap_or_default(),
            commit: matches.get_flag("commit") || file.commit.unwrap_or_default(),
            tag: matches.get_flag("tag") || file.tag.unwrap_or_default(),
            dry_run: matches.get_flag("dry-run"),
            project_directory,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    npm: Option<bool>,
    commit: Option<bool>,
    tag: Option<bool>,
}

impl ConfigFile {
    fn load(files: &dyn FileStore, project_directory: &Path) -> Result<Self, Error> {
        let path = project_directory.join(CONFIG_FILE);
        let source = match files.read(&path) {
            Ok(source) => source,
            Err(err) if err.is_not_found() => {
                debug!("No {CONFIG_FILE} found, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        toml::from_str(&source).map_err(|source| Error::Parse { path, source })
    }
}

/// The current local date, or the current UTC date if the local offset can't be determined.
#[must_use]
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Parse a `YYYY-MM-DD` date.
///
/// ## Errors
/// If `value` is not a valid date in that format.
pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
}

/// Format a date as `YYYY-MM-DD`.
///
/// ## Errors
/// If the year doesn't fit in four digits.
pub fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(format_description!("[year]-[month]-[day]"))
}

#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    #[error("Could not parse {path}: {source}")]
    #[diagnostic(
        code(config::parse),
        help("The only supported settings are `npm`, `commit`, and `tag`, each `true` or `false`.")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Fs(#[from] fs::Error),
}
