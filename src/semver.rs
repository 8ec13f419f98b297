//! Picks the next version of a project from what its unreleased changes contain.

use std::{cmp::Ordering, fmt::Display, str::FromStr};

use miette::Diagnostic;
use serde::Serialize;
use tracing::debug;

/// The label under which an unreleased section lists breaking changes.
pub const BREAKING_CHANGES: &str = "breaking changes";
/// The label under which an unreleased section lists new features.
pub const NEW_FEATURES: &str = "new features";

/// A `MAJOR.MINOR.PATCH` version. Pre-release and build metadata are not supported.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The version of a project's first release.
    pub const INITIAL: Self = Self::new(1, 0, 0);

    /// Apply `bump` to this version.
    ///
    /// ## Errors
    /// If `bump` is [`Bump::Initial`] (there is nothing to bump from) or a component would overflow.
    pub fn bump(self, bump: Bump) -> Result<Self, Error> {
        let overflow = || Error::Overflow {
            version: self,
            bump,
        };
        match bump {
            Bump::Initial => Err(Error::InvalidState {
                previous: Some(self),
                bump,
            }),
            Bump::Breaking => Ok(Self::new(
                self.major.checked_add(1).ok_or_else(overflow)?,
                0,
                0,
            )),
            Bump::Feature => Ok(Self::new(
                self.major,
                self.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            )),
            Bump::Bugfix => Ok(Self::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            )),
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.patch.cmp(&other.patch))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{major}.{minor}.{patch}",
            major = self.major,
            minor = self.minor,
            patch = self.patch
        )
    }
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [major, minor, patch]: [u64; 3] = s
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|err| ParseError(format!("`{part}` in `{s}`: {err}")))
            })
            .collect::<Result<Vec<_>, _>>()?
            .try_into()
            .map_err(|_| ParseError(format!("`{s}` must have exactly 3 parts")))?;
        Ok(Self::new(major, minor, patch))
    }
}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What kind of release the unreleased changes amount to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bump {
    /// There is no previous release, this one will be `1.0.0`.
    Initial,
    Breaking,
    Feature,
    Bugfix,
}

impl Display for Bump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Initial => "initial",
            Self::Breaking => "breaking",
            Self::Feature => "feature",
            Self::Bugfix => "bugfix",
        })
    }
}

/// Decide what kind of release a set of unreleased `labels` calls for.
///
/// The first release of a project is always [`Bump::Initial`], no matter what it contains.
/// Labels are compared exactly, so `Breaking Changes` is not [`BREAKING_CHANGES`].
pub fn classify<'a>(labels: impl IntoIterator<Item = &'a str>, has_prior_version: bool) -> Bump {
    if !has_prior_version {
        return Bump::Initial;
    }
    let mut bump = Bump::Bugfix;
    for label in labels {
        match label {
            BREAKING_CHANGES => {
                bump = Bump::Breaking;
                break;
            }
            NEW_FEATURES => bump = Bump::Feature,
            _ => {}
        }
    }
    debug!("Unreleased changes call for a {bump} release");
    bump
}

/// Compute the version which follows `previous` for a release of kind `bump`.
///
/// ## Errors
/// 1. `bump` is [`Bump::Initial`] but there is a `previous` version, or `bump` needs a `previous`
///    version and there isn't one. [`classify`] never produces either combination.
/// 2. A version component would overflow.
pub fn next_version(previous: Option<Version>, bump: Bump) -> Result<Version, Error> {
    match (previous, bump) {
        (None, Bump::Initial) => Ok(Version::INITIAL),
        (Some(previous), Bump::Breaking | Bump::Feature | Bump::Bugfix) => previous.bump(bump),
        (previous, bump) => Err(Error::InvalidState { previous, bump }),
    }
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum Error {
    #[error("Cannot make a {bump} release {}", describe_previous(.previous.as_ref()))]
    #[diagnostic(
        code(semver::invalid_state),
        help(
            "This is a bug in yankee: only a project's first release is an initial release, \
            and every other release needs a previous version to start from."
        )
    )]
    InvalidState {
        previous: Option<Version>,
        bump: Bump,
    },
    #[error("Cannot make a {bump} release after {version}, the version number is too large")]
    #[diagnostic(
        code(semver::overflow),
        help("Version components must fit in an unsigned 64-bit integer.")
    )]
    Overflow { version: Version, bump: Bump },
}

fn describe_previous(previous: Option<&Version>) -> String {
    previous.map_or_else(
        || "without a previous version".to_string(),
        |version| format!("after {version}"),
    )
}

#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("Found invalid version {0}")]
#[diagnostic(
    code(semver::parse),
    help("Versions must look like MAJOR.MINOR.PATCH, for example 1.2.3")
)]
pub struct ParseError(String);
