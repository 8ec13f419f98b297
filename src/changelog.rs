//! The changelog document: a mapping of `unreleased` plus every released version to its notes,
//! most recent first.

use std::{borrow::Cow, fmt::Display};

use indexmap::IndexMap;
use miette::Diagnostic;
use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::debug;

use crate::semver::{self, Version};

/// The label every released version carries its release date under.
pub const DATE: &str = "date";

/// Where the changes which haven't been released yet are collected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Marker {
    Unreleased,
    /// What older changelogs used instead of `unreleased`. Read, but never written.
    Master,
}

impl Marker {
    /// In order of preference.
    const ALL: [Self; 2] = [Self::Unreleased, Self::Master];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unreleased => "unreleased",
            Self::Master => "master",
        }
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The notes of a single release: free-form labels (like `new features`) mapped to content that
/// is carried around without being looked at.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReleaseRecord(Mapping);

impl ReleaseRecord {
    /// The labels which are strings, in document order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().filter_map(Value::as_str)
    }

    /// Turn unreleased notes into the notes of a release made on `date`.
    ///
    /// `date` comes first. If the notes already have a `date`, that one wins.
    #[must_use]
    pub fn dated(self, date: String) -> Self {
        let mut record = Mapping::with_capacity(self.0.len() + 1);
        record.insert(Value::from(DATE), Value::from(date));
        for (label, content) in self.0 {
            record.insert(label, content);
        }
        Self(record)
    }
}

impl From<Mapping> for ReleaseRecord {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

impl From<ReleaseRecord> for Value {
    fn from(record: ReleaseRecord) -> Self {
        Value::Mapping(record.0)
    }
}

/// A validated changelog, keeping the order of its entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Changelog {
    entries: IndexMap<String, ReleaseRecord>,
}

impl Changelog {
    /// The keys of all entries, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Remove the unreleased section, trying `unreleased` before the legacy `master`.
    ///
    /// ## Errors
    /// If there is no unreleased section, or there are two of them.
    pub fn take_unreleased(&mut self) -> Result<(Marker, ReleaseRecord), Error> {
        let mut present = Marker::ALL
            .into_iter()
            .filter(|marker| self.entries.contains_key(marker.as_str()));
        let marker = present.next().ok_or(Error::MissingUnreleasedSection)?;
        if present.next().is_some() {
            return Err(Error::ConflictingUnreleasedSections);
        }
        let record = self
            .entries
            .shift_remove(marker.as_str())
            .ok_or(Error::MissingUnreleasedSection)?;
        debug!("Found unreleased changes under `{marker}`");
        Ok((marker, record))
    }

    /// The most recent release, which is the first entry. Versions are not compared, the
    /// document is trusted to list the newest release first.
    ///
    /// Call this after [`Changelog::take_unreleased`].
    ///
    /// ## Errors
    /// If the first key is not a `MAJOR.MINOR.PATCH` version.
    pub fn previous_version(&self) -> Result<Option<Version>, Error> {
        self.entries
            .keys()
            .next()
            .map(|key| {
                key.parse().map_err(|source| Error::InvalidVersion {
                    key: key.clone(),
                    source,
                })
            })
            .transpose()
    }

    /// Insert a release before every other entry.
    ///
    /// ## Errors
    /// If the changelog already has an entry for `version`.
    pub fn prepend(&mut self, version: Version, record: ReleaseRecord) -> Result<(), Error> {
        let key = version.to_string();
        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateVersion { key });
        }
        let rest = std::mem::take(&mut self.entries);
        self.entries = std::iter::once((key, record)).chain(rest).collect();
        Ok(())
    }
}

impl TryFrom<Value> for Changelog {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Mapping(mapping) = value else {
            return Err(Error::MalformedChangelog);
        };
        let entries = mapping
            .into_iter()
            .map(|(key, record)| {
                let key = match key {
                    Value::String(key) => key,
                    other => return Err(Error::NonStringKey { key: describe(&other) }),
                };
                let record = match record {
                    Value::Mapping(record) => ReleaseRecord(record),
                    Value::Null if Marker::ALL.iter().any(|marker| marker.as_str() == key) => {
                        ReleaseRecord::default()
                    }
                    _ => return Err(Error::MalformedRelease { key }),
                };
                Ok((key, record))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { entries })
    }
}

impl From<Changelog> for Value {
    fn from(changelog: Changelog) -> Self {
        Value::Mapping(
            changelog
                .entries
                .into_iter()
                .map(|(key, record)| (Value::String(key), record.into()))
                .collect(),
        )
    }
}

fn describe(value: &Value) -> String {
    serde_yaml::to_string(value).map_or_else(
        |_| format!("{value:?}"),
        |text| text.trim_end().to_string(),
    )
}

/// Whether `file_name` looks like a changelog: `changelog.yml` or `changelog.yaml`, in any case.
#[must_use]
pub fn is_changelog_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(stem, extension)| {
            stem.eq_ignore_ascii_case("changelog")
                && (extension.eq_ignore_ascii_case("yml") || extension.eq_ignore_ascii_case("yaml"))
        })
}

/// Pick the changelog out of the files in a directory. If there are several, the
/// lexicographically smallest name wins.
pub fn find_changelog<I, S>(file_names: I) -> Option<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    file_names
        .into_iter()
        .filter(|name| is_changelog_file(name.as_ref()))
        .min_by(|a, b| a.as_ref().cmp(b.as_ref()))
}

/// Bring serialized changelog text into house style: dates unquoted and without a time of day,
/// and a blank line between releases.
#[must_use]
pub fn canonicalize(serialized: &str) -> String {
    let mut dates_fixed = String::with_capacity(serialized.len());
    // Indentation of the line which opened the block scalar being skipped, if any.
    let mut block_scalar = None;
    for line in serialized.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        let indent = content.len() - content.trim_start().len();
        if let Some(opened_at) = block_scalar {
            if content.trim().is_empty() || indent > opened_at {
                dates_fixed.push_str(line);
                continue;
            }
            block_scalar = None;
        }
        if opens_block_scalar(content) {
            block_scalar = Some(indent);
        }
        dates_fixed.push_str(&unquote_date(line));
    }
    separate_releases(&dates_fixed)
}

/// Whether `line` ends in a `|` or `>` header, so the lines indented below it are text.
fn opens_block_scalar(line: &str) -> bool {
    let Some((before, header)) = line.trim_end().rsplit_once(' ') else {
        return false;
    };
    let is_header = header.strip_prefix(['|', '>']).is_some_and(|indicators| {
        indicators
            .chars()
            .all(|c| matches!(c, '-' | '+') || c.is_ascii_digit())
    });
    is_header && (before.ends_with(':') || before.trim_start() == "-")
}

fn unquote_date(line: &str) -> Cow<'_, str> {
    let content = line.trim_end_matches(['\n', '\r']);
    let line_ending = &line[content.len()..];
    let value = content.trim_start();
    let indent = &content[..content.len() - value.len()];
    let Some(value) = value.strip_prefix("date:") else {
        return Cow::Borrowed(line);
    };
    let value = value.trim_start();
    let unquoted = ['\'', '"']
        .into_iter()
        .find_map(|quote| {
            value
                .strip_prefix(quote)
                .and_then(|inner| inner.strip_suffix(quote))
        })
        .unwrap_or(value);
    match calendar_date(unquoted) {
        Some(date) if date != value => {
            Cow::Owned(format!("{indent}{DATE}: {date}{line_ending}"))
        }
        _ => Cow::Borrowed(line),
    }
}

/// The `YYYY-MM-DD` part of `value` if it is a date, optionally followed by a time of day.
fn calendar_date(value: &str) -> Option<&str> {
    let date = value.get(..10)?;
    let is_date = date.char_indices().all(|(index, c)| match index {
        4 | 7 => c == '-',
        _ => c.is_ascii_digit(),
    });
    if !is_date {
        return None;
    }
    let time = &value[10..];
    let is_time = time.is_empty()
        || time.strip_prefix(['t', 'T']).is_some_and(|time| {
            !time.is_empty()
                && time
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, ':' | '.' | '+' | '-' | 'z' | 'Z'))
        });
    is_time.then_some(date)
}

/// Put a blank line before every unindented line that directly follows another line.
fn separate_releases(text: &str) -> String {
    let mut separated = String::with_capacity(text.len() + text.len() / 8);
    let mut after_blank = true;
    for line in text.split_inclusive('\n') {
        let starts_entry = !line.starts_with(char::is_whitespace);
        if starts_entry && !after_blank {
            separated.push('\n');
        }
        after_blank = line.trim_end_matches(['\n', '\r']).is_empty();
        separated.push_str(line);
    }
    separated
}

#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    #[error("The changelog is not a YAML object")]
    #[diagnostic(
        code(changelog::malformed),
        help(
            "Make sure `Changelog.yaml` is a YAML object with an `unreleased:` entry followed by \
            one entry per released version, for example `1.2.3:`."
        )
    )]
    MalformedChangelog,
    #[error("The changelog has a top-level key `{key}` which is not a string")]
    #[diagnostic(
        code(changelog::non_string_key),
        help("Top-level keys must be `unreleased` or a version like `1.2.3`.")
    )]
    NonStringKey { key: String },
    #[error("The notes for `{key}` in the changelog are not a YAML object")]
    #[diagnostic(
        code(changelog::malformed_release),
        help(
            "Each entry must map labels like `new features:` or `fixed bugs:` to their content, \
            and released versions must also have a `date:`."
        )
    )]
    MalformedRelease { key: String },
    #[error("The changelog has no unreleased changes")]
    #[diagnostic(
        code(changelog::missing_unreleased),
        help(
            "Make sure you have a top-level `unreleased:` property in your changelog \
            (older changelogs may call it `master:`)."
        )
    )]
    MissingUnreleasedSection,
    #[error("The changelog has both an `unreleased:` and a `master:` section")]
    #[diagnostic(
        code(changelog::conflicting_unreleased),
        help("Merge the two into a single `unreleased:` section.")
    )]
    ConflictingUnreleasedSections,
    #[error("The changelog already has an entry for {key}")]
    #[diagnostic(
        code(changelog::duplicate_version),
        help(
            "Releases must be listed newest first, right after `unreleased:`, \
            so the next version can be worked out from the first one."
        )
    )]
    DuplicateVersion { key: String },
    #[error("The most recent release in the changelog, `{key}`, is not a valid version")]
    #[diagnostic(
        code(changelog::invalid_version),
        help("The entry after `unreleased:` must be the latest version, like `1.2.3:`.")
    )]
    InvalidVersion {
        key: String,
        #[source]
        source: semver::ParseError,
    },
}
