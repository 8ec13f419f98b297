//! Keeps the `version` of npm-style JSON manifests in step with the changelog.

use miette::Diagnostic;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::semver::Version;

/// The manifests to update, in the order they're updated (and committed).
pub const MANIFESTS: [&str; 3] = ["package.json", "package-lock.json", "npm-shrinkwrap.json"];

/// Set the top-level `version` of the JSON object in `content`. Everything else, including the
/// order of properties and the exact text of numbers, is kept. The result is indented by two
/// spaces and ends with a newline.
///
/// ## Errors
/// If `content` is not a JSON object. `file` is only used to explain what went wrong.
pub fn set_version(file: &str, content: &str, new_version: &Version) -> Result<String, Error> {
    let value = serde_json::from_str::<Value>(content).map_err(|source| Error::InvalidJson {
        file: file.to_string(),
        source,
    })?;
    let Value::Object(mut json) = value else {
        return Err(Error::NotAnObject {
            file: file.to_string(),
        });
    };
    json.insert(
        "version".to_string(),
        Value::String(new_version.to_string()),
    );
    let mut pretty = to_string_pretty(&json)?;
    pretty.push('\n');
    Ok(pretty)
}

fn to_string_pretty(json: &Map<String, Value>) -> Result<String, Error> {
    serde_json::to_string_pretty(json).map_err(Error::Serialize)
}

#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    #[error("{file} is not valid JSON: {source}")]
    #[diagnostic(
        code(manifest::invalid_json),
        help("Make sure `{file}` is valid JSON.")
    )]
    InvalidJson {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{file} is not a JSON object")]
    #[diagnostic(
        code(manifest::not_an_object),
        help("Make sure `{file}` is a JSON object, its top-level `version` is set on release.")
    )]
    NotAnObject { file: String },
    #[error("Could not write JSON: {0}")]
    #[diagnostic(code(manifest::serialize))]
    Serialize(#[source] serde_json::Error),
}
