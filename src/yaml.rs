use miette::Diagnostic;
use serde_yaml::Value;
use thiserror::Error;

/// Converts between the text of a structured document and a generic, order-preserving value.
pub trait Codec {
    /// ## Errors
    /// If `text` is not a valid document.
    fn parse(&self, text: &str) -> Result<Value, Error>;

    /// Produce text which [`Codec::parse`] turns back into `value`, keeping the order of mapping keys.
    ///
    /// ## Errors
    /// If `value` can't be represented.
    fn serialize(&self, value: &Value) -> Result<String, Error>;
}

/// YAML, via `serde_yaml`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Yaml;

impl Codec for Yaml {
    fn parse(&self, text: &str) -> Result<Value, Error> {
        serde_yaml::from_str(text).map_err(Error::Parse)
    }

    fn serialize(&self, value: &Value) -> Result<String, Error> {
        serde_yaml::to_string(value).map_err(Error::Serialize)
    }
}

#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    #[error("The changelog is not valid YAML: {0}")]
    #[diagnostic(
        code(yaml::parse),
        help("Fix the YAML syntax error, the location is included in the message.")
    )]
    Parse(#[source] serde_yaml::Error),
    #[error("Could not write the changelog as YAML: {0}")]
    #[diagnostic(
        code(yaml::serialize),
        help("This is probably a bug in yankee, please report it along with your changelog.")
    )]
    Serialize(#[source] serde_yaml::Error),
}
