//! Error type shared by the inference engine and the settings loader.
//!
//! Type conflicts between samples are never errors: they degrade to
//! [`TypeKind::Anything`](crate::ir::TypeKind::Anything). Only a structurally
//! unusable input aborts a run.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Generation needs at least one example document.
    #[error("no example documents were supplied")]
    NoExamples,

    /// A top-level example was not a JSON object.
    #[error("example #{index} is {found}, expected a JSON object")]
    NotAnObject { index: usize, found: &'static str },

    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file did not deserialize; `path` is the JSON path of the bad node.
    #[error("invalid settings at JSON path {path}: {message}")]
    Settings { path: String, message: String },
}

/// Short human name of a value's JSON kind, for error messages.
pub(crate) fn json_kind_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
