use thiserror::Error;

use crate::client::StoreError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    /// An argument was rejected before any I/O took place, e.g. an empty
    /// label or an empty file path. Always recoverable by fixing the call.
    #[error("validation: {0}")]
    Validation(String),

    /// The requested format name or file extension has no registered
    /// adapter. Carries the requested value and the registered set.
    #[error("'{requested}' format is not supported (supported: {})", .supported.join(", "))]
    UnsupportedFormat {
        requested: String,
        supported: Vec<&'static str>,
    },

    #[error("Serialization: {0}")]
    Serialization(#[from] serde_value::SerializerError),

    #[error("Deserialization: {0}")]
    Deserialization(#[from] serde_value::DeserializerError),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML Serialization: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    #[error("TOML Deserialization: {0}")]
    TomlDeserialization(#[from] toml::de::Error),

    #[error("INI: {0}")]
    Ini(#[from] ini::ParseError),

    /// Stored flat entries cannot be reassembled into a consistent tree:
    /// a key is used both as a value and as a folder. This means a prior
    /// push was interrupted, or another writer used an incompatible layout.
    #[error("corrupted configuration: {0}")]
    Corruption(String),

    #[error("store read failed: {0}")]
    StoreRead(#[source] StoreError),

    #[error("store write failed: {0}")]
    StoreWrite(#[source] StoreError),
}
