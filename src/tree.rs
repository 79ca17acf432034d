//! The canonical configuration tree.
//!
//! Every format decodes into a [`Tree`]: string leaves under nested,
//! string-keyed mappings. Leaves are always strings; numbers and booleans
//! found in a source file are coerced on the way in, so a round trip
//! through the store loses the original type.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_value::{DeserializerError, Value};

use crate::error::Error;

/// A configuration value: a scalar string, or a mapping of further trees.
///
/// Mappings are ordered maps, so traversal order is deterministic. A key
/// must keep one shape: giving it a scalar in one place and a mapping in
/// another across pushes is a caller error this crate does not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    Scalar(String),
    Mapping(BTreeMap<String, Tree>),
}

impl Tree {
    /// The empty configuration.
    pub fn mapping() -> Self {
        Tree::Mapping(BTreeMap::new())
    }

    pub fn scalar(value: impl Into<String>) -> Self {
        Tree::Scalar(value.into())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Tree::Scalar(value) => Some(value),
            Tree::Mapping(_) => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Tree>> {
        match self {
            Tree::Scalar(_) => None,
            Tree::Mapping(map) => Some(map),
        }
    }

    /// True for a mapping with no entries.
    pub fn is_empty(&self) -> bool {
        matches!(self, Tree::Mapping(map) if map.is_empty())
    }

    /// Converts a decoded [`serde_value::Value`] into a tree, coercing
    /// scalar leaves to strings. Sequences, byte strings and nulls have no
    /// place in the path layout and are rejected.
    pub(crate) fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Map(map) => {
                let mut children = BTreeMap::new();
                for (key, child) in map {
                    let key = coerce_scalar(&key).ok_or_else(|| {
                        shape_error(format!("mapping key {key:?} is not a scalar"))
                    })?;
                    children.insert(key, Tree::from_value(child)?);
                }
                Ok(Tree::Mapping(children))
            }
            Value::Option(Some(inner)) | Value::Newtype(inner) => Tree::from_value(*inner),
            Value::Option(None) | Value::Unit => {
                Err(shape_error("null is not a configuration value".to_string()))
            }
            Value::Seq(_) => Err(shape_error(
                "sequences cannot be represented as configuration paths".to_string(),
            )),
            Value::Bytes(_) => Err(shape_error(
                "byte strings cannot be represented as configuration values".to_string(),
            )),
            other => {
                let value = coerce_scalar(&other).ok_or_else(|| {
                    shape_error(format!("{other:?} is not a configuration value"))
                })?;
                Ok(Tree::Scalar(value))
            }
        }
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tree::Scalar(value) => serializer.serialize_str(value),
            Tree::Mapping(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, child) in map {
                    state.serialize_entry(key, child)?;
                }
                state.end()
            }
        }
    }
}

fn shape_error(message: String) -> Error {
    Error::Deserialization(DeserializerError::Custom(message))
}

/// Canonical string form of a scalar value, or `None` for non-scalars.
fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Char(c) => Some(c.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::U8(n) => Some(n.to_string()),
        Value::U16(n) => Some(n.to_string()),
        Value::U32(n) => Some(n.to_string()),
        Value::U64(n) => Some(n.to_string()),
        Value::I8(n) => Some(n.to_string()),
        Value::I16(n) => Some(n.to_string()),
        Value::I32(n) => Some(n.to_string()),
        Value::I64(n) => Some(n.to_string()),
        Value::F32(n) => Some(n.to_string()),
        Value::F64(n) => Some(n.to_string()),
        _ => None,
    }
}
