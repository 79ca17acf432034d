//! Format adapters and the runtime format registry.
//!
//! An adapter converts raw file bytes to a [`Tree`] and back. Adapters are
//! selected by a runtime name ("json", "yaml", "ini", "toml") through
//! [`resolve`], or by file extension through [`resolve_path`]. The built-in
//! adapters register themselves with [`submit_format!`](crate::submit_format);
//! downstream crates can register more the same way.

use std::collections::BTreeMap;
use std::path::Path;

use ini::Ini;
use serde_value::{DeserializerError, SerializerError, Value};

use crate::error::Error;
use crate::tree::Tree;

/// Converts between raw file bytes and the canonical [`Tree`].
///
/// For every tree `t` producible by an adapter's own `decode`,
/// `decode(encode(t))` must equal `t`.
pub trait Format: Send + Sync + std::fmt::Debug {
    /// Registry name, e.g. `"json"`.
    fn name(&self) -> &'static str;

    /// File extensions handled by this adapter, lowercase, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Parses raw bytes into a tree. Malformed input fails with the
    /// format's parse error; a top-level value that is not a mapping is
    /// rejected as well.
    fn decode(&self, bytes: &[u8]) -> Result<Tree, Error>;

    /// Serializes a tree back to text for display or re-import.
    fn encode(&self, tree: &Tree) -> Result<Vec<u8>, Error>;
}

fn mapping_root(tree: Tree, format: &str) -> Result<Tree, Error> {
    match tree {
        Tree::Mapping(_) => Ok(tree),
        Tree::Scalar(_) => Err(Error::Deserialization(DeserializerError::Custom(format!(
            "top-level {format} value must be a mapping"
        )))),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, Error> {
    std::str::from_utf8(bytes).map_err(|err| {
        Error::Deserialization(DeserializerError::Custom(format!("invalid UTF-8: {err}")))
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Tree, Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        mapping_root(Tree::from_value(value)?, self.name())
    }

    fn encode(&self, tree: &Tree) -> Result<Vec<u8>, Error> {
        let mut out = serde_json::to_vec_pretty(tree)?;
        out.push(b'\n');
        Ok(out)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct YamlFormat;

impl Format for YamlFormat {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Tree, Error> {
        // an empty document is the empty configuration, not a parse error
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Tree::mapping());
        }
        let value: Value = serde_yaml::from_slice(bytes)?;
        mapping_root(Tree::from_value(value)?, self.name())
    }

    fn encode(&self, tree: &Tree) -> Result<Vec<u8>, Error> {
        Ok(serde_yaml::to_string(tree)?.into_bytes())
    }
}

/// INI has a fixed two-level shape: sections become first-level mapping
/// keys, each section's `key=value` pairs the second level. Properties
/// outside any section land at the top level. Trees deeper than two levels
/// cannot be encoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct IniFormat;

impl Format for IniFormat {
    fn name(&self) -> &'static str {
        "ini"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ini"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Tree, Error> {
        let ini = Ini::load_from_str(utf8(bytes)?)?;
        let mut root = BTreeMap::new();
        for (section, properties) in ini.iter() {
            match section {
                Some(name) => {
                    let mut entries = BTreeMap::new();
                    for (key, value) in properties.iter() {
                        entries.insert(key.to_string(), Tree::scalar(value));
                    }
                    root.insert(name.to_string(), Tree::Mapping(entries));
                }
                None => {
                    for (key, value) in properties.iter() {
                        root.insert(key.to_string(), Tree::scalar(value));
                    }
                }
            }
        }
        Ok(Tree::Mapping(root))
    }

    fn encode(&self, tree: &Tree) -> Result<Vec<u8>, Error> {
        let Tree::Mapping(root) = tree else {
            return Err(Error::Serialization(SerializerError::Custom(
                "top-level INI value must be a mapping".to_string(),
            )));
        };

        let mut ini = Ini::new();
        // general section first so top-level properties precede any [section]
        for (key, child) in root {
            if let Tree::Scalar(value) = child {
                ini.with_section(None::<String>).set(key, value);
            }
        }
        for (key, child) in root {
            let Tree::Mapping(section) = child else {
                continue;
            };
            let properties = ini.entry(Some(key.clone())).or_insert(ini::Properties::new());
            for (property, leaf) in section {
                let Tree::Scalar(value) = leaf else {
                    return Err(too_deep(&format!("'{key}/{property}'")));
                };
                properties.insert(property, value);
            }
        }

        let mut out = Vec::new();
        ini.write_to(&mut out)?;
        Ok(out)
    }
}

fn too_deep(at: &str) -> Error {
    Error::Serialization(SerializerError::Custom(format!(
        "INI cannot encode nesting deeper than two levels (mapping at {at})"
    )))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TomlFormat;

impl Format for TomlFormat {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["toml"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Tree, Error> {
        let value: Value = toml::from_str(utf8(bytes)?)?;
        mapping_root(Tree::from_value(value)?, self.name())
    }

    fn encode(&self, tree: &Tree) -> Result<Vec<u8>, Error> {
        Ok(toml::to_string_pretty(tree)?.into_bytes())
    }
}

/// A format adapter registration collected at link time.
pub struct RegisteredFormat {
    pub name: &'static str,
    pub adapter: fn() -> Box<dyn Format>,
}

impl RegisteredFormat {
    pub const fn new<F: Format + Default + 'static>(name: &'static str) -> Self {
        Self {
            name,
            adapter: || Box::new(F::default()),
        }
    }
}

inventory::collect!(RegisteredFormat);

/// Registers a [`Format`] implementation under a runtime name.
#[macro_export]
macro_rules! submit_format {
    ($name:literal, $adapter:ty) => {
        ::inventory::submit! {
            $crate::format::RegisteredFormat::new::<$adapter>($name)
        }
    };
}

submit_format!("json", JsonFormat);
submit_format!("yaml", YamlFormat);
submit_format!("ini", IniFormat);
submit_format!("toml", TomlFormat);

/// Looks up an adapter by registry name.
pub fn resolve(name: &str) -> Result<Box<dyn Format>, Error> {
    for registration in inventory::iter::<RegisteredFormat> {
        if registration.name == name {
            return Ok((registration.adapter)());
        }
    }

    Err(Error::UnsupportedFormat {
        requested: name.to_string(),
        supported: supported_formats(),
    })
}

/// Looks up an adapter by the extension of `path`.
pub fn resolve_path(path: impl AsRef<Path>) -> Result<Box<dyn Format>, Error> {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    for registration in inventory::iter::<RegisteredFormat> {
        let adapter = (registration.adapter)();
        if adapter.extensions().contains(&extension.as_str()) {
            return Ok(adapter);
        }
    }

    Err(Error::UnsupportedFormat {
        requested: extension,
        supported: supported_formats(),
    })
}

/// The registered format names, sorted.
pub fn supported_formats() -> Vec<&'static str> {
    let mut names: Vec<_> = inventory::iter::<RegisteredFormat>
        .into_iter()
        .map(|registration| registration.name)
        .collect();
    names.sort_unstable();
    names
}
