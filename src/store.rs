//! Pushing and pulling configuration trees against a key-value store.
//!
//! This module provides the [`ConfigStore`] type, which is the main entry
//! point of the crate. A store owns a [`KvStore`] client, a format adapter
//! and a basefolder, and orchestrates the two data flows:
//!
//! - **push**: file bytes → decode → tree → flatten → one `set` per leaf
//! - **pull / dump**: `get` below the label → unflatten → tree → (dump
//!   only) re-encoded bytes
//!
//! # Example
//!
//! ```rust,no_run
//! use kv_config::{ConfigStore, MemoryStore};
//!
//! fn main() -> Result<(), kv_config::Error> {
//!     // Select the adapter by a runtime name; "/config" is the default
//!     // basefolder.
//!     let mut store = ConfigStore::new(MemoryStore::new(), "yaml")?;
//!
//!     // Every leaf of cluster.yaml becomes one key below
//!     // /config/cluster/...
//!     store.push("cluster", "cluster.yaml")?;
//!
//!     // Read it back as a tree, or re-serialized for display.
//!     let tree = store.pull("cluster")?;
//!     println!("{tree:#?}");
//!     let text = store.dump("cluster")?;
//!     println!("{}", String::from_utf8_lossy(&text));
//!     Ok(())
//! }
//! ```

use std::path::Path;

use tracing::{debug, info};

use crate::client::KvStore;
use crate::error::Error;
use crate::format::{self, Format};
use crate::path;
use crate::tree::Tree;

/// Basefolder used by [`ConfigStore::new`].
pub const DEFAULT_BASEFOLDER: &str = "/config";

/// Synchronizes configuration files with a hierarchical key-value store.
///
/// A store is immutable after construction and typically serves many
/// [`push`](ConfigStore::push) and [`pull`](ConfigStore::pull) calls for
/// different labels. All calls run to completion before returning; writes
/// inside a push are strictly sequential, so a partial failure is diagnosed
/// by the first error rather than by unwinding concurrent writes.
///
/// Keys are laid out as `<basefolder>/<label>/<segment>/.../<leaf>`, with
/// every segment taken verbatim from the tree keys.
pub struct ConfigStore<C> {
    client: C,
    format: Box<dyn Format>,
    basefolder: String,
}

impl<C: KvStore> ConfigStore<C> {
    /// Creates a store for the given format name with the default
    /// basefolder `"/config"`.
    ///
    /// Fails with [`Error::UnsupportedFormat`] when no adapter is
    /// registered under `format`.
    pub fn new(client: C, format: &str) -> Result<Self, Error> {
        Self::with_basefolder(client, format, DEFAULT_BASEFOLDER)
    }

    /// Creates a store that keeps every label below `basefolder`.
    pub fn with_basefolder(
        client: C,
        format: &str,
        basefolder: impl Into<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            client,
            format: format::resolve(format)?,
            basefolder: basefolder.into(),
        })
    }

    pub fn basefolder(&self) -> &str {
        &self.basefolder
    }

    pub fn format_name(&self) -> &'static str {
        self.format.name()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Consumes the store and hands the client back.
    pub fn into_client(self) -> C {
        self.client
    }

    /// Reads `file`, decodes it and writes one key per leaf below
    /// `<basefolder>/<label>`.
    ///
    /// The label and the file path must be non-empty; both are rejected
    /// with [`Error::Validation`] before any I/O. Writes happen
    /// sequentially in flatten order and the first decode or store error
    /// aborts the remaining ones. There is no multi-key transaction: keys
    /// already written stay in the store, and keys from an earlier push of
    /// a different shape under the same label are not deleted.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use kv_config::{ConfigStore, MemoryStore};
    ///
    /// # fn main() -> Result<(), kv_config::Error> {
    /// let mut store = ConfigStore::new(MemoryStore::new(), "json")?;
    /// store.push("config0", "people.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn push(&mut self, label: &str, file: impl AsRef<Path>) -> Result<(), Error> {
        let file = file.as_ref();
        if label.is_empty() {
            return Err(Error::Validation("label can't be empty".to_string()));
        }
        if file.as_os_str().is_empty() {
            return Err(Error::Validation(
                "configuration file path can't be empty".to_string(),
            ));
        }

        info!(label, file = %file.display(), "pushing configuration");

        let bytes = std::fs::read(file)?;
        let tree = self.format.decode(&bytes)?;

        let base = self.label_path(label);
        for entry in path::flatten(&tree, &base) {
            debug!(key = %entry.key, "setting key");
            self.client
                .set(&entry.key, &entry.value)
                .map_err(Error::StoreWrite)?;
        }

        info!(label, "configuration pushed");
        Ok(())
    }

    /// Fetches everything stored below `<basefolder>/<label>` and
    /// reassembles it into a [`Tree`].
    ///
    /// A label with no stored entries yields the empty configuration, not
    /// an error: "not yet configured" and "configured empty" are
    /// indistinguishable.
    ///
    /// # Example
    ///
    /// ```
    /// use kv_config::{ConfigStore, KvStore, MemoryStore};
    ///
    /// let mut client = MemoryStore::new();
    /// client.set("/config/app/server/port", "8080")?;
    /// let store = ConfigStore::new(client, "json")?;
    ///
    /// let tree = store.pull("app")?;
    /// let server = tree.as_mapping().unwrap()["server"].as_mapping().unwrap();
    /// assert_eq!(server["port"].as_scalar(), Some("8080"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn pull(&self, label: &str) -> Result<Tree, Error> {
        if label.is_empty() {
            return Err(Error::Validation("label can't be empty".to_string()));
        }

        info!(label, "fetching configuration");

        let base = self.label_path(label);
        let entries = self.client.get(&base, true).map_err(Error::StoreRead)?;
        if entries.is_empty() {
            return Ok(Tree::mapping());
        }

        for (key, _) in &entries {
            debug!(key = %key, "reading key");
        }
        let tree = path::unflatten(entries, &base)?;

        info!(label, "configuration fetched");
        Ok(tree)
    }

    /// Pulls `label` and re-serializes it with the store's format adapter,
    /// for callers that want text rather than a tree.
    pub fn dump(&self, label: &str) -> Result<Vec<u8>, Error> {
        let tree = self.pull(label)?;
        self.format.encode(&tree)
    }

    fn label_path(&self, label: &str) -> String {
        format!("{}/{}", self.basefolder, label)
    }
}
