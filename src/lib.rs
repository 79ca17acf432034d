pub mod client;
pub mod error;
pub mod format;
pub mod path;
pub mod store;
pub mod tree;

pub use client::{KvStore, MemoryStore, StoreError};
pub use error::Error;
pub use format::{Format, RegisteredFormat, resolve, resolve_path, supported_formats};
pub use store::{ConfigStore, DEFAULT_BASEFOLDER};
pub use tree::Tree;
