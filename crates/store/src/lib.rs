//! Configuration storage: applications own environments, environments own
//! key/value items.
//!
//! The substitution path only needs [`ConfigLookup`]; the management
//! operations live on [`ConfigStore`].

pub mod catalog;
pub mod error;
pub mod file;
pub mod lookup;
pub mod memory;

pub use {
    catalog::{Catalog, ConfigItem, KEY_MAX_LEN},
    error::StoreError,
    file::FileConfigStore,
    lookup::{ConfigLookup, ConfigStore, Scope},
    memory::MemoryConfigStore,
};
