//! manykeys - Composite-key weak maps
//!
//! This crate re-exports all layers of manykeys for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: manykeys_storage    — Level containers, ManyKeysWeakMap
//! Layer 0: manykeys_foundation — Core types (Key, Object, LevelConfig, Error)
//! ```

pub use manykeys_foundation as foundation;
pub use manykeys_storage as storage;

pub use manykeys_foundation::{Error, ErrorKind, Key, LevelConfig, LevelKind, Object, Result};
pub use manykeys_storage::ManyKeysWeakMap;
