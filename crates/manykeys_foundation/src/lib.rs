//! Key elements, level configuration, and errors for manykeys.
//!
//! This crate provides:
//! - [`Key`] - One element of a composite key tuple
//! - [`Object`] / [`WeakObject`] - Identity-compared object handles
//! - [`LevelKind`] / [`LevelConfig`] - Per-position weak/strong layout
//! - [`Error`] - Error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod key;
pub mod level;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use key::{Key, KeyType, Object, ObjectId, WeakObject};
pub use level::{LevelConfig, LevelKind};
