//! Level containers and the composite-key map for manykeys.
//!
//! This crate provides:
//! - [`LevelMap`] - Capabilities shared by single-key level containers
//! - [`WeakLevel`] / [`StrongLevel`] - The two container kinds
//! - [`ManyKeysWeakMap`] - Map keyed by tuples of keys, one level per position

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod level;
pub mod map;

pub use level::{Level, LevelMap, StrongLevel, WeakLevel};
pub use map::ManyKeysWeakMap;
