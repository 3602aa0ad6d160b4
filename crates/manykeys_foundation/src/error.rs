//! Error types for manykeys.
//!
//! Uses `thiserror` for ergonomic error definition with context.

use std::fmt;

use thiserror::Error;

use crate::key::KeyType;
use crate::level::LevelKind;

/// Result alias used throughout manykeys.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for manykeys operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid key error.
    #[must_use]
    pub fn invalid_key(position: usize, key_type: KeyType, level: LevelKind) -> Self {
        Self::new(ErrorKind::InvalidKey {
            position,
            key_type,
            level,
        })
    }

    /// Creates an unknown level kind error.
    #[must_use]
    pub fn unknown_level_kind(tag: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownLevelKind { tag: tag.into() })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this is an invalid key error.
    #[must_use]
    pub const fn is_invalid_key(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidKey { .. })
    }

    /// Returns true if this is a level configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self.kind, ErrorKind::UnknownLevelKind { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A key element cannot be stored at the level for its position.
    #[error("invalid key at position {position}: {key_type} cannot key a {level} level")]
    InvalidKey {
        /// Position of the element within the key tuple.
        position: usize,
        /// Type of the rejected element.
        key_type: KeyType,
        /// Kind of the level at that position.
        level: LevelKind,
    },

    /// A level configuration tag is not a recognized kind.
    #[error("unknown level kind: {tag:?} (expected weak or strong)")]
    UnknownLevelKind {
        /// The unrecognized tag.
        tag: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation that failed.
    pub operation: Option<&'static str>,
    /// Index of the offending item within a bulk input.
    pub index: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation.
    #[must_use]
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Sets the index of the offending item.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = self.operation {
            write!(f, "in {operation}")?;
        }
        if let Some(index) = self.index {
            if self.operation.is_some() {
                write!(f, " ")?;
            }
            write!(f, "at index {index}")?;
        }
        Ok(())
    }
}
