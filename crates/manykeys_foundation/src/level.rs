//! Per-position level kinds.
//!
//! A composite-key map is a chain of single-key containers, one per key
//! position. Each position is either weak (entries vanish once the key
//! object is dropped) or strong (entries stay until removed).

use std::fmt;
use std::iter::FromIterator;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorContext, Result};
use crate::key::Key;

/// Container kind for one key position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LevelKind {
    /// Keys are held weakly and must be objects.
    #[default]
    Weak,
    /// Keys are held strongly and may be any [`Key`].
    Strong,
}

impl LevelKind {
    /// Returns true if `key` may be stored at a level of this kind.
    ///
    /// Weak levels only hold object keys; strong levels hold anything.
    #[must_use]
    pub const fn accepts(self, key: &Key) -> bool {
        match self {
            Self::Weak => key.is_object(),
            Self::Strong => true,
        }
    }

    /// Returns the canonical tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Strong => "strong",
        }
    }
}

impl fmt::Display for LevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelKind {
    type Err = Error;

    /// Parses `weak`/`weakmap` or `strong`/`map`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim();
        if tag.eq_ignore_ascii_case("weak") || tag.eq_ignore_ascii_case("weakmap") {
            Ok(Self::Weak)
        } else if tag.eq_ignore_ascii_case("strong") || tag.eq_ignore_ascii_case("map") {
            Ok(Self::Strong)
        } else {
            Err(Error::unknown_level_kind(s))
        }
    }
}

/// Level kinds for each key position, fixed when a map is built.
///
/// Position 0 is the root container. Positions past the end of the
/// configuration default to [`LevelKind::Weak`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LevelConfig(Vec<LevelKind>);

impl LevelConfig {
    /// Creates a configuration from explicit kinds.
    #[must_use]
    pub fn new(kinds: Vec<LevelKind>) -> Self {
        Self(kinds)
    }

    /// Parses a configuration from textual tags.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownLevelKind`](crate::ErrorKind::UnknownLevelKind)
    /// for the first tag that is neither weak nor strong. The error context
    /// carries that tag's index.
    pub fn parse<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .enumerate()
            .map(|(index, tag)| {
                tag.as_ref().parse::<LevelKind>().map_err(|err| {
                    err.with_context(
                        ErrorContext::new()
                            .with_operation("parse level config")
                            .with_index(index),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// Returns the kind of the container at `depth`.
    #[must_use]
    pub fn kind_at(&self, depth: usize) -> LevelKind {
        self.0.get(depth).copied().unwrap_or_default()
    }

    /// Number of explicitly configured positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no position is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the configured kinds.
    #[must_use]
    pub fn as_slice(&self) -> &[LevelKind] {
        &self.0
    }
}

impl From<Vec<LevelKind>> for LevelConfig {
    fn from(kinds: Vec<LevelKind>) -> Self {
        Self(kinds)
    }
}

impl<const N: usize> From<[LevelKind; N]> for LevelConfig {
    fn from(kinds: [LevelKind; N]) -> Self {
        Self(kinds.to_vec())
    }
}

impl FromIterator<LevelKind> for LevelConfig {
    fn from_iter<I: IntoIterator<Item = LevelKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for LevelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, kind) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{kind}")?;
        }
        write!(f, "]")
    }
}
