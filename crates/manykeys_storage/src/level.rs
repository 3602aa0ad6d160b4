//! Single-key level containers.
//!
//! Each level of a composite-key map is one of these containers, mapping a
//! single key element to the next node down. [`StrongLevel`] keeps entries
//! until they are removed. [`WeakLevel`] holds its keys weakly: an entry
//! whose key object has been dropped is invisible to every lookup at once,
//! and is physically reclaimed (along with everything it owns) the next
//! time the level sweeps.

use std::collections::HashMap;
use std::fmt;

use manykeys_foundation::{Key, LevelKind, ObjectId, WeakObject};

/// Sweep mark for a fresh or freshly swept weak level.
const MIN_SWEEP_AT: usize = 8;

/// Capabilities shared by every level container.
pub trait LevelMap<T> {
    /// Returns the kind of this container.
    fn kind(&self) -> LevelKind;

    /// Looks up the entry for `key`.
    fn get(&self, key: &Key) -> Option<&T>;

    /// Looks up the entry for `key` mutably.
    fn get_mut(&mut self, key: &Key) -> Option<&mut T>;

    /// Returns true if an entry exists for `key`.
    fn contains(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// Returns the entry for `key`, inserting `make()` if there is none.
    ///
    /// Returns `None` without calling `make` if this container cannot hold
    /// `key` at all.
    fn get_or_insert_with<F>(&mut self, key: &Key, make: F) -> Option<&mut T>
    where
        F: FnOnce() -> T;

    /// Removes and returns the entry for `key`.
    fn remove(&mut self, key: &Key) -> Option<T>;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Returns true if there are no live entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops entries whose key is no longer reachable, returning how many.
    fn purge(&mut self) -> usize;

    /// Mutable access to every live entry.
    fn values_mut<'a>(&'a mut self) -> impl Iterator<Item = &'a mut T>
    where
        T: 'a;
}

/// Level container that keeps its entries until they are removed.
pub struct StrongLevel<T> {
    entries: HashMap<Key, T>,
}

impl<T> StrongLevel<T> {
    /// Creates an empty strong level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> Default for StrongLevel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LevelMap<T> for StrongLevel<T> {
    fn kind(&self) -> LevelKind {
        LevelKind::Strong
    }

    fn get(&self, key: &Key) -> Option<&T> {
        self.entries.get(key)
    }

    fn get_mut(&mut self, key: &Key) -> Option<&mut T> {
        self.entries.get_mut(key)
    }

    fn get_or_insert_with<F>(&mut self, key: &Key, make: F) -> Option<&mut T>
    where
        F: FnOnce() -> T,
    {
        Some(self.entries.entry(key.clone()).or_insert_with(make))
    }

    fn remove(&mut self, key: &Key) -> Option<T> {
        self.entries.remove(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn purge(&mut self) -> usize {
        0
    }

    fn values_mut<'a>(&'a mut self) -> impl Iterator<Item = &'a mut T>
    where
        T: 'a,
    {
        self.entries.values_mut()
    }
}

impl<T> fmt::Debug for StrongLevel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrongLevel")
            .field("entries", &self.entries.len())
            .finish()
    }
}

struct WeakEntry<T> {
    key: WeakObject,
    value: T,
}

/// Level container keyed weakly by object identity.
///
/// Only [`Key::Object`] elements can be stored. Entries are indexed by
/// [`ObjectId`]; the stored [`WeakObject`] both detects when the key dies
/// and keeps its id from being reused by another object.
pub struct WeakLevel<T> {
    entries: HashMap<ObjectId, WeakEntry<T>>,
    /// Table size at which the next insert sweeps dead entries first.
    sweep_at: usize,
}

impl<T> WeakLevel<T> {
    /// Creates an empty weak level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            sweep_at: MIN_SWEEP_AT,
        }
    }

    fn live_entry(&self, key: &Key) -> Option<&WeakEntry<T>> {
        let obj = key.as_object()?;
        self.entries
            .get(&obj.id())
            .filter(|entry| entry.key.is_alive())
    }

    fn live_entry_mut(&mut self, key: &Key) -> Option<&mut WeakEntry<T>> {
        let obj = key.as_object()?;
        self.entries
            .get_mut(&obj.id())
            .filter(|entry| entry.key.is_alive())
    }
}

impl<T> Default for WeakLevel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LevelMap<T> for WeakLevel<T> {
    fn kind(&self) -> LevelKind {
        LevelKind::Weak
    }

    fn get(&self, key: &Key) -> Option<&T> {
        self.live_entry(key).map(|entry| &entry.value)
    }

    fn get_mut(&mut self, key: &Key) -> Option<&mut T> {
        self.live_entry_mut(key).map(|entry| &mut entry.value)
    }

    fn get_or_insert_with<F>(&mut self, key: &Key, make: F) -> Option<&mut T>
    where
        F: FnOnce() -> T,
    {
        let obj = key.as_object()?;
        let id = obj.id();
        if self.entries.len() >= self.sweep_at && !self.entries.contains_key(&id) {
            self.purge();
        }
        let entry = self.entries.entry(id).or_insert_with(|| WeakEntry {
            key: obj.downgrade(),
            value: make(),
        });
        Some(&mut entry.value)
    }

    fn remove(&mut self, key: &Key) -> Option<T> {
        let obj = key.as_object()?;
        let entry = self.entries.remove(&obj.id())?;
        entry.key.is_alive().then_some(entry.value)
    }

    fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.key.is_alive())
            .count()
    }

    fn purge(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.key.is_alive());
        let remaining = self.entries.len();
        let removed = before - remaining;
        self.sweep_at = (remaining * 2).max(MIN_SWEEP_AT);
        if removed > 0 {
            tracing::trace!(removed, remaining, "swept dead weak entries");
        }
        removed
    }

    fn values_mut<'a>(&'a mut self) -> impl Iterator<Item = &'a mut T>
    where
        T: 'a,
    {
        self.entries
            .values_mut()
            .filter(|entry| entry.key.is_alive())
            .map(|entry| &mut entry.value)
    }
}

impl<T> fmt::Debug for WeakLevel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakLevel")
            .field("entries", &self.entries.len())
            .field("sweep_at", &self.sweep_at)
            .finish()
    }
}

/// A level container of either kind.
#[derive(Debug)]
pub enum Level<T> {
    /// Weakly keyed container.
    Weak(WeakLevel<T>),
    /// Strongly keyed container.
    Strong(StrongLevel<T>),
}

impl<T> Level<T> {
    /// Creates an empty container of the given kind.
    #[must_use]
    pub fn new(kind: LevelKind) -> Self {
        match kind {
            LevelKind::Weak => Self::Weak(WeakLevel::new()),
            LevelKind::Strong => Self::Strong(StrongLevel::new()),
        }
    }
}

impl<T> LevelMap<T> for Level<T> {
    fn kind(&self) -> LevelKind {
        match self {
            Self::Weak(level) => level.kind(),
            Self::Strong(level) => level.kind(),
        }
    }

    fn get(&self, key: &Key) -> Option<&T> {
        match self {
            Self::Weak(level) => level.get(key),
            Self::Strong(level) => level.get(key),
        }
    }

    fn get_mut(&mut self, key: &Key) -> Option<&mut T> {
        match self {
            Self::Weak(level) => level.get_mut(key),
            Self::Strong(level) => level.get_mut(key),
        }
    }

    fn get_or_insert_with<F>(&mut self, key: &Key, make: F) -> Option<&mut T>
    where
        F: FnOnce() -> T,
    {
        match self {
            Self::Weak(level) => level.get_or_insert_with(key, make),
            Self::Strong(level) => level.get_or_insert_with(key, make),
        }
    }

    fn remove(&mut self, key: &Key) -> Option<T> {
        match self {
            Self::Weak(level) => level.remove(key),
            Self::Strong(level) => level.remove(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Weak(level) => level.len(),
            Self::Strong(level) => level.len(),
        }
    }

    fn purge(&mut self) -> usize {
        match self {
            Self::Weak(level) => level.purge(),
            Self::Strong(level) => level.purge(),
        }
    }

    fn values_mut<'a>(&'a mut self) -> impl Iterator<Item = &'a mut T>
    where
        T: 'a,
    {
        let (weak, strong) = match self {
            Self::Weak(level) => (Some(level.values_mut()), None),
            Self::Strong(level) => (None, Some(level.values_mut())),
        };
        weak.into_iter().flatten().chain(strong.into_iter().flatten())
    }
}
