//! The composite-key map.
//!
//! A [`ManyKeysWeakMap`] is a tree of level containers. Walking a key tuple
//! descends one level per element; the node reached after the last element
//! holds the stored value in its own slot, so a value never shares a
//! keyspace with the next level down.

use std::fmt;

use manykeys_foundation::{Error, ErrorContext, Key, LevelConfig, LevelKind, Result};

use crate::level::{Level, LevelMap};

/// One node of the level tree: an optional value plus the next level.
struct Node<V> {
    value: Option<V>,
    children: Level<Node<V>>,
}

impl<V> Node<V> {
    fn new(kind: LevelKind) -> Self {
        Self {
            value: None,
            children: Level::new(kind),
        }
    }

    /// Sweeps dead weak entries in this subtree.
    fn purge(&mut self) -> usize {
        let mut removed = self.children.purge();
        for child in self.children.values_mut() {
            removed += child.purge();
        }
        removed
    }
}

/// Map keyed by tuples of [`Key`] elements.
///
/// Each key position is backed by a weak or strong level, as given by the
/// [`LevelConfig`] fixed at construction (weak by default). At weak
/// positions keys must be objects, and an entry disappears as soon as its
/// key object is dropped. At strong positions any key is accepted and
/// entries stay until deleted.
///
/// The map cannot be enumerated. Emptied intermediate levels are not
/// pruned by [`delete`](Self::delete); they go away with their key object
/// (weak levels) or stay until an ancestor is removed.
///
/// # Reference cycles
///
/// Weak levels are built on reference counting, not on a tracing
/// collector, so an entry that itself owns a strong handle to its key
/// object keeps that key alive and is never collected. This happens when
/// the stored value holds the key object, or when a strong level further
/// down the same path is keyed by that object (for example `[a, a]` under
/// a `[Weak, Strong]` layout). Such entries stay until they are deleted.
///
/// ```
/// use manykeys_foundation::{Key, Object};
/// use manykeys_storage::ManyKeysWeakMap;
///
/// let a = Key::from(Object::new("a"));
/// let b = Key::from(Object::new("b"));
///
/// let mut map = ManyKeysWeakMap::new();
/// map.set(&[a.clone(), b.clone()], 1)?.set(&[b.clone(), a.clone()], 2)?;
///
/// assert_eq!(map.get(&[a.clone(), b.clone()]), Some(&1));
/// assert_eq!(map.get(&[b, a]), Some(&2));
/// # Ok::<(), manykeys_foundation::Error>(())
/// ```
pub struct ManyKeysWeakMap<V> {
    root: Node<V>,
    levels: LevelConfig,
}

impl<V> ManyKeysWeakMap<V> {
    /// Descriptive tag identifying this container type.
    pub const TYPE_TAG: &'static str = "ManyKeysWeakMap";

    /// Creates an empty map with every level weak.
    #[must_use]
    pub fn new() -> Self {
        Self::with_levels(LevelConfig::default())
    }

    /// Creates an empty map with the given level layout.
    #[must_use]
    pub fn with_levels(levels: LevelConfig) -> Self {
        Self {
            root: Node::new(levels.kind_at(0)),
            levels,
        }
    }

    /// Creates a map and inserts every pair in order.
    ///
    /// Later pairs overwrite earlier pairs with the same key tuple. The
    /// source is always run to completion: after a failing pair the rest
    /// is drained without being inserted.
    ///
    /// # Errors
    ///
    /// Returns the first pair's [`set`](Self::set) error, with context
    /// naming that pair's index.
    pub fn from_pairs<I, K>(pairs: I, levels: LevelConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<[Key]>,
    {
        let mut map = Self::with_levels(levels);
        let mut pairs = pairs.into_iter().enumerate();
        while let Some((index, (keys, value))) = pairs.next() {
            if let Err(err) = map.set(keys.as_ref(), value) {
                let skipped = pairs.count();
                tracing::debug!(index, skipped, error = %err, "construction stopped at invalid pair");
                return Err(err.with_context(
                    ErrorContext::new()
                        .with_operation("construct")
                        .with_index(index),
                ));
            }
        }
        Ok(map)
    }

    /// Returns the level layout.
    #[must_use]
    pub fn levels(&self) -> &LevelConfig {
        &self.levels
    }

    /// Stores `value` under `keys`, replacing any previous value.
    ///
    /// Missing levels along the path are created. An empty tuple addresses
    /// the root's own slot. Returns the map for chaining.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidKey`](manykeys_foundation::ErrorKind::InvalidKey)
    /// if a primitive key falls on a weak position. Every element is checked
    /// before anything is created, so a rejected call leaves the map unchanged.
    /// [`ErrorKind::Internal`](manykeys_foundation::ErrorKind::Internal) means
    /// a level refused a key that had already been checked.
    pub fn set(&mut self, keys: &[Key], value: V) -> Result<&mut Self> {
        self.check_keys(keys)?;
        self.node_or_create(keys)?.value = Some(value);
        Ok(self)
    }

    /// Returns the value stored under `keys`.
    #[must_use]
    pub fn get(&self, keys: &[Key]) -> Option<&V> {
        self.node(keys).and_then(|node| node.value.as_ref())
    }

    /// Returns the value stored under `keys` mutably.
    #[must_use]
    pub fn get_mut(&mut self, keys: &[Key]) -> Option<&mut V> {
        self.node_mut(keys).and_then(|node| node.value.as_mut())
    }

    /// Returns true if a value is stored under `keys`.
    #[must_use]
    pub fn has(&self, keys: &[Key]) -> bool {
        self.node(keys).is_some_and(|node| node.value.is_some())
    }

    /// Removes the value stored under `keys`, returning whether one existed.
    pub fn delete(&mut self, keys: &[Key]) -> bool {
        self.node_mut(keys)
            .and_then(|node| node.value.take())
            .is_some()
    }

    /// Sweeps entries of dropped key objects out of every weak level.
    ///
    /// Dead entries are already invisible to lookups and are swept as weak
    /// levels grow; this reclaims them, and the values they own, right away.
    /// Returns the number of level entries removed.
    pub fn purge(&mut self) -> usize {
        self.root.purge()
    }

    fn check_keys(&self, keys: &[Key]) -> Result<()> {
        for (position, key) in keys.iter().enumerate() {
            let level = self.levels.kind_at(position);
            if !level.accepts(key) {
                return Err(Error::invalid_key(position, key.key_type(), level));
            }
        }
        Ok(())
    }

    fn node(&self, keys: &[Key]) -> Option<&Node<V>> {
        keys.iter()
            .try_fold(&self.root, |node, key| node.children.get(key))
    }

    fn node_mut(&mut self, keys: &[Key]) -> Option<&mut Node<V>> {
        keys.iter()
            .try_fold(&mut self.root, |node, key| node.children.get_mut(key))
    }

    fn node_or_create(&mut self, keys: &[Key]) -> Result<&mut Node<V>> {
        let levels = &self.levels;
        let mut node = &mut self.root;
        for (depth, key) in keys.iter().enumerate() {
            let node_kind = levels.kind_at(depth);
            let child_kind = levels.kind_at(depth + 1);
            node = node
                .children
                .get_or_insert_with(key, || {
                    tracing::trace!(depth = depth + 1, kind = %child_kind, "creating level");
                    Node::new(child_kind)
                })
                .ok_or_else(|| {
                    Error::internal(format!(
                        "{} level at depth {depth} rejected a checked {} key",
                        node_kind,
                        key.key_type()
                    ))
                })?;
        }
        Ok(node)
    }
}

impl<V> Default for ManyKeysWeakMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for ManyKeysWeakMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(Self::TYPE_TAG)
            .field("levels", &self.levels)
            .finish_non_exhaustive()
    }
}
