//! Keyed item table
//!
//! The concrete container the `ItemTable` template instantiates to: an
//! ordered map from an identifier key to an optional item. A slot holding no
//! item models a key whose payload was absent on the wire. Unless the
//! instantiation carries the ZeroKeys flag, the zero key is invalid.

use std::collections::BTreeMap;

/// Ordered keyed table of items.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTable<K, V> {
    entries: BTreeMap<K, Option<V>>,
    zero_keys_allowed: bool,
}

impl<K: Ord + Default, V> Default for ItemTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Default, V> ItemTable<K, V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            zero_keys_allowed: false,
        }
    }

    /// A table whose zero key is a valid sentinel.
    pub fn with_zero_keys() -> Self {
        Self {
            entries: BTreeMap::new(),
            zero_keys_allowed: true,
        }
    }

    pub fn zero_keys_allowed(&self) -> bool {
        self.zero_keys_allowed
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<Option<V>> {
        self.entries.insert(key, Some(value))
    }

    /// Insert a key with no payload.
    pub fn insert_empty(&mut self, key: K) -> Option<Option<V>> {
        self.entries.insert(key, None)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).and_then(|slot| slot.as_ref())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, Option<&V>)> {
        self.entries.iter().map(|(k, v)| (k, v.as_ref()))
    }

    /// Validate the table against its key policy: the zero (default) key is
    /// rejected unless the instantiation allows it.
    pub fn validate(&self) -> bool {
        self.zero_keys_allowed || !self.entries.contains_key(&K::default())
    }
}
