//! Ordered case-insensitive containers.
//!
//! Every keyed collection in a bibliography (fields, person roles, entries,
//! citation sets) is looked up case-insensitively but iterated in insertion
//! order with the casing the data supplied. The containers here keep an
//! insertion-ordered arena of display keys plus a fold-key index into it,
//! so lookups never depend on casing and iteration never depends on hashing.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The folding rule shared by all containers in this module.
#[must_use]
pub fn fold_key(key: &str) -> String {
    key.to_lowercase()
}

/// An insertion-ordered map with case-insensitive keys.
///
/// Inserting under a fold-equivalent key updates the value and the displayed
/// casing in place, keeping the original position:
///
/// ```
/// use bib_resolver::utils::caseless::CaseFoldMap;
///
/// let mut map = CaseFoldMap::new();
/// map.insert("Uno", 1);
/// map.insert("Dos", 2);
/// map.insert("UNO", 10);
/// assert_eq!(map.get("uno"), Some(&10));
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["UNO", "Dos"]);
/// ```
#[derive(Debug, Clone)]
pub struct CaseFoldMap<V> {
    /// (display key, value) pairs in insertion order.
    entries: Vec<(String, V)>,
    /// Fold key -> position in `entries`.
    index: HashMap<String, usize>,
}

impl<V> Default for CaseFoldMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CaseFoldMap<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&fold_key(key))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        let position = *self.index.get(&fold_key(key))?;
        Some(&self.entries[position].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let position = *self.index.get(&fold_key(key))?;
        Some(&mut self.entries[position].1)
    }

    /// Insert or update a value.
    ///
    /// A new fold-key appends; an existing fold-key keeps its position but takes
    /// the new display casing and value. Returns the replaced value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let folded = fold_key(&key);
        match self.index.get(&folded) {
            Some(&position) => {
                let slot = &mut self.entries[position];
                slot.0 = key;
                Some(std::mem::replace(&mut slot.1, value))
            }
            None => {
                self.index.insert(folded, self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove a key, collapsing iteration order over the gap.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let position = self.index.remove(&fold_key(key))?;
        let (_, value) = self.entries.remove(position);
        for index in self.index.values_mut() {
            if *index > position {
                *index -= 1;
            }
        }
        Some(value)
    }

    /// Display keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// (display key, value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<V: Clone> CaseFoldMap<V> {
    /// A copy of this map with every display key lowercased. Values are
    /// untouched; callers fold nested values themselves where needed.
    #[must_use]
    pub fn lower(&self) -> Self {
        self.iter()
            .map(|(key, value)| (fold_key(key), value.clone()))
            .collect()
    }
}

/// Equality over fold-keys and values, in order. Display casing is ignored.
impl<V: PartialEq> PartialEq for CaseFoldMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|((key_a, value_a), (key_b, value_b))| {
                    fold_key(key_a) == fold_key(key_b) && value_a == value_b
                })
    }
}

impl<V: Eq> Eq for CaseFoldMap<V> {}

impl<K: Into<String>, V> FromIterator<(K, V)> for CaseFoldMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for CaseFoldMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            state.serialize_entry(key, value)?;
        }
        state.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CaseFoldMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor<V>(std::marker::PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for MapVisitor<V> {
            type Value = CaseFoldMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = CaseFoldMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor(std::marker::PhantomData))
    }
}

/// A [`CaseFoldMap`] whose reads fall back to `V::default()` without inserting.
///
/// Missing-key reads must not pollute iteration order, which matters when the
/// map is used as a reference counter that is later walked in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFoldDefaultMap<V> {
    inner: CaseFoldMap<V>,
}

impl<V: Default> CaseFoldDefaultMap<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: CaseFoldMap::new(),
        }
    }

    /// The stored value, or `V::default()` for a missing key. Never inserts.
    #[must_use]
    pub fn get(&self, key: &str) -> V
    where
        V: Clone,
    {
        self.inner.get(key).cloned().unwrap_or_default()
    }

    /// A mutable slot for `key`, inserted as `V::default()` when missing.
    /// The first insertion's casing is the one iteration shows.
    pub fn get_mut(&mut self, key: &str) -> &mut V {
        let folded = fold_key(key);
        let position = match self.inner.index.get(&folded) {
            Some(&position) => position,
            None => {
                self.inner.index.insert(folded, self.inner.entries.len());
                self.inner.entries.push((key.to_string(), V::default()));
                self.inner.entries.len() - 1
            }
        };
        &mut self.inner.entries[position].1
    }

    /// (display key, value) pairs in first-write order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.inner.iter()
    }
}

/// An insertion-ordered set with case-insensitive membership.
#[derive(Debug, Clone, Default)]
pub struct CaseFoldSet {
    /// Display keys in insertion order.
    keys: Vec<String>,
    /// Fold key -> position in `keys`.
    index: HashMap<String, usize>,
}

impl CaseFoldSet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            index: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(&fold_key(key))
    }

    /// Add a key. Re-adding a fold-equivalent key keeps the display form of the
    /// first insertion. Returns whether the key was newly added.
    pub fn add(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        let folded = fold_key(&key);
        if self.index.contains_key(&folded) {
            return false;
        }
        self.index.insert(folded, self.keys.len());
        self.keys.push(key);
        true
    }

    /// Remove a key if present.
    pub fn discard(&mut self, key: &str) {
        if let Some(position) = self.index.remove(&fold_key(key)) {
            self.keys.remove(position);
            for index in self.index.values_mut() {
                if *index > position {
                    *index -= 1;
                }
            }
        }
    }

    /// The display form under which a fold-equivalent key was first added.
    #[must_use]
    pub fn canonical_key(&self, key: &str) -> Option<&str> {
        let position = *self.index.get(&fold_key(key))?;
        Some(self.keys[position].as_str())
    }

    /// Display keys in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// A copy with every display key lowercased.
    #[must_use]
    pub fn lower(&self) -> Self {
        self.iter().map(fold_key).collect()
    }
}

/// Set equality is over fold-keys only, insensitive to insertion order.
impl PartialEq for CaseFoldSet {
    fn eq(&self, other: &Self) -> bool {
        self.index.len() == other.index.len()
            && self.index.keys().all(|key| other.index.contains_key(key))
    }
}

impl Eq for CaseFoldSet {}

impl<K: Into<String>> FromIterator<K> for CaseFoldSet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.add(key);
        }
        set
    }
}

impl Serialize for CaseFoldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_seq(Some(self.len()))?;
        for key in self.iter() {
            state.serialize_element(key)?;
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for CaseFoldSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = CaseFoldSet;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of strings")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut set = CaseFoldSet::new();
                while let Some(key) = access.next_element::<String>()? {
                    set.add(key);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(SetVisitor)
    }
}
