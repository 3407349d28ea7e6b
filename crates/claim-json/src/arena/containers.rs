use core::fmt;

use compact_str::CompactString;

use super::{
    node::{Node, NodeId},
    value::{Elements, Entries, Value, ValueMut, ValueRef},
};
use crate::{Error, JsonType};

/// An owned JSON array.
#[derive(Clone, PartialEq)]
pub struct Sequence {
    inner: Value,
}

impl Sequence {
    #[must_use]
    pub fn new() -> Sequence {
        Sequence::with_capacity(0)
    }

    /// Create an empty array with room for `capacity` scalar elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Sequence {
        Sequence {
            inner: Value::from_node_with_capacity(
                Node::Array(Vec::with_capacity(capacity)),
                capacity + 1,
            ),
        }
    }

    /// Convert every item of `range` into a [`Value`] and append it in order.
    ///
    /// ```rust
    /// use claim_json::arena::Sequence;
    ///
    /// let timestamps = vec![100i64, 20, 10];
    /// let sequence = Sequence::from_range(timestamps.iter().copied());
    /// assert_eq!(sequence.len(), 3);
    /// assert_eq!(sequence.to_string(), "[100,20,10]");
    /// ```
    pub fn from_range<I>(range: I) -> Sequence
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        range.into_iter().collect()
    }

    fn items(&self) -> &[NodeId] {
        match self.inner.arena.get(self.inner.root) {
            Node::Array(items) => items,
            _ => unreachable!("Sequence root is always an array"),
        }
    }

    /// Append a copy of `value`.
    pub fn push(&mut self, value: impl Into<Value>) {
        let value = value.into();
        let item = self.inner.arena.import(&value.arena, value.root);
        match self.inner.arena.get_mut(self.inner.root) {
            Node::Array(items) => items.push(item),
            _ => unreachable!("Sequence root is always an array"),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Element at `index`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ValueRef<'_>> {
        self.view().get(index)
    }

    /// Element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn at(&self, index: usize) -> ValueRef<'_> {
        let id = self.items()[index];
        ValueRef::new(&self.inner.arena, id)
    }

    /// Mutable element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn at_mut(&mut self, index: usize) -> ValueMut<'_> {
        let id = self.items()[index];
        ValueMut::new(&mut self.inner.arena, id)
    }

    #[must_use]
    pub fn iter(&self) -> Elements<'_> {
        self.view().elements()
    }

    #[must_use]
    pub fn view(&self) -> ValueRef<'_> {
        self.inner.view()
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Sequence::new()
    }
}

impl<T: Into<Value>> FromIterator<T> for Sequence {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut sequence = Sequence::with_capacity(iter.size_hint().0);
        sequence.extend(iter);
        sequence
    }
}

impl<T: Into<Value>> Extend<T> for Sequence {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl IntoIterator for Sequence {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    /// Split the array into standalone element values.
    fn into_iter(self) -> Self::IntoIter {
        self.iter().map(|item| item.to_value()).collect::<Vec<_>>().into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = ValueRef<'a>;
    type IntoIter = Elements<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Sequence> for Value {
    fn from(sequence: Sequence) -> Self {
        sequence.inner
    }
}

impl<'a> From<&'a Sequence> for ValueRef<'a> {
    fn from(sequence: &'a Sequence) -> Self {
        sequence.view()
    }
}

impl TryFrom<Value> for Sequence {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value.json_type() {
            Some(JsonType::Array) => Ok(Sequence { inner: value }),
            other => Err(Error::bad_coercion(JsonType::Array, other)),
        }
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.view(), f)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.view(), f)
    }
}

/// An owned JSON object with unique keys kept in insertion order.
#[derive(Clone, PartialEq)]
pub struct Mapping {
    inner: Value,
}

impl Mapping {
    #[must_use]
    pub fn new() -> Mapping {
        Mapping {
            inner: Value::from_node(Node::Object(Vec::new())),
        }
    }

    fn root_mut(&mut self) -> ValueMut<'_> {
        self.inner.view_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.view().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Entry under `key`. Never inserts.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<ValueRef<'_>> {
        self.view().find(key)
    }

    /// Mutable entry under `key`. Never inserts.
    pub fn find_mut(&mut self, key: &str) -> Option<ValueMut<'_>> {
        let id = self.inner.arena.find(self.inner.root, key).ok()??;
        Some(ValueMut::new(&mut self.inner.arena, id))
    }

    /// Entry under `key`, inserting `null` first when the key is missing.
    ///
    /// Reading through this method mutates the mapping; use [`Mapping::find`]
    /// for a pure lookup.
    pub fn find_or_insert(&mut self, key: &str) -> ValueMut<'_> {
        let root = self.inner.root;
        match self.inner.arena.find_or_insert(root, key) {
            Ok(id) => ValueMut::new(&mut self.inner.arena, id),
            Err(_) => unreachable!("Mapping root is always an object"),
        }
    }

    /// Store a copy of `value` under `key`. Returns `true` if the key was new.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> bool {
        match self.root_mut().insert(key, value) {
            Ok(inserted) => inserted,
            Err(_) => unreachable!("Mapping root is always an object"),
        }
    }

    /// Remove the entry under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        match self.root_mut().remove(key) {
            Ok(removed) => removed,
            Err(_) => unreachable!("Mapping root is always an object"),
        }
    }

    #[must_use]
    pub fn iter(&self) -> Entries<'_> {
        self.view().entries()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(key, _)| key)
    }

    #[must_use]
    pub fn view(&self) -> ValueRef<'_> {
        self.inner.view()
    }
}

impl Default for Mapping {
    fn default() -> Self {
        Mapping::new()
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        mapping.extend(iter);
        mapping
    }
}

impl<K: AsRef<str>, V: Into<Value>> Extend<(K, V)> for Mapping {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}

impl IntoIterator for Mapping {
    type Item = (CompactString, Value);
    type IntoIter = std::vec::IntoIter<(CompactString, Value)>;

    /// Split the object into standalone entry values.
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
            .map(|(key, value)| (CompactString::new(key), value.to_value()))
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a str, ValueRef<'a>);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self {
        mapping.inner
    }
}

impl<'a> From<&'a Mapping> for ValueRef<'a> {
    fn from(mapping: &'a Mapping) -> Self {
        mapping.view()
    }
}

impl TryFrom<Value> for Mapping {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value.json_type() {
            Some(JsonType::Object) => Ok(Mapping { inner: value }),
            other => Err(Error::bad_coercion(JsonType::Object, other)),
        }
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.view(), f)
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.view(), f)
    }
}
