use core::fmt;
use std::slice;

use compact_str::CompactString;

use super::node::{Arena, Node, NodeId};
use crate::{Error, JsonType};

/// A standalone JSON value that owns its nodes.
///
/// Cloning is always a deep copy. Inserting a `Value` into a container or
/// a [`Document`](super::Document) relocates its nodes into the arena of the
/// target, so no node is ever shared between two owners.
pub struct Value {
    pub(crate) arena: Arena,
    pub(crate) root: NodeId,
}

impl Value {
    pub(crate) fn from_node(node: Node) -> Value {
        Value::from_node_with_capacity(node, 1)
    }

    pub(crate) fn from_node_with_capacity(node: Node, capacity: usize) -> Value {
        let mut arena = Arena::with_capacity(capacity);
        let root = arena.alloc(node);
        Value { arena, root }
    }

    /// A `null` value.
    #[must_use]
    pub fn null() -> Value {
        Value::from_node(Node::Null)
    }

    /// Deep-copy any value view into a new standalone value.
    ///
    /// ```rust
    /// use claim_json::arena::{Sequence, Value};
    ///
    /// let sequence: Sequence = [1, 2, 3].into_iter().collect();
    /// let copy = Value::clone_from(&sequence);
    /// assert_eq!(copy.to_string(), "[1,2,3]");
    /// ```
    pub fn clone_from<'a>(source: impl Into<ValueRef<'a>>) -> Value {
        source.into().to_value()
    }

    /// Take ownership of `source` without copying its nodes.
    ///
    /// `source` is left empty and stays usable.
    pub fn adopt<T>(source: &mut T) -> Value
    where
        T: Default + Into<Value>,
    {
        std::mem::take(source).into()
    }

    /// Borrow the root of this value.
    #[must_use]
    pub fn view(&self) -> ValueRef<'_> {
        ValueRef::new(&self.arena, self.root)
    }

    /// Mutably borrow the root of this value.
    pub fn view_mut(&mut self) -> ValueMut<'_> {
        ValueMut::new(&mut self.arena, self.root)
    }

    #[must_use]
    pub fn json_type(&self) -> Option<JsonType> {
        self.view().json_type()
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.view().is_null()
    }

    /// Number of nodes held by the underlying arena, including unreachable ones.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        self.view().to_value()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.view() == other.view()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.view(), f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.view(), f)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::from_node(Node::Bool(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::from_node(Node::Integer(i64::from(value)))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::from_node(Node::Integer(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::from_node(Node::Integer(i64::from(value)))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::from_node(Node::from_u64(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::from(f64::from(value))
    }
}

/// Non-finite numbers have no JSON representation and become `null`.
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::from_node(Node::from_f64(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::from_node(Node::String(CompactString::new(value)))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::from_node(Node::String(CompactString::from(value)))
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        value.to_value()
    }
}

/// A read-only back reference to a node inside a value tree.
///
/// Tied to the lifetime of the tree it points into.
#[derive(Clone, Copy)]
pub struct ValueRef<'a> {
    arena: &'a Arena,
    id: NodeId,
}

impl<'a> ValueRef<'a> {
    #[inline]
    pub(crate) fn new(arena: &'a Arena, id: NodeId) -> ValueRef<'a> {
        ValueRef { arena, id }
    }

    #[inline]
    pub(crate) fn node(&self) -> &'a Node {
        self.arena.get(self.id)
    }

    /// The kind of this value, `None` for `null`.
    #[must_use]
    pub fn json_type(&self) -> Option<JsonType> {
        self.node().json_type()
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.node(), Node::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.node() {
            Node::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer payload. Floating-point values are never converted.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self.node() {
            Node::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// The floating-point payload. Integer values are never converted.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self.node() {
            Node::Number(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match self.node() {
            Node::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Number of elements or entries; zero for scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.node() {
            Node::Array(items) => items.len(),
            Node::Object(entries) => entries.len(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Array element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ValueRef<'a>> {
        match self.node() {
            Node::Array(items) => items.get(index).map(|&id| ValueRef::new(self.arena, id)),
            _ => None,
        }
    }

    /// Object entry under `key`. Never inserts.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<ValueRef<'a>> {
        self.arena
            .find(self.id, key)
            .ok()
            .flatten()
            .map(|id| ValueRef::new(self.arena, id))
    }

    /// Array elements in order; empty for every other kind.
    #[must_use]
    pub fn elements(&self) -> Elements<'a> {
        let items = self.arena.elements(self.id).unwrap_or_default();
        Elements {
            arena: self.arena,
            iter: items.iter(),
        }
    }

    /// Object entries in storage order; empty for every other kind.
    #[must_use]
    pub fn entries(&self) -> Entries<'a> {
        let entries = self.arena.entries(self.id).unwrap_or_default();
        Entries {
            arena: self.arena,
            iter: entries.iter(),
        }
    }

    /// Deep-copy the referenced subtree into a new standalone value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut arena = Arena::default();
        let root = arena.import(self.arena, self.id);
        Value { arena, root }
    }
}

impl<'a> From<&'a Value> for ValueRef<'a> {
    fn from(value: &'a Value) -> Self {
        value.view()
    }
}

impl PartialEq for ValueRef<'_> {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self.node(), other.node()) {
            (Node::Null, Node::Null) => true,
            (Node::Bool(left), Node::Bool(right)) => left == right,
            (Node::Integer(left), Node::Integer(right)) => left == right,
            (Node::Number(left), Node::Number(right)) => left == right,
            (Node::String(left), Node::String(right)) => left == right,
            (Node::Array(left), Node::Array(right)) => {
                left.len() == right.len()
                    && self
                        .elements()
                        .zip(other.elements())
                        .all(|(left, right)| left == right)
            }
            (Node::Object(left), Node::Object(right)) => {
                left.len() == right.len()
                    && self.entries().all(|(key, left)| {
                        other.find(key).is_some_and(|right| left == right)
                    })
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// A mutable back reference to a node inside a value tree.
pub struct ValueMut<'a> {
    arena: &'a mut Arena,
    id: NodeId,
}

impl<'a> ValueMut<'a> {
    #[inline]
    pub(crate) fn new(arena: &'a mut Arena, id: NodeId) -> ValueMut<'a> {
        ValueMut { arena, id }
    }

    /// Reborrow as a read-only reference.
    #[must_use]
    pub fn view(&self) -> ValueRef<'_> {
        ValueRef::new(&*self.arena, self.id)
    }

    /// Convert into a read-only reference with the full lifetime.
    #[must_use]
    pub fn into_view(self) -> ValueRef<'a> {
        ValueRef::new(self.arena, self.id)
    }

    /// Replace the referenced node with a copy of `value`.
    pub fn set(&mut self, value: impl Into<Value>) {
        let value = value.into();
        self.arena.replace(self.id, &value.arena, value.root);
    }

    /// Append `value` to the referenced array.
    ///
    /// # Errors
    ///
    /// Returns a coercion error if the node is not an array.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();
        self.arena.push(self.id, &value.arena, value.root)
    }

    /// Mutable array element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<ValueMut<'_>> {
        let id = *self.arena.elements(self.id).ok()?.get(index)?;
        Some(ValueMut::new(self.arena, id))
    }

    /// Mutable object entry under `key`. Never inserts.
    pub fn find_mut(&mut self, key: &str) -> Option<ValueMut<'_>> {
        let id = self.arena.find(self.id, key).ok()??;
        Some(ValueMut::new(self.arena, id))
    }

    /// Object entry under `key`, inserting `null` first when the key is missing.
    ///
    /// # Errors
    ///
    /// Returns a coercion error if the node is not an object.
    pub fn find_or_insert(&mut self, key: &str) -> Result<ValueMut<'_>, Error> {
        let id = self.arena.find_or_insert(self.id, key)?;
        Ok(ValueMut::new(self.arena, id))
    }

    /// Store `value` under `key`. Returns `true` if the key was new.
    ///
    /// # Errors
    ///
    /// Returns a coercion error if the node is not an object.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Result<bool, Error> {
        let value = value.into();
        self.arena.insert(self.id, key, &value.arena, value.root)
    }

    /// Remove the entry under `key` and return it as a standalone value.
    ///
    /// # Errors
    ///
    /// Returns a coercion error if the node is not an object.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, Error> {
        let removed = self.arena.remove(self.id, key)?;
        Ok(removed.map(|id| ValueRef::new(&*self.arena, id).to_value()))
    }
}

impl fmt::Debug for ValueMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.view(), f)
    }
}

/// Iterator over array elements.
#[derive(Clone)]
pub struct Elements<'a> {
    arena: &'a Arena,
    iter: slice::Iter<'a, NodeId>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = ValueRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|&id| ValueRef::new(self.arena, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Elements<'_> {}

/// Iterator over object entries.
#[derive(Clone)]
pub struct Entries<'a> {
    arena: &'a Arena,
    iter: slice::Iter<'a, (CompactString, NodeId)>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, ValueRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter
            .next()
            .map(|(key, id)| (key.as_str(), ValueRef::new(self.arena, *id)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Document;
    use test_case::test_case;

    #[test_case(Value::default(), None; "null")]
    #[test_case(Value::from(true), Some(JsonType::Boolean); "bool")]
    #[test_case(Value::from(-7i32), Some(JsonType::Integer); "i32")]
    #[test_case(Value::from(7u32), Some(JsonType::Integer); "u32")]
    #[test_case(Value::from(1_609_459_200i64), Some(JsonType::Integer); "i64")]
    #[test_case(Value::from(42u64), Some(JsonType::Integer); "u64")]
    #[test_case(Value::from(u64::MAX), Some(JsonType::Number); "u64 above i64 range")]
    #[test_case(Value::from(1.5f32), Some(JsonType::Number); "f32")]
    #[test_case(Value::from(2.5f64), Some(JsonType::Number); "f64")]
    #[test_case(Value::from("str"), Some(JsonType::String); "str")]
    #[test_case(Value::from(String::from("string")), Some(JsonType::String); "string")]
    #[test_case(Value::from(f64::NAN), None; "nan")]
    #[test_case(Value::from(f64::INFINITY), None; "infinity")]
    #[test_case(Value::from(f32::NEG_INFINITY), None; "f32 negative infinity")]
    fn primitive_kinds(value: Value, expected: Option<JsonType>) {
        assert_eq!(value.json_type(), expected);
    }

    #[test]
    fn integer_and_number_do_not_mix() {
        let integer = Value::from(1);
        let number = Value::from(1.0);
        assert_eq!(integer.view().as_integer(), Some(1));
        assert_eq!(integer.view().as_number(), None);
        assert_eq!(number.view().as_number(), Some(1.0));
        assert_eq!(number.view().as_integer(), None);
        assert_ne!(integer, number);
    }

    #[test]
    fn adopt_leaves_source_empty() {
        let mut source = Value::from("moved");
        let adopted = Value::adopt(&mut source);
        assert_eq!(adopted.view().as_str(), Some("moved"));
        assert!(source.is_null());
        // The source is still a fully usable value
        source = Value::from(3);
        assert_eq!(source.view().as_integer(), Some(3));
    }

    #[test]
    fn clone_compacts_garbage() {
        let document: Document = "{\"a\":[1,2,3]}".parse().expect("Valid JSON");
        let mut value = document.into_value();
        value
            .view_mut()
            .find_mut("a")
            .expect("Key exists")
            .set(false);
        assert_eq!(value.node_count(), 5);
        let copy = value.clone();
        assert_eq!(copy.node_count(), 2);
        assert_eq!(copy, value);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut value = Value::from(1);
        value.view_mut().set("text");
        assert_eq!(value.view().as_str(), Some("text"));
        assert_eq!(value.node_count(), 1);
    }

    #[test]
    fn push_on_scalar_is_a_coercion_error() {
        let mut value = Value::from(1);
        let error = value.view_mut().push(2).expect_err("Not an array");
        assert!(error.is_bad_coercion());
    }

    #[test]
    fn object_equality_ignores_order() {
        let left: Document = r#"{"a":1,"b":[true]}"#.parse().expect("Valid JSON");
        let right: Document = r#"{"b":[true],"a":1}"#.parse().expect("Valid JSON");
        assert_eq!(left.root(), right.root());
    }

    #[test]
    fn display_is_compact_json() {
        assert_eq!(Value::from("a\"b").to_string(), r#""a\"b""#);
        assert_eq!(Value::null().to_string(), "null");
        assert_eq!(Value::from(2.5f32).to_string(), "2.5");
        assert_eq!(format!("{:?}", Value::from(2.0)), "2.0");
    }
}
