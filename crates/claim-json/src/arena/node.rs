use compact_str::CompactString;

use crate::{Error, JsonType};

/// Position of a node inside an [`Arena`].
///
/// Only meaningful for the arena that produced it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(CompactString),
    Array(Vec<NodeId>),
    Object(Vec<(CompactString, NodeId)>),
}

impl Node {
    #[inline]
    pub(crate) fn json_type(&self) -> Option<JsonType> {
        match self {
            Node::Null => None,
            Node::Bool(_) => Some(JsonType::Boolean),
            Node::Integer(_) => Some(JsonType::Integer),
            Node::Number(_) => Some(JsonType::Number),
            Node::String(_) => Some(JsonType::String),
            Node::Array(_) => Some(JsonType::Array),
            Node::Object(_) => Some(JsonType::Object),
        }
    }

    /// Numbers without a JSON representation (NaN, infinities) become `null`.
    pub(crate) fn from_f64(value: f64) -> Node {
        if value.is_finite() {
            Node::Number(value)
        } else {
            Node::Null
        }
    }

    /// Values above `i64::MAX` have no integer representation and become numbers.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn from_u64(value: u64) -> Node {
        match i64::try_from(value) {
            Ok(value) => Node::Integer(value),
            Err(_) => Node::Number(value as f64),
        }
    }
}

/// Growable node storage owned by a single value tree.
///
/// Nodes are never freed individually: a replaced subtree stays allocated
/// until the arena is dropped or cleared.
#[derive(Debug, Clone, Default)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub(crate) fn with_capacity(capacity: usize) -> Arena {
        Arena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Store a node and return its id.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` nodes.
    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        let id = u32::try_from(self.nodes.len()).expect("Arena node limit exceeded");
        self.nodes.push(node);
        NodeId(id)
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Deep-copy the subtree rooted at `id` in `source` and return the new root node.
    ///
    /// Children are allocated in `self`; the returned node itself is not.
    pub(crate) fn copy_node(&mut self, source: &Arena, id: NodeId) -> Node {
        match source.get(id) {
            Node::Array(items) => Node::Array(
                items
                    .iter()
                    .map(|&item| self.import(source, item))
                    .collect(),
            ),
            Node::Object(entries) => Node::Object(
                entries
                    .iter()
                    .map(|(key, item)| (key.clone(), self.import(source, *item)))
                    .collect(),
            ),
            scalar => scalar.clone(),
        }
    }

    /// Relocate the subtree rooted at `id` in `source` into `self`.
    pub(crate) fn import(&mut self, source: &Arena, id: NodeId) -> NodeId {
        let node = self.copy_node(source, id);
        self.alloc(node)
    }

    /// Overwrite the node at `target` with a copy of `source[id]`.
    pub(crate) fn replace(&mut self, target: NodeId, source: &Arena, id: NodeId) {
        let node = self.copy_node(source, id);
        *self.get_mut(target) = node;
    }

    pub(crate) fn elements(&self, id: NodeId) -> Result<&[NodeId], Error> {
        match self.get(id) {
            Node::Array(items) => Ok(items),
            other => Err(Error::bad_coercion(JsonType::Array, other.json_type())),
        }
    }

    pub(crate) fn entries(&self, id: NodeId) -> Result<&[(CompactString, NodeId)], Error> {
        match self.get(id) {
            Node::Object(entries) => Ok(entries),
            other => Err(Error::bad_coercion(JsonType::Object, other.json_type())),
        }
    }

    fn entries_mut(&mut self, id: NodeId) -> Result<&mut Vec<(CompactString, NodeId)>, Error> {
        match self.get_mut(id) {
            Node::Object(entries) => Ok(entries),
            other => Err(Error::bad_coercion(JsonType::Object, other.json_type())),
        }
    }

    /// Append a copy of `source[id]` to the array at `target`.
    pub(crate) fn push(&mut self, target: NodeId, source: &Arena, id: NodeId) -> Result<(), Error> {
        // Check the kind first so a failed push leaves no orphaned nodes behind.
        self.elements(target)?;
        let item = self.import(source, id);
        match self.get_mut(target) {
            Node::Array(items) => items.push(item),
            _ => unreachable!("Kind checked above"),
        }
        Ok(())
    }

    /// Linear lookup of `key` in the object at `id`.
    pub(crate) fn find(&self, id: NodeId, key: &str) -> Result<Option<NodeId>, Error> {
        Ok(self
            .entries(id)?
            .iter()
            .find_map(|(existing, item)| (existing == key).then_some(*item)))
    }

    /// Return the entry under `key`, inserting `null` under that key first if it is missing.
    pub(crate) fn find_or_insert(&mut self, id: NodeId, key: &str) -> Result<NodeId, Error> {
        if let Some(item) = self.find(id, key)? {
            return Ok(item);
        }
        let item = self.alloc(Node::Null);
        self.entries_mut(id)?.push((CompactString::new(key), item));
        Ok(item)
    }

    /// Store a copy of `source[value]` under `key`.
    ///
    /// Returns `true` if the key was not present before.
    pub(crate) fn insert(
        &mut self,
        id: NodeId,
        key: &str,
        source: &Arena,
        value: NodeId,
    ) -> Result<bool, Error> {
        if let Some(existing) = self.find(id, key)? {
            self.replace(existing, source, value);
            return Ok(false);
        }
        let item = self.import(source, value);
        self.entries_mut(id)?.push((CompactString::new(key), item));
        Ok(true)
    }

    /// Unlink the entry under `key`, preserving the order of the remaining entries.
    pub(crate) fn remove(&mut self, id: NodeId, key: &str) -> Result<Option<NodeId>, Error> {
        let entries = self.entries_mut(id)?;
        Ok(entries
            .iter()
            .position(|(existing, _)| existing == key)
            .map(|position| entries.remove(position).1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sample() -> (Arena, NodeId) {
        let mut arena = Arena::default();
        let one = arena.alloc(Node::Integer(1));
        let list = arena.alloc(Node::Array(vec![one]));
        let root = arena.alloc(Node::Object(vec![("api-x".into(), list)]));
        (arena, root)
    }

    #[test_case(0, Node::Integer(0); "zero")]
    #[test_case(i64::MAX as u64, Node::Integer(i64::MAX); "largest integer")]
    #[test_case(u64::MAX, Node::Number(1.844_674_407_370_955_2e19); "overflow")]
    fn from_u64(value: u64, expected: Node) {
        match (Node::from_u64(value), expected) {
            (Node::Integer(left), Node::Integer(right)) => assert_eq!(left, right),
            (Node::Number(left), Node::Number(right)) => assert_eq!(left.to_bits(), right.to_bits()),
            (left, right) => panic!("{left:?} != {right:?}"),
        }
    }

    #[test]
    fn import_copies_reachable_nodes_only() {
        let (mut source, root) = sample();
        // Garbage that is not reachable from `root`
        source.alloc(Node::String("unused".into()));

        let mut target = Arena::default();
        let copied = target.import(&source, root);
        assert_eq!(target.len(), 3);
        let list = target
            .find(copied, "api-x")
            .expect("Object")
            .expect("Key exists");
        assert_eq!(target.elements(list).expect("Array").len(), 1);
    }

    #[test]
    fn find_or_insert_upserts_null() {
        let (mut arena, root) = sample();
        assert_eq!(arena.find(root, "missing").expect("Object"), None);
        let item = arena.find_or_insert(root, "missing").expect("Object");
        assert!(matches!(arena.get(item), Node::Null));
        assert_eq!(arena.entries(root).expect("Object").len(), 2);
        // Second lookup hits the same entry
        assert_eq!(arena.find_or_insert(root, "missing").expect("Object"), item);
    }

    #[test]
    fn push_to_non_array_allocates_nothing() {
        let (mut arena, root) = sample();
        let before = arena.len();
        let error = arena.push(root, &Arena::default(), NodeId(0));
        assert!(error.is_err());
        assert_eq!(arena.len(), before);
    }

    #[test]
    fn remove_keeps_order() {
        let mut arena = Arena::default();
        let a = arena.alloc(Node::Bool(true));
        let b = arena.alloc(Node::Bool(false));
        let c = arena.alloc(Node::Null);
        let root = arena.alloc(Node::Object(vec![
            ("a".into(), a),
            ("b".into(), b),
            ("c".into(), c),
        ]));
        assert_eq!(arena.remove(root, "b").expect("Object"), Some(b));
        assert_eq!(arena.remove(root, "b").expect("Object"), None);
        let keys: Vec<&str> = arena
            .entries(root)
            .expect("Object")
            .iter()
            .map(|(key, _)| key.as_str())
            .collect();
        assert_eq!(keys, ["a", "c"]);
    }
}
