use core::fmt;
use std::str::FromStr;

use serde::de::DeserializeSeed;

use super::{
    de::NodeSeed,
    node::Node,
    value::{Value, ValueMut, ValueRef},
};
use crate::Error;

/// The owning root of a JSON value tree.
///
/// All nodes of the tree live in a single arena owned by the document.
/// Values borrowed from it ([`ValueRef`], [`ValueMut`]) cannot outlive it.
#[derive(Clone, Default, PartialEq)]
pub struct Document {
    tree: Value,
}

impl Document {
    /// An empty document whose root is `null`.
    #[must_use]
    pub fn new() -> Document {
        Document::default()
    }

    /// An empty document with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Document {
        Document {
            tree: Value::from_node_with_capacity(Node::Null, capacity.max(1)),
        }
    }

    /// Replace the content of the document with `text`.
    ///
    /// On failure the root is `null`, but nodes built before the error was
    /// detected remain allocated.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not exactly one well-formed JSON value,
    /// or if its containers are nested deeper than 127 levels.
    pub fn parse(&mut self, text: &str) -> Result<(), Error> {
        let arena = &mut self.tree.arena;
        arena.clear();
        let mut deserializer = serde_json::Deserializer::from_str(text);
        let parsed = NodeSeed::new(&mut *arena)
            .deserialize(&mut deserializer)
            .and_then(|root| deserializer.end().map(|()| root));
        match parsed {
            Ok(root) => {
                self.tree.root = root;
                Ok(())
            }
            Err(error) => {
                self.tree.root = arena.alloc(Node::Null);
                Err(Error::parse(error))
            }
        }
    }

    /// Compact JSON text of the whole document.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.root().to_string()
    }

    #[must_use]
    pub fn root(&self) -> ValueRef<'_> {
        self.tree.view()
    }

    pub fn root_mut(&mut self) -> ValueMut<'_> {
        self.tree.view_mut()
    }

    /// Replace the whole tree, dropping every node the document held.
    pub fn set_root(&mut self, value: impl Into<Value>) {
        self.tree = value.into();
    }

    /// Deep copy of the root as a standalone value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.root().to_value()
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.tree
    }

    /// Drop every node that is no longer reachable from the root.
    ///
    /// Replacing or removing entries leaves the old subtrees allocated, so a
    /// document edited in a loop should be compacted from time to time.
    pub fn compact(&mut self) {
        self.tree = self.tree.clone();
    }

    /// Number of allocated nodes, including unreachable ones.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }
}

impl From<Value> for Document {
    fn from(tree: Value) -> Self {
        Document { tree }
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut document = Document::new();
        document.parse(text)?;
        Ok(document)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root(), f)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.node_count())
            .field("root", &self.root())
            .finish()
    }
}
