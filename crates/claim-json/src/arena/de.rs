use core::fmt;

use compact_str::CompactString;
use serde::{
    de::{DeserializeSeed, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer,
};

use super::{
    node::{Arena, Node, NodeId},
    value::Value,
};

/// Builds nodes straight into an arena while the input is tokenized.
pub(crate) struct NodeSeed<'a> {
    arena: &'a mut Arena,
}

impl<'a> NodeSeed<'a> {
    pub(crate) fn new(arena: &'a mut Arena) -> NodeSeed<'a> {
        NodeSeed { arena }
    }
}

impl<'de> DeserializeSeed<'de> for NodeSeed<'_> {
    type Value = NodeId;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for NodeSeed<'_> {
    type Value = NodeId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any valid JSON value")
    }

    fn visit_bool<E>(self, value: bool) -> Result<NodeId, E> {
        Ok(self.arena.alloc(Node::Bool(value)))
    }

    fn visit_i64<E>(self, value: i64) -> Result<NodeId, E> {
        Ok(self.arena.alloc(Node::Integer(value)))
    }

    fn visit_u64<E>(self, value: u64) -> Result<NodeId, E> {
        Ok(self.arena.alloc(Node::from_u64(value)))
    }

    fn visit_f64<E>(self, value: f64) -> Result<NodeId, E> {
        Ok(self.arena.alloc(Node::from_f64(value)))
    }

    fn visit_str<E>(self, value: &str) -> Result<NodeId, E> {
        Ok(self.arena.alloc(Node::String(CompactString::new(value))))
    }

    fn visit_string<E>(self, value: String) -> Result<NodeId, E> {
        Ok(self.arena.alloc(Node::String(CompactString::from(value))))
    }

    fn visit_unit<E>(self) -> Result<NodeId, E> {
        Ok(self.arena.alloc(Node::Null))
    }

    fn visit_none<E>(self) -> Result<NodeId, E> {
        Ok(self.arena.alloc(Node::Null))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<NodeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        self.deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<NodeId, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let arena = self.arena;
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element_seed(NodeSeed::new(&mut *arena))? {
            items.push(item);
        }
        Ok(arena.alloc(Node::Array(items)))
    }

    fn visit_map<A>(self, mut map: A) -> Result<NodeId, A::Error>
    where
        A: MapAccess<'de>,
    {
        let arena = self.arena;
        let mut entries: Vec<(CompactString, NodeId)> =
            Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key_seed(KeySeed)? {
            let item = map.next_value_seed(NodeSeed::new(&mut *arena))?;
            // Last duplicate wins, first position is kept
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = item,
                None => entries.push((key, item)),
            }
        }
        Ok(arena.alloc(Node::Object(entries)))
    }
}

struct KeySeed;

impl<'de> DeserializeSeed<'de> for KeySeed {
    type Value = CompactString;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

impl Visitor<'_> for KeySeed {
    type Value = CompactString;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object key")
    }

    fn visit_str<E>(self, value: &str) -> Result<CompactString, E> {
        Ok(CompactString::new(value))
    }

    fn visit_string<E>(self, value: String) -> Result<CompactString, E> {
        Ok(CompactString::from(value))
    }

    fn visit_bytes<E>(self, value: &[u8]) -> Result<CompactString, E>
    where
        E: serde::de::Error,
    {
        std::str::from_utf8(value)
            .map(CompactString::new)
            .map_err(|_| E::custom("object key is not valid UTF-8"))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut arena = Arena::default();
        let root = NodeSeed::new(&mut arena).deserialize(deserializer)?;
        Ok(Value { arena, root })
    }
}
