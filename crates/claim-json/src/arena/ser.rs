use serde::{Serialize, Serializer};

use super::{
    node::Node,
    value::{Value, ValueRef},
    Document, Mapping, Sequence,
};

impl Serialize for ValueRef<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.node() {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(value) => serializer.serialize_bool(*value),
            Node::Integer(value) => serializer.serialize_i64(*value),
            Node::Number(value) => serializer.serialize_f64(*value),
            Node::String(value) => serializer.serialize_str(value),
            Node::Array(_) => serializer.collect_seq(self.elements()),
            Node::Object(_) => serializer.collect_map(self.entries()),
        }
    }
}

macro_rules! serialize_via_view {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    self.view().serialize(serializer)
                }
            }
        )*
    };
}

serialize_via_view!(Value, Sequence, Mapping);

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.root().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::{Mapping, Sequence, Value};
    use serde_json::json;

    #[test]
    fn serializes_into_serde_json_value() {
        let mut payload = Mapping::new();
        payload.insert("iss", "auth0");
        payload.insert("exp", 1_700_000_000i64);
        payload.insert("scope", Sequence::from_range(["read", "write"]));
        payload.insert("ratio", 0.5);
        payload.insert("admin", false);
        payload.insert("nonce", Value::null());

        let value = serde_json::to_value(&payload).expect("Always succeeds");
        assert_eq!(
            value,
            json!({
                "iss": "auth0",
                "exp": 1_700_000_000,
                "scope": ["read", "write"],
                "ratio": 0.5,
                "admin": false,
                "nonce": null
            })
        );
    }

    #[test]
    fn entries_keep_insertion_order() {
        let mapping: Mapping = [("z", 1), ("a", 2), ("m", 3)].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&mapping).expect("Always succeeds"),
            r#"{"z":1,"a":2,"m":3}"#
        );
    }
}
