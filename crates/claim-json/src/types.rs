use core::fmt;
use std::str::FromStr;

/// The closed set of kinds a claim value is classified into.
///
/// `null` has no kind; classifying it is an error.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub enum JsonType {
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    /// Lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            JsonType::Boolean => "boolean",
            JsonType::Integer => "integer",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }
}

impl fmt::Debug for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(JsonType::Boolean),
            "integer" => Ok(JsonType::Integer),
            "number" => Ok(JsonType::Number),
            "string" => Ok(JsonType::String),
            "array" => Ok(JsonType::Array),
            "object" => Ok(JsonType::Object),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::JsonType;
    use test_case::test_case;

    #[test_case(JsonType::Boolean, "boolean")]
    #[test_case(JsonType::Integer, "integer")]
    #[test_case(JsonType::Number, "number")]
    #[test_case(JsonType::String, "string")]
    #[test_case(JsonType::Array, "array")]
    #[test_case(JsonType::Object, "object")]
    fn names(ty: JsonType, name: &str) {
        assert_eq!(ty.to_string(), name);
        assert_eq!(format!("{ty:?}"), name);
        assert_eq!(name.parse::<JsonType>(), Ok(ty));
    }

    #[test_case("null"; "null")]
    #[test_case("Integer"; "capitalized")]
    #[test_case(""; "empty")]
    fn unknown_name(name: &str) {
        assert!(name.parse::<JsonType>().is_err());
    }
}
