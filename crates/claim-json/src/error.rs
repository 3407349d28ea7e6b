use core::fmt;

use crate::JsonType;

/// Errors raised while parsing, classifying or extracting JSON values.
#[derive(Debug)]
pub struct Error {
    repr: Box<ErrorRepr>,
}

#[derive(Debug)]
struct ErrorRepr {
    kind: ErrorKind,
    source: Option<serde_json::Error>,
}

/// The category of an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input text is not a single well-formed JSON value.
    Parse { line: usize, column: usize },
    /// A checked accessor was called on a value of another kind.
    BadCoercion {
        expected: JsonType,
        /// `None` when the value is `null`.
        actual: Option<JsonType>,
    },
    /// The value does not belong to any [`JsonType`].
    Unclassifiable,
    /// An integer claim does not fit into the platform time range.
    InvalidTimestamp(i64),
}

impl Error {
    fn new(kind: ErrorKind, source: Option<serde_json::Error>) -> Self {
        Self {
            repr: Box::new(ErrorRepr { kind, source }),
        }
    }

    pub(crate) fn parse(error: serde_json::Error) -> Self {
        Self::new(
            ErrorKind::Parse {
                line: error.line(),
                column: error.column(),
            },
            Some(error),
        )
    }

    pub(crate) fn bad_coercion(expected: JsonType, actual: Option<JsonType>) -> Self {
        Self::new(ErrorKind::BadCoercion { expected, actual }, None)
    }

    pub(crate) fn unclassifiable() -> Self {
        Self::new(ErrorKind::Unclassifiable, None)
    }

    pub(crate) fn invalid_timestamp(seconds: i64) -> Self {
        Self::new(ErrorKind::InvalidTimestamp(seconds), None)
    }

    /// The category of this error.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.repr.kind
    }

    /// Whether a checked accessor was used on the wrong kind.
    #[must_use]
    pub fn is_bad_coercion(&self) -> bool {
        matches!(self.repr.kind, ErrorKind::BadCoercion { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr.kind {
            ErrorKind::Parse { line, column } => {
                write!(f, "Invalid JSON at line {line}, column {column}")?;
                if let Some(source) = &self.repr.source {
                    write!(f, ": {source}")?;
                }
                Ok(())
            }
            ErrorKind::BadCoercion {
                expected,
                actual: Some(actual),
            } => write!(f, "Bad coercion: expected {expected}, found {actual}"),
            ErrorKind::BadCoercion {
                expected,
                actual: None,
            } => write!(f, "Bad coercion: expected {expected}, found null"),
            ErrorKind::Unclassifiable => f.write_str("Value has no JSON type"),
            ErrorKind::InvalidTimestamp(seconds) => {
                write!(f, "Timestamp {seconds} is out of range")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.repr
            .source
            .as_ref()
            .map(|error| error as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(
        Error::bad_coercion(JsonType::Integer, Some(JsonType::String)),
        "Bad coercion: expected integer, found string";
        "wrong kind"
    )]
    #[test_case(
        Error::bad_coercion(JsonType::Object, None),
        "Bad coercion: expected object, found null";
        "null value"
    )]
    #[test_case(Error::unclassifiable(), "Value has no JSON type"; "unclassifiable")]
    #[test_case(
        Error::invalid_timestamp(i64::MIN),
        "Timestamp -9223372036854775808 is out of range";
        "timestamp"
    )]
    fn display(error: Error, expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn parse_error_keeps_location_and_source() {
        let source = serde_json::from_str::<serde_json::Value>("{\n  \"a\": }")
            .expect_err("Should fail");
        let error = Error::parse(source);
        assert!(matches!(error.kind(), ErrorKind::Parse { line: 2, .. }));
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().starts_with("Invalid JSON at line 2, column "));
    }
}
