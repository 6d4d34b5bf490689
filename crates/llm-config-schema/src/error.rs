//! Error types for schema parsing and schema construction
//!
//! Two channels are kept apart:
//!
//! - [`ParseError`] is what `parse` returns when an input fails validation.
//! - [`SchemaError`] reports a defect in how a schema was assembled, such as
//!   extending a key with a schema of a different base type. It is never
//!   produced by validating input.

use thiserror::Error;

use crate::base::SchemaKind;
use crate::issue::Issue;

/// Error returned by `parse` and `parse_into`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The input did not satisfy the schema
    #[error("{0}")]
    Invalid(Issue),

    /// The validated output could not be converted into the requested type
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl ParseError {
    /// The validation issue, if this error came from a failed check
    pub fn issue(&self) -> Option<&Issue> {
        match self {
            ParseError::Invalid(issue) => Some(issue),
            ParseError::Deserialize(_) => None,
        }
    }

    /// Check if this error is a validation failure (vs a conversion failure)
    pub fn is_invalid(&self) -> bool {
        matches!(self, ParseError::Invalid(_))
    }
}

impl From<Issue> for ParseError {
    fn from(issue: Issue) -> Self {
        ParseError::Invalid(issue)
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Deserialize(err.to_string())
    }
}

/// Error in schema construction (schema misuse, not invalid input)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A key was re-declared with a schema of a different base type
    #[error("{extension} schema cannot be used to extend {base} schema (key \"{key}\")")]
    IncompatibleExtension {
        /// Key declared in both shapes
        key: String,
        /// Kind of the existing schema
        base: SchemaKind,
        /// Kind of the schema it was extended with
        extension: SchemaKind,
    },
}

impl SchemaError {
    /// Prefix the reported key with the key of an enclosing object
    pub fn nested_under(self, parent: &str) -> Self {
        match self {
            SchemaError::IncompatibleExtension {
                key,
                base,
                extension,
            } => SchemaError::IncompatibleExtension {
                key: format!("{}.{}", parent, key),
                base,
                extension,
            },
        }
    }
}

/// Result type alias for parse operations
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::from(Issue::rule("string must be uppercase"));
        assert_eq!(err.to_string(), "string must be uppercase");
        assert!(err.is_invalid());
        assert!(err.issue().is_some());
    }

    #[test]
    fn test_deserialize_error() {
        let json_err = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        let err = ParseError::from(json_err);
        assert!(matches!(err, ParseError::Deserialize(_)));
        assert!(err.issue().is_none());
        assert!(err.to_string().starts_with("Deserialization error:"));
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::IncompatibleExtension {
            key: "foo".to_string(),
            base: SchemaKind::Number,
            extension: SchemaKind::String,
        };
        assert_eq!(
            err.to_string(),
            "string schema cannot be used to extend number schema (key \"foo\")"
        );
    }

    #[test]
    fn test_nested_schema_error_key() {
        let err = SchemaError::IncompatibleExtension {
            key: "port".to_string(),
            base: SchemaKind::Number,
            extension: SchemaKind::String,
        }
        .nested_under("server");
        assert!(err.to_string().ends_with("(key \"server.port\")"));
    }
}
