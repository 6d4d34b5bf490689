//! Structured validation failures
//!
//! A failed check produces an [`Issue`]. Object schemas nest the issues of
//! their children under the failing key, so a failure deep inside a nested
//! schema keeps its full key path. Issues are rendered to text only at the
//! outermost boundary (`Display`), or flattened into [`Violation`] records
//! for machine-readable reporting.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// A validation failure, possibly nested under object keys
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// The input's runtime kind does not match the schema's kind
    InvalidType {
        expected: String,
        received: String,
    },

    /// The input has the right kind but breaks a domain rule
    Rule { message: String },

    /// Declared keys absent from the input
    MissingKeys { keys: Vec<String> },

    /// Undeclared keys rejected by a strict object
    UnexpectedKeys { keys: Vec<String> },

    /// Declared keys whose schema rejected the value
    InvalidKeys { failures: Vec<KeyFailure> },

    /// Undeclared keys rejected by the catchall schema
    InvalidCatchall { failures: Vec<KeyFailure> },
}

/// The failure of a single object key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFailure {
    /// Key whose value failed
    pub key: String,
    /// Failure reported by the key's schema
    pub issue: Issue,
}

impl KeyFailure {
    /// Create a new key failure
    pub fn new(key: impl Into<String>, issue: Issue) -> Self {
        Self {
            key: key.into(),
            issue,
        }
    }
}

impl Issue {
    /// Create a domain-rule violation
    pub fn rule(message: impl Into<String>) -> Self {
        Issue::Rule {
            message: message.into(),
        }
    }

    /// Create a type mismatch naming the kind that was received
    pub fn invalid_type(expected: impl Into<String>, received: Option<&Value>) -> Self {
        Issue::InvalidType {
            expected: expected.into(),
            received: value_kind(received).to_string(),
        }
    }

    /// Check if this issue is a type mismatch
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Issue::InvalidType { .. })
    }

    /// Check if this issue is an object-level structural failure
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Issue::MissingKeys { .. }
                | Issue::UnexpectedKeys { .. }
                | Issue::InvalidKeys { .. }
                | Issue::InvalidCatchall { .. }
        )
    }

    /// Flatten the issue tree into one violation per leaf failure
    pub fn violations(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        self.collect_violations(&mut Vec::new(), &mut out);
        out
    }

    fn collect_violations(&self, path: &mut Vec<String>, out: &mut Vec<Violation>) {
        match self {
            Issue::InvalidType { .. } | Issue::Rule { .. } => {
                out.push(Violation::new(path.clone(), self.to_string()));
            }
            Issue::MissingKeys { keys } => {
                for key in keys {
                    out.push(Violation::new(child_path(path, key), "key is missing"));
                }
            }
            Issue::UnexpectedKeys { keys } => {
                for key in keys {
                    out.push(Violation::new(child_path(path, key), "unexpected key"));
                }
            }
            Issue::InvalidKeys { failures } | Issue::InvalidCatchall { failures } => {
                for failure in failures {
                    path.push(failure.key.clone());
                    failure.issue.collect_violations(path, out);
                    path.pop();
                }
            }
        }
    }
}

fn child_path(path: &[String], key: &str) -> Vec<String> {
    let mut child = path.to_vec();
    child.push(key.to_string());
    child
}

fn quoted_list(keys: &[String]) -> String {
    keys.iter()
        .map(|k| format!("\"{}\"", k))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Indent every continuation line of a nested message by one tab
fn indent(message: &str) -> String {
    message.replace('\n', "\n\t")
}

fn write_failures(
    f: &mut fmt::Formatter<'_>,
    header: &str,
    failures: &[KeyFailure],
) -> fmt::Result {
    write!(f, "{}", header)?;
    for failure in failures {
        write!(
            f,
            "\n\t- \"{}\": {}",
            failure.key,
            indent(&failure.issue.to_string())
        )?;
    }
    Ok(())
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::InvalidType { expected, received } => {
                write!(f, "input must be of type {}, received: {}", expected, received)
            }
            Issue::Rule { message } => write!(f, "{}", message),
            Issue::MissingKeys { keys } => {
                write!(f, "object is missing keys: {}", quoted_list(keys))
            }
            Issue::UnexpectedKeys { keys } => {
                write!(f, "unexpected keys: {}", quoted_list(keys))
            }
            Issue::InvalidKeys { failures } => {
                write_failures(f, "following keys failed:", failures)
            }
            Issue::InvalidCatchall { failures } => {
                write_failures(f, "following keys failed catchall schema:", failures)
            }
        }
    }
}

impl std::error::Error for Issue {}

/// A single leaf failure with the key path leading to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Object keys from the root to the failing value
    pub path: Vec<String>,
    /// Human-readable description of the failure
    pub message: String,
}

impl Violation {
    /// Create a new violation
    pub fn new(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Dotted rendering of the path, `(root)` when empty
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            "(root)".to_string()
        } else {
            self.path.join(".")
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path_string(), self.message)
    }
}

/// Name the runtime kind of a possibly missing value
pub fn value_kind(value: Option<&Value>) -> &'static str {
    match value {
        None => "missing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
