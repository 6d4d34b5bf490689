//! String schema

use regex::Regex;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

use crate::base::{Schema, SchemaBase, SchemaKind};
use crate::check::{Check, CheckResult};
use crate::issue::Issue;

/// Narrow an input to a string
pub(crate) fn expect_string(input: Option<&Value>) -> CheckResult<String> {
    match input {
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(Issue::invalid_type("string", other)),
    }
}

/// Schema accepting JSON strings
#[derive(Debug, Clone)]
pub struct StringSchema {
    base: SchemaBase<String>,
}

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl StringSchema {
    /// Create an unconstrained string schema
    pub fn new() -> Self {
        Self {
            base: SchemaBase::new(SchemaKind::String, expect_string),
        }
    }

    fn with_rule<P>(&self, predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(&String) -> bool + Send + Sync + 'static,
    {
        Self {
            base: self.base.with_check(Check::predicate(predicate, message)),
        }
    }

    /// Require at least `length` characters
    pub fn min(&self, length: usize) -> Self {
        self.with_rule(
            move |s| s.chars().count() >= length,
            format!("string must be at least {} characters long", length),
        )
    }

    /// Allow at most `length` characters
    pub fn max(&self, length: usize) -> Self {
        self.with_rule(
            move |s| s.chars().count() <= length,
            format!("string can be at most {} characters long", length),
        )
    }

    /// Require exactly `length` characters
    pub fn length(&self, length: usize) -> Self {
        self.with_rule(
            move |s| s.chars().count() == length,
            format!("string must be exactly {} characters long", length),
        )
    }

    /// Require a match of `pattern` somewhere in the string
    pub fn regex(&self, pattern: Regex) -> Self {
        let message = format!("string does not match regex: /{}/", pattern.as_str());
        self.with_rule(move |s| pattern.is_match(s), message)
    }

    /// Require the string to start with `prefix`
    pub fn starts_with(&self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let message = format!("string must start with \"{}\"", prefix);
        self.with_rule(move |s| s.starts_with(prefix.as_str()), message)
    }

    /// Require the string to end with `suffix`
    pub fn ends_with(&self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        let message = format!("string must end with \"{}\"", suffix);
        self.with_rule(move |s| s.ends_with(suffix.as_str()), message)
    }

    /// Require the string to contain `needle`
    pub fn includes(&self, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        let message = format!("string must include \"{}\"", needle);
        self.with_rule(move |s| s.contains(needle.as_str()), message)
    }

    /// Require the string to equal its uppercase form
    pub fn uppercase(&self) -> Self {
        self.with_rule(|s| *s == s.to_uppercase(), "string must be uppercase")
    }

    /// Require the string to equal its lowercase form
    pub fn lowercase(&self) -> Self {
        self.with_rule(|s| *s == s.to_lowercase(), "string must be lowercase")
    }

    /// Add a custom rule
    pub fn refine<P>(&self, predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.with_rule(move |s| predicate(s), message)
    }
}

impl Schema for StringSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::String
    }

    fn run(&self, input: Option<&Value>) -> CheckResult<Option<Value>> {
        self.base.run(input).map(|s| Some(Value::String(s)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn merge(&self, other: &dyn Schema) -> Option<Arc<dyn Schema>> {
        let other = other.as_any().downcast_ref::<Self>()?;
        Some(Arc::new(Self {
            base: self.base.concat(&other.base),
        }))
    }
}

/// Create a string schema
pub fn string() -> StringSchema {
    StringSchema::new()
}
