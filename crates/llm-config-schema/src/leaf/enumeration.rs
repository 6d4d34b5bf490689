//! Enumeration schema: a string drawn from a fixed set

use serde_json::Value;
use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;

use crate::base::{Schema, SchemaBase, SchemaKind};
use crate::check::{Check, CheckResult};
use crate::leaf::string::expect_string;

/// Schema accepting one of a fixed list of strings
#[derive(Debug, Clone)]
pub struct EnumSchema {
    values: Arc<Vec<String>>,
    base: SchemaBase<String>,
}

impl EnumSchema {
    /// Create an enumeration; duplicates are dropped, declaration order is kept
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let values: Vec<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| seen.insert(v.clone()))
            .collect();

        let message = format!(
            "string must be one of the following: {}",
            values
                .iter()
                .map(|v| format!("\"{}\"", v))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let allowed = seen;
        let base = SchemaBase::new(SchemaKind::Enum, expect_string)
            .with_base_check(Check::predicate(move |s: &String| allowed.contains(s), message));

        Self {
            values: Arc::new(values),
            base,
        }
    }

    /// Allowed values in declaration order
    pub fn options(&self) -> &[String] {
        &self.values
    }

    /// Create an enumeration without the given values
    pub fn exclude<I, S>(&self, disallowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let disallowed: HashSet<String> =
            disallowed.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::new(self.values.iter().filter(|v| !disallowed.contains(*v)).cloned())
    }

    /// Create an enumeration keeping only the given values
    pub fn extract<I, S>(&self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed: HashSet<String> =
            allowed.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::new(self.values.iter().filter(|v| allowed.contains(*v)).cloned())
    }
}

impl Schema for EnumSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Enum
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
            values: Arc::new(
                self.values
                    .iter()
                    .filter(|v| other.values.contains(*v))
                    .cloned()
                    .collect(),
            ),
            base: self.base.concat(&other.base),
        }))
    }
}

/// Create an enumeration schema
pub fn enumeration<I, S>(values: I) -> EnumSchema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EnumSchema::new(values)
}
