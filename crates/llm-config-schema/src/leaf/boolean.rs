//! Boolean schema

use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

use crate::base::{Schema, SchemaBase, SchemaKind};
use crate::check::{Check, CheckResult};
use crate::issue::Issue;

/// Schema accepting JSON booleans
#[derive(Debug, Clone)]
pub struct BooleanSchema {
    base: SchemaBase<bool>,
}

impl Default for BooleanSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl BooleanSchema {
    /// Create a boolean schema
    pub fn new() -> Self {
        Self {
            base: SchemaBase::new(SchemaKind::Boolean, |input| match input {
                Some(Value::Bool(b)) => Ok(*b),
                other => Err(Issue::invalid_type("boolean", other)),
            }),
        }
    }

    /// Add a custom rule
    pub fn refine<P>(&self, predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(bool) -> bool + Send + Sync + 'static,
    {
        Self {
            base: self
                .base
                .with_check(Check::predicate(move |b: &bool| predicate(*b), message)),
        }
    }
}

impl Schema for BooleanSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Boolean
    }

    fn run(&self, input: Option<&Value>) -> CheckResult<Option<Value>> {
        self.base.run(input).map(|b| Some(Value::Bool(b)))
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

/// Create a boolean schema
pub fn boolean() -> BooleanSchema {
    BooleanSchema::new()
}
