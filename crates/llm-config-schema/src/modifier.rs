//! Modifier schemas: optional, nullable, nullish
//!
//! A modifier wraps one schema and injects a single base check. When the
//! input is the modifier's sentinel the check succeeds with that sentinel,
//! bypassing the wrapped schema; any other input is handed to the wrapped
//! schema in full, transform included.

use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

use crate::base::{Schema, SchemaBase, SchemaKind};
use crate::check::{Check, CheckResult};

/// The value a modifier lets through on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// The missing sentinel (absent value)
    Missing,
    /// `null`
    Null,
    /// Either `null` or the missing sentinel
    MissingOrNull,
}

impl Sentinel {
    /// Check if an input is this sentinel
    pub fn matches(&self, input: Option<&Value>) -> bool {
        match (self, input) {
            (Sentinel::Missing, None) => true,
            (Sentinel::Null, Some(Value::Null)) => true,
            (Sentinel::MissingOrNull, None | Some(Value::Null)) => true,
            _ => false,
        }
    }

    fn kind(&self) -> SchemaKind {
        match self {
            Sentinel::Missing => SchemaKind::Optional,
            Sentinel::Null => SchemaKind::Nullable,
            Sentinel::MissingOrNull => SchemaKind::Nullish,
        }
    }

    /// Sentinel of a modifier kind, `None` for every other kind
    pub fn for_kind(kind: SchemaKind) -> Option<Self> {
        match kind {
            SchemaKind::Optional => Some(Sentinel::Missing),
            SchemaKind::Nullable => Some(Sentinel::Null),
            SchemaKind::Nullish => Some(Sentinel::MissingOrNull),
            _ => None,
        }
    }
}

/// A schema that short-circuits on a sentinel before delegating
#[derive(Debug, Clone)]
pub struct ModifierSchema<S> {
    sentinel: Sentinel,
    inner: S,
    base: SchemaBase<Option<Value>>,
}

impl<S: Schema + Clone> ModifierSchema<S> {
    /// Wrap `inner` so that `sentinel` passes unchanged
    pub fn new(inner: S, sentinel: Sentinel) -> Self {
        let wrapped = inner.clone();
        let base = SchemaBase::untyped(sentinel.kind()).with_base_check(Check::new(
            move |input: Option<Value>| {
                if sentinel.matches(input.as_ref()) {
                    Ok(input)
                } else {
                    wrapped.run(input.as_ref())
                }
            },
        ));

        Self {
            sentinel,
            inner,
            base,
        }
    }

    /// Sentinel this modifier accepts
    pub fn sentinel(&self) -> Sentinel {
        self.sentinel
    }

    /// The wrapped schema, unchanged
    pub fn unwrap(&self) -> &S {
        &self.inner
    }
}

impl<S: Schema + Clone> Schema for ModifierSchema<S> {
    fn kind(&self) -> SchemaKind {
        self.sentinel.kind()
    }

    fn run(&self, input: Option<&Value>) -> CheckResult<Option<Value>> {
        self.base.run(input)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn merge(&self, other: &dyn Schema) -> Option<Arc<dyn Schema>> {
        if other.kind() != self.kind() {
            return None;
        }
        let merged = self.inner.merge(other.inner()?)?;
        Some(Arc::new(ModifierSchema::new(merged, self.sentinel)))
    }

    fn inner(&self) -> Option<&dyn Schema> {
        Some(&self.inner)
    }
}

/// Accept the missing sentinel in addition to `schema`'s domain
pub fn optional<S: Schema + Clone>(schema: S) -> ModifierSchema<S> {
    ModifierSchema::new(schema, Sentinel::Missing)
}

/// Accept `null` in addition to `schema`'s domain
pub fn nullable<S: Schema + Clone>(schema: S) -> ModifierSchema<S> {
    ModifierSchema::new(schema, Sentinel::Null)
}

/// Accept `null` or the missing sentinel in addition to `schema`'s domain
pub fn nullish<S: Schema + Clone>(schema: S) -> ModifierSchema<S> {
    ModifierSchema::new(schema, Sentinel::MissingOrNull)
}
