//! Object schema engine
//!
//! An [`ObjectSchema`] resolves a [`Shape`] of child schemas against an
//! input object. The engine is installed as the object's single base check
//! and runs, in order:
//!
//! 1. **Missing keys**: every declared key absent from the input is offered
//!    the missing sentinel. Keys whose schema rejects it are reported
//!    together in one [`Issue::MissingKeys`].
//! 2. **Strict unknown keys**: under [`UnknownKeys::Strict`] every undeclared
//!    input key is reported together in one [`Issue::UnexpectedKeys`].
//! 3. **Declared keys**: every present key is run through its schema; all
//!    failures are aggregated into one [`Issue::InvalidKeys`].
//! 4. **Catchall**: under [`UnknownKeys::Catchall`] every undeclared key is
//!    run through the catchall schema; failures aggregate into
//!    [`Issue::InvalidCatchall`].
//! 5. **Output**: declared keys carry their schema's transformed output;
//!    undeclared keys are dropped, copied or replaced by the catchall output
//!    depending on the policy.
//!
//! Object-level refinements run as body checks on the assembled output.

mod shape;

pub use shape::Shape;

use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::base::{Schema, SchemaBase, SchemaKind};
use crate::check::{Check, CheckResult};
use crate::error::SchemaError;
use crate::issue::{Issue, KeyFailure};
use crate::leaf::{enumeration, EnumSchema};
use crate::modifier::{ModifierSchema, Sentinel};

type Object = Map<String, Value>;

/// Policy for input keys that the shape does not declare
#[derive(Clone, Default)]
pub enum UnknownKeys {
    /// Reject the input if any undeclared key is present
    Strict,
    /// Drop undeclared keys from the output
    #[default]
    Strip,
    /// Copy undeclared keys into the output unvalidated
    Passthrough,
    /// Validate every undeclared key against a schema
    Catchall(Arc<dyn Schema>),
}

impl UnknownKeys {
    /// Get the policy name
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownKeys::Strict => "strict",
            UnknownKeys::Strip => "strip",
            UnknownKeys::Passthrough => "passthrough",
            UnknownKeys::Catchall(_) => "catchall",
        }
    }
}

impl fmt::Debug for UnknownKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownKeys::Catchall(schema) => f.debug_tuple("Catchall").field(schema).finish(),
            other => f.write_str(other.as_str()),
        }
    }
}

fn expect_object(input: Option<&Value>) -> CheckResult<Object> {
    match input {
        Some(Value::Object(map)) => Ok(map.clone()),
        other => Err(Issue::invalid_type("object", other)),
    }
}

fn resolve(shape: &Shape, unknown_keys: &UnknownKeys, input: Object) -> CheckResult<Object> {
    let mut output = Object::new();

    let mut missing = Vec::new();
    for (key, schema) in shape.iter().filter(|(key, _)| !input.contains_key(*key)) {
        match schema.run(None) {
            Ok(Some(value)) => {
                output.insert(key.to_string(), value);
            }
            Ok(None) => {}
            Err(_) => missing.push(key.to_string()),
        }
    }
    if !missing.is_empty() {
        tracing::trace!(keys = ?missing, "Object is missing keys");
        return Err(Issue::MissingKeys { keys: missing });
    }

    let unknown: Vec<&String> = input.keys().filter(|key| !shape.contains_key(key)).collect();
    if matches!(unknown_keys, UnknownKeys::Strict) && !unknown.is_empty() {
        let keys: Vec<String> = unknown.into_iter().cloned().collect();
        tracing::trace!(keys = ?keys, "Object has unexpected keys");
        return Err(Issue::UnexpectedKeys { keys });
    }

    let mut failures = Vec::new();
    for (key, schema) in shape.iter() {
        let Some(value) = input.get(key) else {
            continue;
        };
        match schema.run(Some(value)) {
            Ok(Some(out)) => {
                output.insert(key.to_string(), out);
            }
            Ok(None) => {}
            Err(issue) => failures.push(KeyFailure::new(key, issue)),
        }
    }
    if !failures.is_empty() {
        tracing::trace!(count = failures.len(), "Object keys failed validation");
        return Err(Issue::InvalidKeys { failures });
    }

    match unknown_keys {
        UnknownKeys::Strict | UnknownKeys::Strip => {}
        UnknownKeys::Passthrough => {
            for key in unknown {
                if let Some(value) = input.get(key) {
                    output.insert(key.clone(), value.clone());
                }
            }
        }
        UnknownKeys::Catchall(catchall) => {
            let mut failures = Vec::new();
            for key in unknown {
                match catchall.run(input.get(key)) {
                    Ok(Some(out)) => {
                        output.insert(key.clone(), out);
                    }
                    Ok(None) => {}
                    Err(issue) => failures.push(KeyFailure::new(key.as_str(), issue)),
                }
            }
            if !failures.is_empty() {
                tracing::trace!(count = failures.len(), "Object keys failed catchall schema");
                return Err(Issue::InvalidCatchall { failures });
            }
        }
    }

    Ok(output)
}

fn incompatible(key: &str, base: &dyn Schema, extension: &dyn Schema) -> SchemaError {
    SchemaError::IncompatibleExtension {
        key: key.to_string(),
        base: base.kind(),
        extension: extension.kind(),
    }
}

/// Combine the schemas declared for one key by both shapes
///
/// Matching modifiers are peeled and re-applied around the combined inner
/// schema, and nested objects are safe-extended key by key, so the error
/// names the innermost conflicting key and kinds.
fn combine(
    key: &str,
    base: &dyn Schema,
    extension: &dyn Schema,
) -> Result<Arc<dyn Schema>, SchemaError> {
    if base.kind() != extension.kind() {
        return Err(incompatible(key, base, extension));
    }

    if let Some(sentinel) = Sentinel::for_kind(base.kind()) {
        let (Some(inner_base), Some(inner_extension)) = (base.inner(), extension.inner()) else {
            return Err(incompatible(key, base, extension));
        };
        let inner = combine(key, inner_base, inner_extension)?;
        return Ok(Arc::new(ModifierSchema::new(inner, sentinel)));
    }

    let objects = (
        base.as_any().downcast_ref::<ObjectSchema>(),
        extension.as_any().downcast_ref::<ObjectSchema>(),
    );
    if let (Some(base), Some(extension)) = objects {
        let merged = base
            .try_safe_extend(&extension.shape)
            .map_err(|err| err.nested_under(key))?;
        return Ok(Arc::new(merged));
    }

    base.merge(extension)
        .ok_or_else(|| incompatible(key, base, extension))
}

/// Schema for JSON objects with a declared shape
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    shape: Arc<Shape>,
    unknown_keys: UnknownKeys,
    base: SchemaBase<Object>,
}

impl ObjectSchema {
    /// Create an object schema from a shape and an unknown-key policy
    pub fn new(shape: Shape, unknown_keys: UnknownKeys) -> Self {
        Self::from_parts(Arc::new(shape), unknown_keys)
    }

    fn from_parts(shape: Arc<Shape>, unknown_keys: UnknownKeys) -> Self {
        let engine_shape = Arc::clone(&shape);
        let policy = unknown_keys.clone();
        let base = SchemaBase::new(SchemaKind::Object, expect_object).with_base_check(Check::new(
            move |input: Object| resolve(&engine_shape, &policy, input),
        ));

        Self {
            shape,
            unknown_keys,
            base,
        }
    }

    /// Same shape and refinements under another policy
    fn with_policy(&self, unknown_keys: UnknownKeys) -> Self {
        let fresh = Self::from_parts(Arc::clone(&self.shape), unknown_keys);
        Self {
            base: fresh.base.with_checks(self.base.checks().clone()),
            ..fresh
        }
    }

    /// Another shape under the same policy, without refinements
    fn with_shape(&self, shape: Shape) -> Self {
        Self::new(shape, self.unknown_keys.clone())
    }

    /// Declared keys and their schemas
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Current policy for undeclared keys
    pub fn unknown_keys(&self) -> &UnknownKeys {
        &self.unknown_keys
    }

    /// Enumeration of the declared key names
    pub fn keyof(&self) -> EnumSchema {
        enumeration(self.shape.keys())
    }

    /// Add keys, replacing the schema of keys already declared
    pub fn extend(&self, additional: &Shape) -> Self {
        let mut shape = (*self.shape).clone();
        for (key, schema) in additional.iter() {
            shape.insert(key, Arc::clone(schema));
        }
        self.with_shape(shape)
    }

    /// Add keys, combining the checks of keys already declared
    ///
    /// A key declared in both shapes must have the same base type in each;
    /// its checks become the existing checks followed by the new ones.
    pub fn try_safe_extend(&self, additional: &Shape) -> Result<Self, SchemaError> {
        let mut shape = (*self.shape).clone();
        for (key, schema) in additional.iter() {
            let combined = match self.shape.get(key) {
                Some(existing) => combine(key, existing.as_ref(), schema.as_ref())?,
                None => Arc::clone(schema),
            };
            shape.insert(key, combined);
        }
        Ok(self.with_shape(shape))
    }

    /// Add keys, combining the checks of keys already declared
    ///
    /// # Panics
    ///
    /// Panics if a key declared in both shapes has different base types.
    /// Use [`ObjectSchema::try_safe_extend`] to get the error instead.
    pub fn safe_extend(&self, additional: &Shape) -> Self {
        match self.try_safe_extend(additional) {
            Ok(schema) => schema,
            Err(err) => panic!("{}", err),
        }
    }

    /// Keep only the named keys; unknown names are ignored
    pub fn pick<I, S>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected: Vec<S> = keys.into_iter().collect();
        self.with_shape(
            self.shape
                .filter(|key| selected.iter().any(|s| s.as_ref() == key)),
        )
    }

    /// Drop the named keys; unknown names are ignored
    pub fn omit<I, S>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected: Vec<S> = keys.into_iter().collect();
        self.with_shape(
            self.shape
                .filter(|key| !selected.iter().any(|s| s.as_ref() == key)),
        )
    }

    /// Copy undeclared keys into the output
    pub fn loose(&self) -> Self {
        self.with_policy(UnknownKeys::Passthrough)
    }

    /// Alias for [`ObjectSchema::loose`]
    pub fn passthrough(&self) -> Self {
        self.loose()
    }

    /// Drop undeclared keys from the output
    pub fn strip(&self) -> Self {
        self.with_policy(UnknownKeys::Strip)
    }

    /// Reject inputs carrying undeclared keys
    pub fn strict(&self) -> Self {
        self.with_policy(UnknownKeys::Strict)
    }

    /// Validate undeclared keys against `schema`
    pub fn catchall<S: Schema>(&self, schema: S) -> Self {
        self.with_policy(UnknownKeys::Catchall(Arc::new(schema)))
    }

    /// Add a rule over the validated output object
    pub fn refine<P>(&self, predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(&Map<String, Value>) -> bool + Send + Sync + 'static,
    {
        Self {
            base: self.base.with_check(Check::predicate(predicate, message)),
            ..self.clone()
        }
    }
}

impl Schema for ObjectSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Object
    }

    fn run(&self, input: Option<&Value>) -> CheckResult<Option<Value>> {
        self.base.run(input).map(|map| Some(Value::Object(map)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn merge(&self, other: &dyn Schema) -> Option<Arc<dyn Schema>> {
        let other = other.as_any().downcast_ref::<Self>()?;
        let merged = self.try_safe_extend(&other.shape).ok()?;
        Some(Arc::new(merged))
    }
}

/// Create an object schema that strips undeclared keys
pub fn object(shape: Shape) -> ObjectSchema {
    ObjectSchema::new(shape, UnknownKeys::Strip)
}

/// Create an object schema that keeps undeclared keys
pub fn loose_object(shape: Shape) -> ObjectSchema {
    ObjectSchema::new(shape, UnknownKeys::Passthrough)
}

/// Create an object schema that rejects undeclared keys
pub fn strict_object(shape: Shape) -> ObjectSchema {
    ObjectSchema::new(shape, UnknownKeys::Strict)
}
