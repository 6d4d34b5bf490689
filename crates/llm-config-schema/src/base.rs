//! Schema base
//!
//! Every schema runs the same pipeline:
//!
//! 1. **Type check** narrows the raw input into the schema's working type,
//!    failing with an input-dependent message.
//! 2. **Base checks** are structural checks injected by wrapping constructs
//!    (modifiers, the object engine).
//! 3. **Body checks** are the domain rules appended by builder methods.
//! 4. **Transform** reshapes the surviving value once, on success only.
//!
//! [`SchemaBase`] implements that pipeline for a typed working value; the
//! [`Schema`] trait is the object-safe surface that composes schemas of
//! different kinds (object shapes hold `Arc<dyn Schema>`).
//!
//! The missing sentinel is the absence of a value: [`Schema::run`] takes
//! `Option<&Value>` and yields `Option<Value>`, with `None` meaning missing.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::check::{Check, CheckResult, Pipeline};
use crate::error::{self, ParseError};
use crate::issue::Issue;
use crate::modifier::{self, ModifierSchema};

/// Base type of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Enum,
    StringBool,
    Object,
    Optional,
    Nullable,
    Nullish,
    Any,
    Unknown,
    Never,
}

impl SchemaKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Enum => "enum",
            SchemaKind::StringBool => "string_bool",
            SchemaKind::Object => "object",
            SchemaKind::Optional => "optional",
            SchemaKind::Nullable => "nullable",
            SchemaKind::Nullish => "nullish",
            SchemaKind::Any => "any",
            SchemaKind::Unknown => "unknown",
            SchemaKind::Never => "never",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object-safe interface shared by every schema
///
/// Implementors provide [`Schema::run`]; the terminal operations
/// (`parse`, `safe_parse`, ...) are derived from it. Schemas carry no
/// per-call state, so one instance may be used from many threads.
pub trait Schema: fmt::Debug + Send + Sync + 'static {
    /// Base type of this schema
    fn kind(&self) -> SchemaKind;

    /// Validate and transform an input that may be missing
    fn run(&self, input: Option<&Value>) -> CheckResult<Option<Value>>;

    /// Access the concrete schema for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Combine this schema's checks with those of a schema of the same type
    ///
    /// Returns `None` when `other` is not of the same concrete type. The
    /// combined schema applies this schema's checks first, then `other`'s.
    fn merge(&self, other: &dyn Schema) -> Option<Arc<dyn Schema>> {
        let _ = other;
        None
    }

    /// The schema wrapped by a modifier, if this is one
    fn inner(&self) -> Option<&dyn Schema> {
        None
    }

    /// Validate a present input without raising
    fn safe_parse(&self, input: &Value) -> Result<Value, Issue> {
        let result = self.run(Some(input)).map(Option::unwrap_or_default);
        if let Err(issue) = &result {
            tracing::debug!(schema = %self.kind(), error = %issue, "Validation failed");
        }
        result
    }

    /// Validate the missing sentinel without raising
    fn safe_parse_missing(&self) -> Result<Option<Value>, Issue> {
        let result = self.run(None);
        if let Err(issue) = &result {
            tracing::debug!(schema = %self.kind(), error = %issue, "Validation of missing input failed");
        }
        result
    }

    /// Validate a present input, converting a failure into a [`ParseError`]
    fn parse(&self, input: &Value) -> error::Result<Value> {
        self.safe_parse(input).map_err(ParseError::Invalid)
    }

    /// Validate the missing sentinel, converting a failure into a [`ParseError`]
    fn parse_missing(&self) -> error::Result<Option<Value>> {
        self.safe_parse_missing().map_err(ParseError::Invalid)
    }

    /// Validate a present input and deserialize the output into `T`
    fn parse_into<T: DeserializeOwned>(&self, input: &Value) -> error::Result<T>
    where
        Self: Sized,
    {
        let value = self.parse(input)?;
        Ok(serde_json::from_value(value)?)
    }
}

impl Schema for Arc<dyn Schema> {
    fn kind(&self) -> SchemaKind {
        (**self).kind()
    }

    fn run(&self, input: Option<&Value>) -> CheckResult<Option<Value>> {
        (**self).run(input)
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn merge(&self, other: &dyn Schema) -> Option<Arc<dyn Schema>> {
        (**self).merge(other)
    }

    fn inner(&self) -> Option<&dyn Schema> {
        (**self).inner()
    }
}

/// Builder conveniences available on every cloneable schema
pub trait SchemaExt: Schema + Clone + Sized {
    /// Accept the missing sentinel in addition to this schema's domain
    fn optional(&self) -> ModifierSchema<Self> {
        modifier::optional(self.clone())
    }

    /// Accept `null` in addition to this schema's domain
    fn nullable(&self) -> ModifierSchema<Self> {
        modifier::nullable(self.clone())
    }

    /// Accept `null` or the missing sentinel in addition to this schema's domain
    fn nullish(&self) -> ModifierSchema<Self> {
        modifier::nullish(self.clone())
    }

    /// Type-erase this schema so it can be shared between shapes
    fn shared(&self) -> Arc<dyn Schema> {
        Arc::new(self.clone())
    }
}

impl<S: Schema + Clone> SchemaExt for S {}

type TypeCheck<T> = dyn Fn(Option<&Value>) -> CheckResult<T> + Send + Sync;
type Transform<T, O> = dyn Fn(T) -> O + Send + Sync;

/// Type check, base checks, body checks and transform of one schema
///
/// Builder methods never touch the receiver; they return a new base that
/// shares the existing checks.
pub struct SchemaBase<T, O = T> {
    kind: SchemaKind,
    type_check: Arc<TypeCheck<T>>,
    base_checks: Pipeline<T>,
    checks: Pipeline<T>,
    transform: Arc<Transform<T, O>>,
}

impl<T, O> Clone for SchemaBase<T, O> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            type_check: Arc::clone(&self.type_check),
            base_checks: self.base_checks.clone(),
            checks: self.checks.clone(),
            transform: Arc::clone(&self.transform),
        }
    }
}

impl<T, O> fmt::Debug for SchemaBase<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBase")
            .field("kind", &self.kind)
            .field("base_checks", &self.base_checks)
            .field("checks", &self.checks)
            .finish()
    }
}

impl<T: 'static> SchemaBase<T, T> {
    /// Create a base whose output is the checked value itself
    pub fn new<F>(kind: SchemaKind, type_check: F) -> Self
    where
        F: Fn(Option<&Value>) -> CheckResult<T> + Send + Sync + 'static,
    {
        Self::with_transform(kind, type_check, |value| value)
    }
}

impl SchemaBase<Option<Value>> {
    /// Create a base without a narrowing type check
    pub fn untyped(kind: SchemaKind) -> Self {
        Self::new(kind, |input| Ok(input.cloned()))
    }
}

impl<T: 'static, O: 'static> SchemaBase<T, O> {
    /// Create a base with a final output transform
    pub fn with_transform<F, X>(kind: SchemaKind, type_check: F, transform: X) -> Self
    where
        F: Fn(Option<&Value>) -> CheckResult<T> + Send + Sync + 'static,
        X: Fn(T) -> O + Send + Sync + 'static,
    {
        Self {
            kind,
            type_check: Arc::new(type_check),
            base_checks: Pipeline::new(),
            checks: Pipeline::new(),
            transform: Arc::new(transform),
        }
    }

    /// Base type of this schema
    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// Body checks appended by builder methods
    pub fn checks(&self) -> &Pipeline<T> {
        &self.checks
    }

    /// Return a copy with one more base check
    pub fn with_base_check(&self, check: Check<T>) -> Self {
        Self {
            base_checks: self.base_checks.with(check),
            ..self.clone()
        }
    }

    /// Return a copy with one more body check
    pub fn with_check(&self, check: Check<T>) -> Self {
        Self {
            checks: self.checks.with(check),
            ..self.clone()
        }
    }

    /// Return a copy whose body checks are replaced by `checks`
    pub fn with_checks(&self, checks: Pipeline<T>) -> Self {
        Self {
            checks,
            ..self.clone()
        }
    }

    /// Return a copy that also runs every base and body check of `other`
    ///
    /// This base's checks run first at each stage; the type check and
    /// transform stay this base's own.
    pub fn concat(&self, other: &Self) -> Self {
        Self {
            base_checks: self.base_checks.concat(&other.base_checks),
            checks: self.checks.concat(&other.checks),
            ..self.clone()
        }
    }

    /// Run type check, base checks, body checks and transform
    pub fn run(&self, input: Option<&Value>) -> CheckResult<O> {
        let value = (self.type_check)(input)?;
        let value = self.base_checks.run(value)?;
        let value = self.checks.run(value)?;
        Ok((self.transform)(value))
    }
}
